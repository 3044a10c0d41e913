//! Announcement submission and persistence
//!
//! A submitted record is cleaned up into a [`NewRecord`], handed to a
//! [`RecordStore`] and comes back as a [`StoredRecord`] with an id and a
//! creation time. Failures are reported as a [`SubmissionFailure`] carrying
//! an HTTP-style status and a message for the form.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use doc_model::AnnouncementRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::{Result, StoreError};

pub const MISSING_FIELDS_MESSAGE: &str = "Nama Almarhum dan Padukuhan harus diisi.";
pub const STORE_FAILURE_MESSAGE: &str = "Gagal menyimpan data ke database. Cek log server.";

pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Why a submission was not stored
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message} (status {status})")]
pub struct SubmissionFailure {
    pub status: u16,
    pub message: String,
}

impl SubmissionFailure {
    pub fn missing_fields() -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            message: MISSING_FIELDS_MESSAGE.to_string(),
        }
    }

    pub fn store_failed() -> Self {
        Self {
            status: STATUS_SERVER_ERROR,
            message: STORE_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMourner {
    pub name: String,
    /// `None` when the form left it empty
    pub relationship: Option<String>,
}

/// A cleaned-up record waiting for an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub deceased_name: String,
    pub age_years: u32,
    pub residence_area: String,
    pub death_day_label: String,
    pub death_date: String,
    pub death_time: String,
    pub burial_day_label: String,
    pub burial_date: String,
    pub burial_time: String,
    pub burial_location: String,
    pub mourners: Vec<StoredMourner>,
}

impl NewRecord {
    /// Back to the form shape, e.g. to render a stored announcement again
    pub fn to_announcement(&self) -> AnnouncementRecord {
        let mut record = AnnouncementRecord::new(&self.deceased_name, &self.residence_area)
            .with_age(self.age_years)
            .with_death(&self.death_day_label, &self.death_date, &self.death_time)
            .with_burial(
                &self.burial_day_label,
                &self.burial_date,
                &self.burial_time,
                &self.burial_location,
            );
        for mourner in &self.mourners {
            record = record.with_mourner(&mourner.name, mourner.relationship.as_deref().unwrap_or(""));
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: NewRecord,
}

/// Clean up a submitted record.
///
/// Mourner rows where both name and relationship are blank are dropped, the
/// age is coerced and text fields are trimmed. A blank deceased name or
/// residence area is rejected with status 400.
pub fn prepare_submission(record: &AnnouncementRecord) -> std::result::Result<NewRecord, SubmissionFailure> {
    let deceased_name = record.deceased_name.trim();
    let residence_area = record.residence_area.trim();
    if deceased_name.is_empty() || residence_area.is_empty() {
        return Err(SubmissionFailure::missing_fields());
    }

    let age = record.age.coerce();
    if age.discarded {
        warn!(age = ?record.age, "Age is not a number, storing 0");
    }

    let mourners = record
        .mourners
        .iter()
        .filter(|m| !m.is_untouched())
        .map(|m| StoredMourner {
            name: m.name.trim().to_string(),
            relationship: m
                .relationship
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        })
        .collect();

    Ok(NewRecord {
        deceased_name: deceased_name.to_string(),
        age_years: age.years,
        residence_area: residence_area.to_string(),
        death_day_label: record.death_day_label.trim().to_string(),
        death_date: record.death_date.trim().to_string(),
        death_time: record.death_time.trim().to_string(),
        burial_day_label: record.burial_day_label.trim().to_string(),
        burial_date: record.burial_date.trim().to_string(),
        burial_time: record.burial_time.trim().to_string(),
        burial_location: record.burial_location.trim().to_string(),
        mourners,
    })
}

/// Persistence for submitted announcements
pub trait RecordStore: Send + Sync {
    fn create(&self, record: &NewRecord) -> Result<StoredRecord>;
    fn get(&self, id: Uuid) -> Result<StoredRecord>;
    /// All records, oldest first
    fn list(&self) -> Result<Vec<StoredRecord>>;
}

/// Validate, clean up and store a record
pub fn submit(
    store: &dyn RecordStore,
    record: &AnnouncementRecord,
) -> std::result::Result<StoredRecord, SubmissionFailure> {
    let new_record = prepare_submission(record)?;
    store.create(&new_record).map_err(|e| {
        error!(error = %e, "Error creating lelayu entry");
        SubmissionFailure::store_failed()
    })
}

fn stamp(record: &NewRecord) -> StoredRecord {
    StoredRecord {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        record: record.clone(),
    }
}

fn oldest_first(records: &mut [StoredRecord]) {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<Uuid, StoredRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    fn create(&self, record: &NewRecord) -> Result<StoredRecord> {
        let stored = stamp(record);
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))?
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn get(&self, id: Uuid) -> Result<StoredRecord> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))?
            .get(&id)
            .cloned()
            .ok_or(StoreError::RecordNotFound(id))
    }

    fn list(&self) -> Result<Vec<StoredRecord>> {
        let mut records: Vec<StoredRecord> = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))?
            .values()
            .cloned()
            .collect();
        oldest_first(&mut records);
        Ok(records)
    }
}

/// One pretty-printed `<id>.json` file per record
#[derive(Debug, Clone)]
pub struct JsonFileRecordStore {
    dir: PathBuf,
}

impl JsonFileRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl RecordStore for JsonFileRecordStore {
    fn create(&self, record: &NewRecord) -> Result<StoredRecord> {
        fs::create_dir_all(&self.dir)?;
        let stored = stamp(record);
        let path = self.path_for(stored.id);
        fs::write(&path, serde_json::to_string_pretty(&stored)?)?;
        debug!(path = %path.display(), "Stored record");
        Ok(stored)
    }

    fn get(&self, id: Uuid) -> Result<StoredRecord> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::RecordNotFound(id));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn list(&self) -> Result<Vec<StoredRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<StoredRecord>(&content) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), "Skipping unreadable record: {}", e),
            }
        }
        oldest_first(&mut records);
        Ok(records)
    }
}
