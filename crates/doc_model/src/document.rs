//! The validated announcement

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RequiredField, Result, ValidationError};
use crate::record::{AnnouncementRecord, MourningPartyInput};

/// One bereaved relation listed at the bottom of the announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MourningParty {
    pub name: String,
    /// Empty means no relationship annotation is rendered
    pub relationship: String,
}

impl MourningParty {
    pub fn new(name: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
        }
    }

    /// Rows with a blank name are kept in the list but never rendered
    pub fn is_visible(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// The relationship annotation, if there is one to render
    pub fn relationship_label(&self) -> Option<&str> {
        let label = self.relationship.trim();
        (!label.is_empty()).then_some(label)
    }
}

impl From<&MourningPartyInput> for MourningParty {
    fn from(input: &MourningPartyInput) -> Self {
        Self {
            name: input.name.trim().to_string(),
            relationship: input
                .relationship
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Day, date and time of one event (the death or the burial)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub day_label: String,
    /// Stored as `YYYY-MM-DD`
    pub date: String,
    pub time: String,
}

impl EventDetails {
    fn from_raw(day_label: &str, date: &str, time: &str) -> Self {
        Self {
            day_label: day_label.trim().to_string(),
            date: date.trim().to_string(),
            time: time.trim().to_string(),
        }
    }
}

/// A validated, normalized announcement.
///
/// Built once per submission through [`validate`] and never mutated while a
/// render or export is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    deceased_name: String,
    age_years: u32,
    residence_area: String,
    death: EventDetails,
    burial: EventDetails,
    burial_location: String,
    mourners: Vec<MourningParty>,
}

impl DocumentModel {
    /// Validate a raw record. See [`validate`].
    pub fn validate(record: &AnnouncementRecord) -> Result<Self> {
        validate(record)
    }

    pub fn deceased_name(&self) -> &str {
        &self.deceased_name
    }

    pub fn age_years(&self) -> u32 {
        self.age_years
    }

    pub fn residence_area(&self) -> &str {
        &self.residence_area
    }

    pub fn death(&self) -> &EventDetails {
        &self.death
    }

    pub fn burial(&self) -> &EventDetails {
        &self.burial
    }

    pub fn burial_location(&self) -> &str {
        &self.burial_location
    }

    /// All mourner rows, including blank ones, in insertion order
    pub fn mourners(&self) -> &[MourningParty] {
        &self.mourners
    }

    /// Mourner rows that will actually be rendered
    pub fn visible_mourners(&self) -> impl Iterator<Item = &MourningParty> + '_ {
        self.mourners.iter().filter(|m| m.is_visible())
    }

    pub fn visible_mourner_count(&self) -> usize {
        self.visible_mourners().count()
    }
}

/// Turn a raw record into a [`DocumentModel`].
///
/// The deceased name is checked before the residence area. Age coercion is
/// lenient and never fails.
pub fn validate(record: &AnnouncementRecord) -> Result<DocumentModel> {
    let deceased_name = record.deceased_name.trim();
    if deceased_name.is_empty() {
        return Err(ValidationError::MissingRequiredField {
            field: RequiredField::DeceasedName,
        });
    }

    let residence_area = record.residence_area.trim();
    if residence_area.is_empty() {
        return Err(ValidationError::MissingRequiredField {
            field: RequiredField::ResidenceArea,
        });
    }

    let age = record.age.coerce();
    if age.discarded {
        warn!(input = ?record.age, "Age is not a non-negative number, using 0");
    }

    Ok(DocumentModel {
        deceased_name: deceased_name.to_string(),
        age_years: age.years,
        residence_area: residence_area.to_string(),
        death: EventDetails::from_raw(
            &record.death_day_label,
            &record.death_date,
            &record.death_time,
        ),
        burial: EventDetails::from_raw(
            &record.burial_day_label,
            &record.burial_date,
            &record.burial_time,
        ),
        burial_location: record.burial_location.trim().to_string(),
        mourners: record.mourners.iter().map(MourningParty::from).collect(),
    })
}
