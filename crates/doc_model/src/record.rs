//! Raw announcement record as submitted by the form
//!
//! Field names accept both the English names and the form's camelCase
//! Indonesian names (`namaAlmarhum`, `usia`, `pihakBerduka`, ...).

use serde::{Deserialize, Serialize};

/// Age as it arrives from the form: a number, a string, or nothing at all
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

/// Result of coercing an [`AgeInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercedAge {
    pub years: u32,
    /// True when non-empty input was discarded and replaced by 0
    pub discarded: bool,
}

impl AgeInput {
    /// Lenient numeric coercion: anything that is not a finite,
    /// non-negative number becomes 0. Fractions truncate.
    pub fn coerce(&self) -> CoercedAge {
        let parsed = match self {
            AgeInput::Number(n) => Some(*n),
            AgeInput::Text(s) if s.trim().is_empty() => {
                return CoercedAge { years: 0, discarded: false };
            }
            AgeInput::Text(s) => s.trim().parse::<f64>().ok(),
            AgeInput::Missing => {
                return CoercedAge { years: 0, discarded: false };
            }
        };

        match parsed {
            Some(n) if n.is_finite() && n >= 0.0 => CoercedAge {
                years: n.trunc().min(u32::MAX as f64) as u32,
                discarded: false,
            },
            _ => CoercedAge { years: 0, discarded: true },
        }
    }
}

impl From<u32> for AgeInput {
    fn from(years: u32) -> Self {
        AgeInput::Number(years as f64)
    }
}

impl From<&str> for AgeInput {
    fn from(text: &str) -> Self {
        AgeInput::Text(text.to_string())
    }
}

/// One row of the editable mourning-party list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MourningPartyInput {
    #[serde(default, alias = "nama")]
    pub name: String,
    #[serde(default, alias = "hubungan")]
    pub relationship: Option<String>,
}

impl MourningPartyInput {
    pub fn new(name: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relationship: Some(relationship.into()),
        }
    }

    /// True when both the name and the relationship were left empty
    pub fn is_untouched(&self) -> bool {
        self.name.trim().is_empty()
            && self
                .relationship
                .as_deref()
                .map_or(true, |r| r.trim().is_empty())
    }
}

/// The announcement record exactly as the form hands it over
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementRecord {
    #[serde(default, alias = "namaAlmarhum")]
    pub deceased_name: String,
    #[serde(default, alias = "usia")]
    pub age: AgeInput,
    #[serde(default, alias = "padukuhan")]
    pub residence_area: String,
    #[serde(default, alias = "hariMeninggal")]
    pub death_day_label: String,
    #[serde(default, alias = "tanggalMeninggal")]
    pub death_date: String,
    #[serde(default, alias = "jamMeninggal")]
    pub death_time: String,
    #[serde(default, alias = "hariPemakaman")]
    pub burial_day_label: String,
    #[serde(default, alias = "tanggalPemakaman")]
    pub burial_date: String,
    #[serde(default, alias = "jamPemakaman")]
    pub burial_time: String,
    #[serde(default, alias = "makamLengkap")]
    pub burial_location: String,
    #[serde(default, alias = "pihakBerduka")]
    pub mourners: Vec<MourningPartyInput>,
}

impl AnnouncementRecord {
    /// Create a record with only the required fields filled in
    pub fn new(deceased_name: impl Into<String>, residence_area: impl Into<String>) -> Self {
        Self {
            deceased_name: deceased_name.into(),
            residence_area: residence_area.into(),
            ..Default::default()
        }
    }

    pub fn with_age(mut self, age: impl Into<AgeInput>) -> Self {
        self.age = age.into();
        self
    }

    pub fn with_death(
        mut self,
        day_label: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        self.death_day_label = day_label.into();
        self.death_date = date.into();
        self.death_time = time.into();
        self
    }

    pub fn with_burial(
        mut self,
        day_label: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        self.burial_day_label = day_label.into();
        self.burial_date = date.into();
        self.burial_time = time.into();
        self.burial_location = location.into();
        self
    }

    pub fn with_mourner(mut self, name: impl Into<String>, relationship: impl Into<String>) -> Self {
        self.mourners.push(MourningPartyInput::new(name, relationship));
        self
    }
}
