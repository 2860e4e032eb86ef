use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SpiderLogError;

pub type SpeciesId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum DangerLevel {
    Harmless,
    #[serde(rename = "Mildly Venomous")]
    MildlyVenomous,
    Venomous,
    Dangerous,
}

impl DangerLevel {
    pub fn label(self) -> &'static str {
        match self {
            DangerLevel::Harmless => "Harmless",
            DangerLevel::MildlyVenomous => "Mildly Venomous",
            DangerLevel::Venomous => "Venomous",
            DangerLevel::Dangerous => "Dangerous",
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: SpeciesId,
    pub scientific_name: String,
    pub common_name: String,
    pub family: String,
    pub description: String,
    pub habitat: String,
    pub image_url: String,
    pub danger_level: DangerLevel,
    pub size: String,
    pub region: Vec<String>,
}

impl Species {
    /// True when any of the searchable text fields contains `needle`.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [
            &self.common_name,
            &self.scientific_name,
            &self.family,
            &self.description,
            &self.habitat,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncounterId(String);

impl EncounterId {
    /// Client-side token: `encounter-<unix millis>-<7 random chars>`.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let entropy = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("encounter-{millis}-{}", &entropy[..7]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EncounterId {
    type Err = SpiderLogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().any(|ch| ch.is_whitespace()) {
            return Err(SpiderLogError::InvalidEncounterId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl FromStr for Coordinates {
    type Err = SpiderLogError;

    /// Parses `"<lat>,<lon>"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SpiderLogError::InvalidCoordinates(value.to_string());
        let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: EncounterId,
    pub spider_id: SpeciesId,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub companions: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

/// A validated encounter that has not been persisted yet.
///
/// Only [`crate::encounter::EncounterDraft::validate`] builds one, so holding a
/// `NewEncounter` means the location is non-empty and the species resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEncounter {
    pub id: Option<EncounterId>,
    pub spider_id: SpeciesId,
    pub date: DateTime<Utc>,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub companions: Vec<String>,
    pub notes: String,
    pub photos: Option<Vec<String>>,
}

impl NewEncounter {
    pub fn into_encounter(self, id: EncounterId) -> Encounter {
        Encounter {
            id,
            spider_id: self.spider_id,
            date: self.date,
            location: self.location,
            coordinates: self.coordinates,
            companions: self.companions,
            notes: self.notes,
            photos: self.photos,
        }
    }
}
