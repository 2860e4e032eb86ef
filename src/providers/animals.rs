use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::SpiderLogError;
use crate::http::{build_client, failure_details, send_with_retries};

pub const ANIMALS_API_URL: &str = "https://api.api-ninjas.com/v1/animals";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnimalRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub characteristics: Characteristics,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Characteristics {
    #[serde(default)]
    pub prey: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default)]
    pub main_prey: Option<String>,
    #[serde(default)]
    pub distinctive_feature: Option<String>,
    #[serde(default)]
    pub temperament: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Taxonomy and characteristics lookup by common name.
pub trait AnimalsClient: Send + Sync {
    fn lookup(&self, name: &str) -> Result<Vec<AnimalRecord>, SpiderLogError>;
}

#[derive(Clone)]
pub struct AnimalsHttpClient {
    client: Client,
    api_key: String,
}

impl AnimalsHttpClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SpiderLogError> {
        let client = build_client(Duration::from_secs(20))
            .map_err(|err| SpiderLogError::AnimalsHttp(err.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

impl AnimalsClient for AnimalsHttpClient {
    fn lookup(&self, name: &str) -> Result<Vec<AnimalRecord>, SpiderLogError> {
        let response = send_with_retries(|| {
            self.client
                .get(ANIMALS_API_URL)
                .query(&[("name", name)])
                .header("X-Api-Key", &self.api_key)
        })
        .map_err(|err| SpiderLogError::AnimalsHttp(err.to_string()))?;
        if !response.status().is_success() {
            let (status, message) = failure_details(response, "animals API request failed");
            return Err(SpiderLogError::AnimalsStatus { status, message });
        }
        response
            .json()
            .map_err(|err| SpiderLogError::AnimalsHttp(err.to_string()))
    }
}

/// Prefers a record that is clearly a spider; otherwise the first one.
pub fn pick_spider_record(records: Vec<AnimalRecord>) -> Option<AnimalRecord> {
    let position = records.iter().position(|record| {
        record.name.to_lowercase().contains("spider")
            || record
                .taxonomy
                .scientific_name
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains("aranea")
    });
    let mut records = records;
    match position {
        Some(index) => Some(records.swap_remove(index)),
        None if !records.is_empty() => Some(records.swap_remove(0)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sparse_api_payload() {
        let payload = r#"[{
            "name": "Wolf Spider",
            "taxonomy": {"family": "Lycosidae", "scientific_name": "Lycosidae"},
            "locations": ["Africa", "Asia"],
            "characteristics": {"temperament": "Timid", "location": "Worldwide"}
        }]"#;
        let records: Vec<AnimalRecord> = serde_json::from_str(payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].taxonomy.family.as_deref(), Some("Lycosidae"));
        assert_eq!(records[0].characteristics.habitat, None);
        assert_eq!(
            records[0].characteristics.location.as_deref(),
            Some("Worldwide")
        );
    }

    #[test]
    fn picks_the_spider_over_other_animals() {
        let other = AnimalRecord {
            name: "Tarantula Hawk".to_string(),
            ..AnimalRecord::default()
        };
        let spider = AnimalRecord {
            name: "Goliath Birdeater".to_string(),
            taxonomy: Taxonomy {
                family: Some("Theraphosidae".to_string()),
                scientific_name: Some("Theraphosa blondi (Araneae)".to_string()),
            },
            ..AnimalRecord::default()
        };
        let picked = pick_spider_record(vec![other.clone(), spider.clone()]).unwrap();
        assert_eq!(picked, spider);

        let picked = pick_spider_record(vec![other.clone()]).unwrap();
        assert_eq!(picked, other);

        assert!(pick_spider_record(Vec::new()).is_none());
    }
}
