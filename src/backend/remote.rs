use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendKind, EncounterBackend};
use crate::config::RemoteConfig;
use crate::domain::{Coordinates, Encounter, EncounterId, NewEncounter, SpeciesId};
use crate::error::SpiderLogError;
use crate::http::{build_client, failure_details, send_with_retries};
use crate::session::Session;

pub const TABLE: &str = "encounters";

/// Row store reached through a PostgREST endpoint. Every query is scoped to the
/// session's user and every insert is stamped with it.
#[derive(Clone)]
pub struct RemoteBackend {
    client: Client,
    table_url: String,
    anon_key: String,
    session: Session,
}

impl RemoteBackend {
    pub fn new(config: &RemoteConfig, session: Session) -> Result<Self, SpiderLogError> {
        let client = build_client(Duration::from_secs(30))
            .map_err(|err| SpiderLogError::RemoteHttp(err.to_string()))?;
        Ok(Self {
            client,
            table_url: Self::table_url(&config.url),
            anon_key: config.anon_key.clone(),
            session,
        })
    }

    pub fn table_url(base: &str) -> String {
        format!("{}/rest/v1/{TABLE}", base.trim_end_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.session.access_token)
    }

    fn fetch_rows(&self, query: Vec<QueryParam>) -> Result<Vec<EncounterRow>, SpiderLogError> {
        let response = send_with_retries(|| {
            self.authorized(self.client.get(&self.table_url).query(&query))
        })
        .map_err(|err| SpiderLogError::RemoteHttp(err.to_string()))?;
        if !response.status().is_success() {
            let (status, message) = failure_details(response, "remote query failed");
            return Err(SpiderLogError::RemoteStatus { status, message });
        }
        response
            .json()
            .map_err(|err| SpiderLogError::RemoteHttp(err.to_string()))
    }
}

impl EncounterBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn list(&self) -> Result<Vec<Encounter>, SpiderLogError> {
        self.fetch_rows(select_query(&self.session.user_id, None))?
            .into_iter()
            .map(EncounterRow::into_encounter)
            .collect()
    }

    fn create(&self, encounter: NewEncounter) -> Result<Encounter, SpiderLogError> {
        let row = InsertRow::new(&encounter, &self.session.user_id);
        // Inserts are not retried; a timed-out insert may still have landed.
        let response = self
            .authorized(self.client.post(&self.table_url))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .map_err(|err| SpiderLogError::RemoteHttp(err.to_string()))?;
        if !response.status().is_success() {
            let (status, message) = failure_details(response, "remote insert failed");
            return Err(SpiderLogError::RemoteStatus { status, message });
        }
        let rows: Vec<EncounterRow> = response
            .json()
            .map_err(|err| SpiderLogError::RemoteHttp(err.to_string()))?;
        single_row(rows)
            .ok_or_else(|| SpiderLogError::RemoteHttp("insert returned no row".to_string()))?
            .into_encounter()
    }

    fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, SpiderLogError> {
        let rows = self.fetch_rows(select_query(&self.session.user_id, Some(id)))?;
        single_row(rows).map(EncounterRow::into_encounter).transpose()
    }

    fn delete(&self, id: &EncounterId) -> Result<(), SpiderLogError> {
        let query = delete_query(&self.session.user_id, id);
        let response = send_with_retries(|| {
            self.authorized(self.client.delete(&self.table_url).query(&query))
        })
        .map_err(|err| SpiderLogError::RemoteHttp(err.to_string()))?;
        if !response.status().is_success() {
            let (status, message) = failure_details(response, "remote delete failed");
            return Err(SpiderLogError::RemoteStatus { status, message });
        }
        Ok(())
    }
}

pub type QueryParam = (&'static str, String);

/// Select parameters scoped to `user_id`, newest first, optionally narrowed to
/// one id.
pub fn select_query(user_id: &str, id: Option<&EncounterId>) -> Vec<QueryParam> {
    let mut query = vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{user_id}")),
    ];
    if let Some(id) = id {
        query.push(("id", format!("eq.{id}")));
    }
    query.push(("order", "date.desc".to_string()));
    query
}

pub fn delete_query(user_id: &str, id: &EncounterId) -> Vec<QueryParam> {
    vec![
        ("id", format!("eq.{id}")),
        ("user_id", format!("eq.{user_id}")),
    ]
}

/// Exactly one row counts as found. Zero or several rows are treated as absent.
pub fn single_row<T>(mut rows: Vec<T>) -> Option<T> {
    if rows.len() == 1 { rows.pop() } else { None }
}

#[derive(Debug, Serialize)]
pub struct InsertRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub user_id: &'a str,
    pub spider_id: SpeciesId,
    pub date: DateTime<Utc>,
    pub location: &'a str,
    pub coordinates: Option<Coordinates>,
    pub companions: &'a [String],
    pub notes: &'a str,
    pub photos: Option<&'a [String]>,
}

impl<'a> InsertRow<'a> {
    pub fn new(encounter: &'a NewEncounter, user_id: &'a str) -> Self {
        Self {
            id: encounter.id.as_ref().map(EncounterId::as_str),
            user_id,
            spider_id: encounter.spider_id,
            date: encounter.date,
            location: &encounter.location,
            coordinates: encounter.coordinates,
            companions: &encounter.companions,
            notes: &encounter.notes,
            photos: encounter.photos.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncounterRow {
    pub id: String,
    pub spider_id: SpeciesId,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub companions: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

impl EncounterRow {
    pub fn into_encounter(self) -> Result<Encounter, SpiderLogError> {
        let companions = self
            .companions
            .unwrap_or_default()
            .into_iter()
            .filter(|name| !name.trim().is_empty())
            .collect();
        Ok(Encounter {
            id: self.id.parse()?,
            spider_id: self.spider_id,
            date: self.date,
            location: self.location,
            coordinates: self.coordinates,
            companions,
            notes: self.notes.unwrap_or_default(),
            photos: self.photos,
        })
    }
}
