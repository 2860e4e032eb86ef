use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::Builder;

use crate::backend::{BackendKind, EncounterBackend};
use crate::domain::{Encounter, EncounterId, NewEncounter};
use crate::error::SpiderLogError;

/// Name of the single slot holding every local encounter.
pub const STORAGE_KEY: &str = "spider-encounters";

/// Device-local storage: one JSON array in `<data_dir>/spider-encounters.json`.
///
/// Every operation reads or rewrites the whole slot. Two processes writing at
/// once race and the last rename wins.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    path: Utf8PathBuf,
}

impl LocalBackend {
    pub fn new(data_dir: &Utf8Path) -> Self {
        Self {
            path: data_dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Encounter>, SpiderLogError> {
        let content = match fs::read_to_string(self.path.as_std_path()) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(SpiderLogError::Filesystem(err.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .map_err(|err| SpiderLogError::EncounterParse(err.to_string()))
    }

    fn write_all(&self, encounters: &[Encounter]) -> Result<(), SpiderLogError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| SpiderLogError::Filesystem("invalid storage path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| SpiderLogError::Filesystem(err.to_string()))?;
        let content = serde_json::to_vec_pretty(encounters)
            .map_err(|err| SpiderLogError::Filesystem(err.to_string()))?;
        let mut temp = Builder::new()
            .prefix(".spider-encounters")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| SpiderLogError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| SpiderLogError::Filesystem(err.to_string()))?;
        temp.persist(self.path.as_std_path())
            .map_err(|err| SpiderLogError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

impl EncounterBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn list(&self) -> Result<Vec<Encounter>, SpiderLogError> {
        self.read_all()
    }

    fn create(&self, encounter: NewEncounter) -> Result<Encounter, SpiderLogError> {
        let mut encounters = self.read_all()?;
        let id = encounter.id.clone().unwrap_or_else(EncounterId::generate);
        if encounters.iter().any(|existing| existing.id == id) {
            return Err(SpiderLogError::DuplicateEncounter(id.to_string()));
        }
        let record = encounter.into_encounter(id);
        encounters.push(record.clone());
        self.write_all(&encounters)?;
        Ok(record)
    }

    fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, SpiderLogError> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|encounter| &encounter.id == id))
    }

    fn delete(&self, id: &EncounterId) -> Result<(), SpiderLogError> {
        let mut encounters = self.read_all()?;
        let before = encounters.len();
        encounters.retain(|encounter| &encounter.id != id);
        if encounters.len() == before {
            return Ok(());
        }
        self.write_all(&encounters)
    }
}
