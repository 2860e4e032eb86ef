use crate::backend::{BackendKind, EncounterBackend};
use crate::catalog::SpeciesCatalog;
use crate::domain::{Encounter, EncounterId, SpeciesId};
use crate::encounter::EncounterDraft;
use crate::error::SpiderLogError;

/// CRUD facade over the active backend.
///
/// Backend failures stop here: they are logged, reads come back empty and
/// writes become no-ops. Only validation errors reach the caller.
pub struct EncounterStore<B: EncounterBackend> {
    backend: B,
}

impl<B: EncounterBackend> EncounterStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Every encounter visible to the current identity, in backend order.
    pub fn list_all(&self) -> Vec<Encounter> {
        match self.backend.list() {
            Ok(encounters) => encounters,
            Err(err) => {
                tracing::error!(
                    backend = %self.backend.kind(),
                    error = %err,
                    "failed to load encounters"
                );
                Vec::new()
            }
        }
    }

    /// Validates `draft` against `catalog`, then persists it.
    ///
    /// `Ok(None)` means the write failed and was logged; the final state is
    /// unknown and callers should re-read.
    pub fn create(
        &self,
        draft: EncounterDraft,
        catalog: &SpeciesCatalog,
    ) -> Result<Option<Encounter>, SpiderLogError> {
        let encounter = draft.validate(catalog)?;
        let spider_id = encounter.spider_id;
        match self.backend.create(encounter) {
            Ok(record) => {
                tracing::info!(id = %record.id, spider_id, "encounter logged");
                Ok(Some(record))
            }
            Err(err) => {
                tracing::error!(
                    backend = %self.backend.kind(),
                    error = %err,
                    "failed to save encounter"
                );
                Ok(None)
            }
        }
    }

    pub fn get_by_id(&self, id: &EncounterId) -> Option<Encounter> {
        match self.backend.get(id) {
            Ok(found) => found,
            Err(err) => {
                tracing::error!(
                    backend = %self.backend.kind(),
                    %id,
                    error = %err,
                    "failed to load encounter"
                );
                None
            }
        }
    }

    pub fn list_by_species(&self, spider_id: SpeciesId) -> Vec<Encounter> {
        self.list_all()
            .into_iter()
            .filter(|encounter| encounter.spider_id == spider_id)
            .collect()
    }

    /// Idempotent; unknown ids and backend failures are both silent.
    pub fn delete_by_id(&self, id: &EncounterId) {
        match self.backend.delete(id) {
            Ok(()) => tracing::info!(%id, "encounter deleted"),
            Err(err) => {
                tracing::error!(
                    backend = %self.backend.kind(),
                    %id,
                    error = %err,
                    "failed to delete encounter"
                );
            }
        }
    }
}
