use serde::Serialize;

use crate::backend::{ActiveBackend, BackendKind, EncounterBackend};
use crate::catalog::SpeciesCatalog;
use crate::config::ResolvedConfig;
use crate::domain::{DangerLevel, Encounter, EncounterId, Species, SpeciesId};
use crate::encounter::{self, EncounterDraft};
use crate::enrichment::EnrichmentGateway;
use crate::error::SpiderLogError;
use crate::providers::{AnimalsClient, PhotoClient};
use crate::session::SessionProvider;
use crate::store::EncounterStore;

/// Encounters shown on the dashboard.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SpeciesFilter {
    pub query: Option<String>,
    pub danger: Option<DangerLevel>,
}

#[derive(Debug, Clone, Default)]
pub struct EncounterFilter {
    pub species: Option<SpeciesId>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesListResult {
    pub species: Vec<Species>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesDetail {
    pub species: Species,
    pub encounters: Vec<Encounter>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterView {
    #[serde(flatten)]
    pub encounter: Encounter,
    pub species_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncounterListResult {
    pub encounters: Vec<EncounterView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncounterDetail {
    pub encounter: Encounter,
    /// `None` when the encounter points at a species the catalog lacks.
    pub species: Option<Species>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogResult {
    pub saved: bool,
    pub encounter: Option<Encounter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub backend: BackendKind,
    pub catalog_size: usize,
    pub total_encounters: usize,
    pub species_seen: usize,
    pub recent: Vec<EncounterView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentReport {
    pub species: usize,
}

pub struct App<B: EncounterBackend> {
    catalog: SpeciesCatalog,
    encounters: EncounterStore<B>,
}

impl App<ActiveBackend> {
    /// Seed catalog plus whichever backend the session allows. The backend is
    /// fixed for the lifetime of the returned `App`.
    pub fn bootstrap(config: &ResolvedConfig, sessions: &dyn SessionProvider) -> Self {
        let backend = ActiveBackend::select(config, sessions);
        Self::new(SpeciesCatalog::seed(), backend)
    }
}

impl<B: EncounterBackend> App<B> {
    pub fn new(catalog: SpeciesCatalog, backend: B) -> Self {
        Self {
            catalog,
            encounters: EncounterStore::new(backend),
        }
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &EncounterStore<B> {
        &self.encounters
    }

    /// Swaps in whatever the gateway produces; never merges.
    pub fn enrich<A: AnimalsClient, P: PhotoClient>(
        &mut self,
        gateway: &EnrichmentGateway<A, P>,
    ) -> EnrichmentReport {
        let species = gateway.fetch_catalog(&self.catalog);
        tracing::info!(count = species.len(), "species catalog loaded");
        self.catalog.replace(species);
        EnrichmentReport {
            species: self.catalog.len(),
        }
    }

    pub fn list_species(&self, filter: &SpeciesFilter) -> SpeciesListResult {
        let species = self
            .catalog
            .search(filter.query.as_deref().unwrap_or_default())
            .into_iter()
            .filter(|species| filter.danger.is_none_or(|level| species.danger_level == level))
            .cloned()
            .collect();
        SpeciesListResult { species }
    }

    pub fn species_detail(&self, id: SpeciesId) -> Option<SpeciesDetail> {
        let species = self.catalog.get_by_id(id)?.clone();
        let mut encounters = self.encounters.list_by_species(id);
        encounter::sort_recent_first(&mut encounters);
        Some(SpeciesDetail {
            species,
            encounters,
        })
    }

    pub fn list_encounters(&self, filter: &EncounterFilter) -> EncounterListResult {
        let mut all = match filter.species {
            Some(id) => self.encounters.list_by_species(id),
            None => self.encounters.list_all(),
        };
        encounter::sort_recent_first(&mut all);
        let query = filter.query.as_deref().unwrap_or_default();
        let encounters = encounter::search_encounters(&all, &self.catalog, query)
            .into_iter()
            .map(|found| self.view(found.clone()))
            .collect();
        EncounterListResult { encounters }
    }

    pub fn encounter_detail(&self, id: &EncounterId) -> Option<EncounterDetail> {
        let encounter = self.encounters.get_by_id(id)?;
        let species = self.catalog.get_by_id(encounter.spider_id).cloned();
        Some(EncounterDetail { encounter, species })
    }

    pub fn log_encounter(&self, draft: EncounterDraft) -> Result<LogResult, SpiderLogError> {
        let encounter = self.encounters.create(draft, &self.catalog)?;
        Ok(LogResult {
            saved: encounter.is_some(),
            encounter,
        })
    }

    pub fn delete_encounter(&self, id: &EncounterId) -> DeleteResult {
        self.encounters.delete_by_id(id);
        DeleteResult { id: id.to_string() }
    }

    pub fn summary(&self) -> Summary {
        let all = self.encounters.list_all();
        let species_seen = encounter::count_by_species(&all).len();
        let total_encounters = all.len();
        let recent = encounter::recent(all, RECENT_LIMIT)
            .into_iter()
            .map(|found| self.view(found))
            .collect();
        Summary {
            backend: self.encounters.backend_kind(),
            catalog_size: self.catalog.len(),
            total_encounters,
            species_seen,
            recent,
        }
    }

    fn view(&self, encounter: Encounter) -> EncounterView {
        let species_name = self
            .catalog
            .get_by_id(encounter.spider_id)
            .map(|species| species.common_name.clone());
        EncounterView {
            encounter,
            species_name,
        }
    }
}
