//! Best-effort replacement of the seed catalog with live species data.
//!
//! Nothing here fails: a species whose lookup breaks becomes a placeholder
//! entry, a missing photo becomes [`PLACEHOLDER_PHOTO_URL`], and a missing
//! metadata credential hands back the fallback catalog untouched.

use std::thread;

use crate::catalog::SpeciesCatalog;
use crate::config::EnrichmentConfig;
use crate::domain::{DangerLevel, Species, SpeciesId};
use crate::error::SpiderLogError;
use crate::providers::animals::pick_spider_record;
use crate::providers::{
    AnimalRecord, AnimalsClient, AnimalsHttpClient, PhotoClient, UnsplashHttpClient,
};

pub const PLACEHOLDER_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1567563549378-36d2da7360b3?auto=format&fit=crop&w=800&q=80";

const DEFAULT_FAMILY: &str = "Araneidae";
const DEFAULT_HABITAT: &str = "Various habitats";
const DEFAULT_SIZE: &str = "Medium";

pub struct EnrichmentGateway<A: AnimalsClient, P: PhotoClient> {
    animals: Option<A>,
    photos: Option<P>,
    species: Vec<String>,
}

impl EnrichmentGateway<AnimalsHttpClient, UnsplashHttpClient> {
    /// Builds HTTP clients for whichever credentials are configured.
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        let animals = config.ninja_api_key.as_deref().and_then(|key| {
            AnimalsHttpClient::new(key)
                .inspect_err(|err| tracing::warn!(error = %err, "animals client unavailable"))
                .ok()
        });
        let photos = config.unsplash_access_key.as_deref().and_then(|key| {
            UnsplashHttpClient::new(key)
                .inspect_err(|err| tracing::warn!(error = %err, "photo client unavailable"))
                .ok()
        });
        Self::new(animals, photos, config.species.clone())
    }
}

impl<A: AnimalsClient, P: PhotoClient> EnrichmentGateway<A, P> {
    pub fn new(animals: Option<A>, photos: Option<P>, species: Vec<String>) -> Self {
        Self {
            animals,
            photos,
            species,
        }
    }

    /// Looks up every configured species concurrently. Ids follow list order,
    /// starting at 1.
    pub fn fetch_catalog(&self, fallback: &SpeciesCatalog) -> Vec<Species> {
        let Some(animals) = self.animals.as_ref() else {
            let err = SpiderLogError::MissingCredential(crate::config::NINJA_API_KEY_VAR);
            tracing::warn!(error = %err, "falling back to the built-in species catalog");
            return fallback.list_all().to_vec();
        };

        thread::scope(|scope| {
            let handles: Vec<_> = self
                .species
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    let id = index as SpeciesId + 1;
                    let handle = scope.spawn(move || self.fetch_species(animals, id, name));
                    (id, name, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, name, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        tracing::error!(species = %name, "species lookup panicked");
                        placeholder_species(id, name, PLACEHOLDER_PHOTO_URL.to_string())
                    })
                })
                .collect()
        })
    }

    /// Photo for `name`, or the placeholder when there is no credential, the
    /// request fails, or nothing matches.
    pub fn photo_for(&self, name: &str) -> String {
        let Some(photos) = self.photos.as_ref() else {
            tracing::debug!(species = %name, "no photo credential, using placeholder image");
            return PLACEHOLDER_PHOTO_URL.to_string();
        };
        match photos.search_photo(&photo_query(name)) {
            Ok(Some(url)) => url,
            Ok(None) => PLACEHOLDER_PHOTO_URL.to_string(),
            Err(err) => {
                tracing::warn!(species = %name, error = %err, "photo lookup failed");
                PLACEHOLDER_PHOTO_URL.to_string()
            }
        }
    }

    fn fetch_species(&self, animals: &A, id: SpeciesId, name: &str) -> Species {
        let record = animals.lookup(name).and_then(|records| {
            pick_spider_record(records)
                .ok_or_else(|| SpiderLogError::AnimalsEmpty(name.to_string()))
        });
        match record {
            Ok(record) => species_from_record(id, name, record, self.photo_for(name)),
            Err(err) => {
                tracing::warn!(
                    species = %name,
                    error = %err,
                    "species lookup failed, using placeholder"
                );
                placeholder_species(id, name, self.photo_for(name))
            }
        }
    }
}

pub fn species_from_record(
    id: SpeciesId,
    requested: &str,
    record: AnimalRecord,
    image_url: String,
) -> Species {
    let danger_level = infer_danger_level(&record);
    let characteristics = record.characteristics;
    Species {
        id,
        scientific_name: non_empty(record.taxonomy.scientific_name)
            .unwrap_or_else(|| "Unknown".to_string()),
        common_name: non_empty(Some(record.name)).unwrap_or_else(|| requested.to_string()),
        family: non_empty(record.taxonomy.family).unwrap_or_else(|| DEFAULT_FAMILY.to_string()),
        description: characteristics.distinctive_feature.unwrap_or_default(),
        habitat: non_empty(characteristics.habitat)
            .unwrap_or_else(|| DEFAULT_HABITAT.to_string()),
        image_url,
        danger_level,
        size: DEFAULT_SIZE.to_string(),
        region: parse_regions(characteristics.location.as_deref().unwrap_or_default()),
    }
}

pub fn placeholder_species(id: SpeciesId, requested: &str, image_url: String) -> Species {
    Species {
        id,
        scientific_name: format!("Araneae {requested}"),
        common_name: capitalize(requested),
        family: DEFAULT_FAMILY.to_string(),
        description: "A common species of spider.".to_string(),
        habitat: DEFAULT_HABITAT.to_string(),
        image_url,
        danger_level: DangerLevel::Harmless,
        size: DEFAULT_SIZE.to_string(),
        region: vec!["Unknown".to_string()],
    }
}

/// Keyword rules over temperament, name and distinctive feature. Any sign of
/// venom ranks as hostile, so inference never yields `Venomous`; that level
/// only comes from the built-in catalog.
pub fn infer_danger_level(record: &AnimalRecord) -> DangerLevel {
    let name = record.name.to_lowercase();
    let temperament = record
        .characteristics
        .temperament
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let feature = record
        .characteristics
        .distinctive_feature
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    let venomous = name.contains("venomous") || feature.contains("venom");
    let hostile = temperament.contains("aggressive")
        || temperament.contains("dangerous")
        || name.contains("deadly")
        || venomous;

    if hostile {
        DangerLevel::Dangerous
    } else if temperament.contains("mild") || temperament.contains("timid") {
        DangerLevel::MildlyVenomous
    } else {
        DangerLevel::Harmless
    }
}

/// Comma separated location text to region names. An empty field becomes
/// `["Unknown"]`; a field of bare separators yields no regions.
pub fn parse_regions(location: &str) -> Vec<String> {
    if location.is_empty() {
        return vec!["Unknown".to_string()];
    }
    location
        .split(',')
        .map(str::trim)
        .filter(|region| !region.is_empty())
        .map(str::to_string)
        .collect()
}

fn photo_query(name: &str) -> String {
    format!("{name} spider")
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
