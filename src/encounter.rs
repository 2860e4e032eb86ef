use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::catalog::SpeciesCatalog;
use crate::domain::{Coordinates, Encounter, EncounterId, NewEncounter, SpeciesId};
use crate::error::SpiderLogError;

/// Raw user input for a new encounter, before validation.
#[derive(Debug, Clone, Default)]
pub struct EncounterDraft {
    pub id: Option<EncounterId>,
    pub spider_id: Option<SpeciesId>,
    pub date: Option<DateTime<Utc>>,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    /// Comma separated, as typed.
    pub companions: String,
    pub notes: String,
    pub photos: Option<Vec<String>>,
}

impl EncounterDraft {
    pub fn new(spider_id: SpeciesId, location: impl Into<String>) -> Self {
        Self {
            spider_id: Some(spider_id),
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn validate(self, catalog: &SpeciesCatalog) -> Result<NewEncounter, SpiderLogError> {
        let Some(spider_id) = self.spider_id else {
            return Err(SpiderLogError::Validation(
                "please select the spider you encountered".to_string(),
            ));
        };
        if self.location.trim().is_empty() {
            return Err(SpiderLogError::Validation(
                "please fill in the location".to_string(),
            ));
        }
        if catalog.get_by_id(spider_id).is_none() {
            return Err(SpiderLogError::Validation(format!(
                "unknown spider species: {spider_id}"
            )));
        }

        Ok(NewEncounter {
            id: self.id,
            spider_id,
            date: self.date.unwrap_or_else(Utc::now),
            location: self.location,
            coordinates: self.coordinates,
            companions: parse_companions(&self.companions),
            notes: self.notes,
            photos: self.photos,
        })
    }
}

/// Splits a comma separated companion list, trimming names and dropping blanks.
pub fn parse_companions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn sort_recent_first(encounters: &mut [Encounter]) {
    encounters.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn recent(mut encounters: Vec<Encounter>, limit: usize) -> Vec<Encounter> {
    sort_recent_first(&mut encounters);
    encounters.truncate(limit);
    encounters
}

/// Case-insensitive match on the encounter's species names, location,
/// companions and notes. A blank query keeps everything.
pub fn search_encounters<'a>(
    encounters: &'a [Encounter],
    catalog: &SpeciesCatalog,
    query: &str,
) -> Vec<&'a Encounter> {
    if query.trim().is_empty() {
        return encounters.iter().collect();
    }
    let needle = query.to_lowercase();
    encounters
        .iter()
        .filter(|encounter| {
            let species_hit = catalog.get_by_id(encounter.spider_id).is_some_and(|species| {
                species.common_name.to_lowercase().contains(&needle)
                    || species.scientific_name.to_lowercase().contains(&needle)
            });
            species_hit
                || encounter.location.to_lowercase().contains(&needle)
                || encounter
                    .companions
                    .iter()
                    .any(|companion| companion.to_lowercase().contains(&needle))
                || encounter.notes.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn count_by_species(encounters: &[Encounter]) -> BTreeMap<SpeciesId, usize> {
    let mut counts = BTreeMap::new();
    for encounter in encounters {
        *counts.entry(encounter.spider_id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn encounter(id: &str, spider_id: SpeciesId, date: &str) -> Encounter {
        Encounter {
            id: id.parse().unwrap(),
            spider_id,
            date: date.parse().unwrap(),
            location: "Shed".to_string(),
            coordinates: None,
            companions: Vec::new(),
            notes: String::new(),
            photos: None,
        }
    }

    #[test]
    fn companions_drop_blanks_and_trim() {
        assert_eq!(
            parse_companions("Ann, Bob,, Cara "),
            vec!["Ann".to_string(), "Bob".to_string(), "Cara".to_string()]
        );
        assert!(parse_companions("").is_empty());
        assert!(parse_companions(" , ,").is_empty());
    }

    #[test]
    fn validate_requires_location() {
        let catalog = SpeciesCatalog::seed();
        let err = EncounterDraft::new(2, "   ").validate(&catalog).unwrap_err();
        assert_matches!(err, SpiderLogError::Validation(_));
    }

    #[test]
    fn validate_requires_known_species() {
        let catalog = SpeciesCatalog::seed();
        let err = EncounterDraft::new(999, "Backyard")
            .validate(&catalog)
            .unwrap_err();
        assert_matches!(err, SpiderLogError::Validation(_));

        let missing = EncounterDraft {
            location: "Backyard".to_string(),
            ..EncounterDraft::default()
        };
        assert_matches!(
            missing.validate(&catalog),
            Err(SpiderLogError::Validation(_))
        );
    }

    #[test]
    fn validate_defaults_date_to_now() {
        let catalog = SpeciesCatalog::seed();
        let before = Utc::now();
        let new = EncounterDraft::new(2, " Backyard ")
            .validate(&catalog)
            .unwrap();
        assert!(new.date >= before);
        assert_eq!(new.location, " Backyard ");
        assert!(new.companions.is_empty());
    }

    #[test]
    fn recent_orders_newest_first_and_truncates() {
        let items = vec![
            encounter("a", 1, "2024-01-01T00:00:00Z"),
            encounter("b", 1, "2024-03-01T00:00:00Z"),
            encounter("c", 2, "2024-02-01T00:00:00Z"),
            encounter("d", 3, "2023-12-01T00:00:00Z"),
        ];
        let top = recent(items, 3);
        let ids: Vec<_> = top.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn search_hits_species_names_and_companions() {
        let catalog = SpeciesCatalog::seed();
        let mut with_friend = encounter("a", 5, "2024-01-01T00:00:00Z");
        with_friend.companions = vec!["Maria".to_string()];
        let widow = encounter("b", 2, "2024-01-02T00:00:00Z");
        let items = vec![with_friend, widow];

        let hits = search_encounters(&items, &catalog, "WIDOW");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "b");

        let hits = search_encounters(&items, &catalog, "mar");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "a");

        assert_eq!(search_encounters(&items, &catalog, "  ").len(), 2);
    }

    #[test]
    fn counts_group_by_species() {
        let items = vec![
            encounter("a", 1, "2024-01-01T00:00:00Z"),
            encounter("b", 1, "2024-01-02T00:00:00Z"),
            encounter("c", 4, "2024-01-03T00:00:00Z"),
        ];
        let counts = count_by_species(&items);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&4), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}
