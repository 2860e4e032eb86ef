use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use spider_log::app::{App, EncounterFilter, RECENT_LIMIT, SpeciesFilter};
use spider_log::backend::{BackendKind, LocalBackend};
use spider_log::catalog::SpeciesCatalog;
use spider_log::domain::{DangerLevel, Encounter};
use spider_log::encounter::EncounterDraft;
use spider_log::error::SpiderLogError;

fn app(temp: &tempfile::TempDir) -> App<LocalBackend> {
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    App::new(SpeciesCatalog::seed(), LocalBackend::new(&dir))
}

fn log(
    app: &App<LocalBackend>,
    spider_id: u32,
    location: &str,
    date: &str,
    companions: &str,
) -> Encounter {
    let draft = EncounterDraft {
        date: Some(date.parse().unwrap()),
        companions: companions.to_string(),
        ..EncounterDraft::new(spider_id, location)
    };
    let result = app.log_encounter(draft).unwrap();
    assert!(result.saved);
    result.encounter.unwrap()
}

#[test]
fn log_rejects_missing_location() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(&temp);
    let err = app
        .log_encounter(EncounterDraft::new(2, ""))
        .unwrap_err();
    assert_matches!(err, SpiderLogError::Validation(_));
}

#[test]
fn encounters_list_newest_first_with_species_names() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(&temp);
    log(&app, 1, "Garden", "2024-04-01T09:00:00Z", "");
    log(&app, 2, "Woodpile", "2024-06-01T09:00:00Z", "Ann, Bob");
    log(&app, 5, "Fence", "2024-05-01T09:00:00Z", "");

    let listed = app.list_encounters(&EncounterFilter::default());
    let places: Vec<_> = listed
        .encounters
        .iter()
        .map(|view| view.encounter.location.as_str())
        .collect();
    assert_eq!(places, vec!["Woodpile", "Fence", "Garden"]);
    assert_eq!(listed.encounters[0].species_name.as_deref(), Some("Black Widow"));

    let by_friend = app.list_encounters(&EncounterFilter {
        species: None,
        query: Some("bob".to_string()),
    });
    assert_eq!(by_friend.encounters.len(), 1);

    let by_species = app.list_encounters(&EncounterFilter {
        species: Some(1),
        query: None,
    });
    assert_eq!(by_species.encounters.len(), 1);
    assert_eq!(by_species.encounters[0].encounter.location, "Garden");
}

#[test]
fn species_detail_includes_its_encounters() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(&temp);
    log(&app, 3, "Closet", "2024-01-01T00:00:00Z", "");
    log(&app, 3, "Attic", "2024-02-01T00:00:00Z", "");
    log(&app, 4, "Kitchen", "2024-03-01T00:00:00Z", "");

    let detail = app.species_detail(3).unwrap();
    assert_eq!(detail.species.common_name, "Brown Recluse");
    let places: Vec<_> = detail.encounters.iter().map(|e| e.location.as_str()).collect();
    assert_eq!(places, vec!["Attic", "Closet"]);

    assert!(app.species_detail(6).unwrap().encounters.is_empty());
    assert!(app.species_detail(123).is_none());
}

#[test]
fn dangling_species_reference_still_shows_the_encounter() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let logged = log(&app(&temp), 7, "Trail", "2024-07-01T00:00:00Z", "");

    let orphan = App::new(SpeciesCatalog::new(Vec::new()), LocalBackend::new(&dir));
    let detail = orphan.encounter_detail(&logged.id).unwrap();
    assert_eq!(detail.encounter, logged);
    assert!(detail.species.is_none());
    assert_eq!(
        orphan.list_encounters(&EncounterFilter::default()).encounters[0].species_name,
        None
    );
}

#[test]
fn summary_counts_and_recent() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(&temp);
    let empty = app.summary();
    assert_eq!(empty.backend, BackendKind::Local);
    assert_eq!(empty.total_encounters, 0);
    assert_eq!(empty.catalog_size, 7);
    assert!(empty.recent.is_empty());

    log(&app, 1, "A", "2024-01-01T00:00:00Z", "");
    log(&app, 1, "B", "2024-01-02T00:00:00Z", "");
    log(&app, 2, "C", "2024-01-03T00:00:00Z", "");
    log(&app, 4, "D", "2024-01-04T00:00:00Z", "");

    let summary = app.summary();
    assert_eq!(summary.total_encounters, 4);
    assert_eq!(summary.species_seen, 3);
    assert_eq!(summary.recent.len(), RECENT_LIMIT);
    assert_eq!(summary.recent[0].encounter.location, "D");
}

#[test]
fn delete_then_detail_is_absent() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(&temp);
    let logged = log(&app, 2, "Backyard", "2024-01-01T00:00:00Z", "");
    let result = app.delete_encounter(&logged.id);
    assert_eq!(result.id, logged.id.to_string());
    assert!(app.encounter_detail(&logged.id).is_none());
    app.delete_encounter(&logged.id);
}

#[test]
fn species_filters_combine_query_and_danger() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(&temp);
    let garden = app.list_species(&SpeciesFilter {
        query: Some("garden".to_string()),
        danger: None,
    });
    assert!(garden.species.len() >= 3);

    let risky_gardens = app.list_species(&SpeciesFilter {
        query: Some("garden".to_string()),
        danger: Some(DangerLevel::MildlyVenomous),
    });
    let ids: Vec<_> = risky_gardens.species.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![7]);
}
