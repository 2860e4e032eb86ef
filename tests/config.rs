use std::collections::HashMap;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use spider_log::config::{
    Config, ConfigLoader, EnrichmentEntry, NINJA_API_KEY_VAR, REMOTE_ANON_KEY_VAR, REMOTE_URL_VAR,
    RemoteEntry, default_enrichment_species,
};
use spider_log::error::SpiderLogError;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn parse_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("spider-log.json");
    std::fs::write(
        &path,
        r#"{
            "data_dir": "/var/lib/spiders",
            "remote": {"url": "https://abc.supabase.co/", "anon_key": "anon"},
            "enrichment": {"species": ["tarantula"], "ninja_api_key": " key "}
        }"#,
    )
    .unwrap();

    let config = ConfigLoader::load(path.to_str()).unwrap();
    let resolved = ConfigLoader::resolve_with_env(config, env(&[])).unwrap();
    assert_eq!(resolved.schema_version, 1);
    assert_eq!(resolved.data_dir, Utf8PathBuf::from("/var/lib/spiders"));
    let remote = resolved.remote.unwrap();
    assert_eq!(remote.url, "https://abc.supabase.co");
    assert_eq!(resolved.enrichment.species, vec!["tarantula".to_string()]);
    assert_eq!(resolved.enrichment.ninja_api_key.as_deref(), Some("key"));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    let err = ConfigLoader::load(path.to_str()).unwrap_err();
    assert_matches!(err, SpiderLogError::ConfigRead(_));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("spider-log.json");
    std::fs::write(&path, "{\"remote\": 12").unwrap();
    let err = ConfigLoader::load(path.to_str()).unwrap_err();
    assert_matches!(err, SpiderLogError::ConfigParse(_));
}

#[test]
fn environment_overrides_file_values() {
    let config = Config {
        schema_version: Some(2),
        data_dir: Some("/tmp/spiders".to_string()),
        remote: Some(RemoteEntry {
            url: Some("https://file.example".to_string()),
            anon_key: Some("file-key".to_string()),
        }),
        enrichment: Some(EnrichmentEntry {
            species: Some(Vec::new()),
            ninja_api_key: Some("file-ninja".to_string()),
            unsplash_access_key: None,
        }),
    };
    let lookup = env(&[
        (NINJA_API_KEY_VAR, "env-ninja"),
        (REMOTE_URL_VAR, "https://env.example/"),
        (REMOTE_ANON_KEY_VAR, "  "),
    ]);

    let resolved = ConfigLoader::resolve_with_env(config, lookup).unwrap();
    assert_eq!(resolved.schema_version, 2);
    assert_eq!(resolved.enrichment.ninja_api_key.as_deref(), Some("env-ninja"));
    assert!(resolved.enrichment.unsplash_access_key.is_none());
    assert_eq!(resolved.enrichment.species, default_enrichment_species());

    let remote = resolved.remote.unwrap();
    assert_eq!(remote.url, "https://env.example");
    assert_eq!(remote.anon_key, "file-key");
}
