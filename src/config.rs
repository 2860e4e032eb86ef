use std::env;
use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::SpiderLogError;

pub const DEFAULT_CONFIG_FILE: &str = "spider-log.json";

pub const NINJA_API_KEY_VAR: &str = "SPIDER_LOG_NINJA_API_KEY";
pub const UNSPLASH_ACCESS_KEY_VAR: &str = "SPIDER_LOG_UNSPLASH_ACCESS_KEY";
pub const REMOTE_URL_VAR: &str = "SPIDER_LOG_REMOTE_URL";
pub const REMOTE_ANON_KEY_VAR: &str = "SPIDER_LOG_REMOTE_ANON_KEY";
pub const DATA_DIR_VAR: &str = "SPIDER_LOG_DATA_DIR";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub remote: Option<RemoteEntry>,
    #[serde(default)]
    pub enrichment: Option<EnrichmentEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RemoteEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EnrichmentEntry {
    #[serde(default)]
    pub species: Option<Vec<String>>,
    #[serde(default)]
    pub ninja_api_key: Option<String>,
    #[serde(default)]
    pub unsplash_access_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    pub species: Vec<String>,
    pub ninja_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub data_dir: Utf8PathBuf,
    pub remote: Option<RemoteConfig>,
    pub enrichment: EnrichmentConfig,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `spider-log.json` in the current directory when it exists.
    /// Without either, every setting comes from the environment and defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, SpiderLogError> {
        Self::resolve_config(Self::load(path)?)
    }

    /// Reads the config file without consulting the environment.
    pub fn load(path: Option<&str>) -> Result<Config, SpiderLogError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|_| SpiderLogError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| SpiderLogError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, SpiderLogError> {
        Self::resolve_with_env(config, |name| env::var(name).ok())
    }

    /// Environment values win over file values for credentials and endpoints.
    pub fn resolve_with_env<F>(config: Config, lookup: F) -> Result<ResolvedConfig, SpiderLogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let schema_version = config.schema_version.unwrap_or(1);

        let data_dir = match var(DATA_DIR_VAR).or(config.data_dir) {
            Some(dir) => Utf8PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let remote_entry = config.remote.unwrap_or_default();
        let remote_url = var(REMOTE_URL_VAR).or_else(|| non_blank(remote_entry.url));
        let remote_key = var(REMOTE_ANON_KEY_VAR).or_else(|| non_blank(remote_entry.anon_key));
        let remote = match (remote_url, remote_key) {
            (Some(url), Some(anon_key)) => Some(RemoteConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            (Some(_), None) => {
                tracing::warn!("remote store URL configured without an anon key; ignoring");
                None
            }
            _ => None,
        };

        let enrichment_entry = config.enrichment.unwrap_or_default();
        let species = enrichment_entry
            .species
            .filter(|names| !names.is_empty())
            .unwrap_or_else(default_enrichment_species);
        let enrichment = EnrichmentConfig {
            species,
            ninja_api_key: var(NINJA_API_KEY_VAR)
                .or_else(|| non_blank(enrichment_entry.ninja_api_key)),
            unsplash_access_key: var(UNSPLASH_ACCESS_KEY_VAR)
                .or_else(|| non_blank(enrichment_entry.unsplash_access_key)),
        };

        Ok(ResolvedConfig {
            schema_version,
            data_dir,
            remote,
            enrichment,
        })
    }
}

pub fn default_enrichment_species() -> Vec<String> {
    [
        "tarantula",
        "wolf spider",
        "jumping spider",
        "orb weaver",
        "black widow",
        "brown recluse",
        "funnel-web",
        "huntsman spider",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

fn default_data_dir() -> Result<Utf8PathBuf, SpiderLogError> {
    BaseDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_dir().join("spider-log")).ok())
        .ok_or_else(|| SpiderLogError::Filesystem("unable to resolve data directory".to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config {
            data_dir: Some("/tmp/spiders".to_string()),
            ..Config::default()
        };

        let resolved = ConfigLoader::resolve_with_env(config, |_| None).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.data_dir, Utf8PathBuf::from("/tmp/spiders"));
        assert!(resolved.remote.is_none());
        assert_eq!(resolved.enrichment.species, default_enrichment_species());
        assert!(resolved.enrichment.ninja_api_key.is_none());
    }

    #[test]
    fn remote_needs_both_url_and_key() {
        let config = Config {
            data_dir: Some("/tmp/spiders".to_string()),
            remote: Some(RemoteEntry {
                url: Some("https://example.supabase.co/".to_string()),
                anon_key: None,
            }),
            ..Config::default()
        };
        let resolved = ConfigLoader::resolve_with_env(config, |_| None).unwrap();
        assert!(resolved.remote.is_none());
    }
}
