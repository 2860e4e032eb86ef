//! Persistence targets for encounter records.
//!
//! A backend is picked once per session by [`ActiveBackend::select`] and stays
//! fixed, so reads and writes never split across two stores.

use std::fmt;

use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::domain::{Encounter, EncounterId, NewEncounter};
use crate::error::SpiderLogError;
use crate::session::SessionProvider;

pub mod local;
pub mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Local,
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

/// Raw CRUD over one store. Errors are reported as-is; degrading them is the
/// job of [`crate::store::EncounterStore`].
pub trait EncounterBackend: Send + Sync {
    fn kind(&self) -> BackendKind;
    fn list(&self) -> Result<Vec<Encounter>, SpiderLogError>;
    /// Persists the record and returns it with its final id.
    fn create(&self, encounter: NewEncounter) -> Result<Encounter, SpiderLogError>;
    fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, SpiderLogError>;
    /// Missing ids are not an error.
    fn delete(&self, id: &EncounterId) -> Result<(), SpiderLogError>;
}

impl<T: EncounterBackend + ?Sized> EncounterBackend for &T {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn list(&self) -> Result<Vec<Encounter>, SpiderLogError> {
        (**self).list()
    }

    fn create(&self, encounter: NewEncounter) -> Result<Encounter, SpiderLogError> {
        (**self).create(encounter)
    }

    fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, SpiderLogError> {
        (**self).get(id)
    }

    fn delete(&self, id: &EncounterId) -> Result<(), SpiderLogError> {
        (**self).delete(id)
    }
}

pub enum ActiveBackend {
    Local(LocalBackend),
    Remote(RemoteBackend),
}

impl ActiveBackend {
    /// Remote when a session and a remote endpoint are both available,
    /// local device storage otherwise.
    pub fn select(config: &ResolvedConfig, sessions: &dyn SessionProvider) -> Self {
        let local = || ActiveBackend::Local(LocalBackend::new(&config.data_dir));

        let (Some(remote), Some(session)) = (config.remote.as_ref(), sessions.current_session())
        else {
            tracing::debug!(data_dir = %config.data_dir, "using local encounter storage");
            return local();
        };

        match RemoteBackend::new(remote, session) {
            Ok(backend) => {
                tracing::debug!(url = %remote.url, "using remote encounter storage");
                ActiveBackend::Remote(backend)
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote store unavailable, using local storage");
                local()
            }
        }
    }

    fn inner(&self) -> &dyn EncounterBackend {
        match self {
            ActiveBackend::Local(backend) => backend,
            ActiveBackend::Remote(backend) => backend,
        }
    }
}

impl EncounterBackend for ActiveBackend {
    fn kind(&self) -> BackendKind {
        self.inner().kind()
    }

    fn list(&self) -> Result<Vec<Encounter>, SpiderLogError> {
        self.inner().list()
    }

    fn create(&self, encounter: NewEncounter) -> Result<Encounter, SpiderLogError> {
        self.inner().create(encounter)
    }

    fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, SpiderLogError> {
        self.inner().get(id)
    }

    fn delete(&self, id: &EncounterId) -> Result<(), SpiderLogError> {
        self.inner().delete(id)
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::config::{EnrichmentConfig, RemoteConfig, default_enrichment_species};
    use crate::session::{NoSession, Session};

    fn config(remote: Option<RemoteConfig>) -> ResolvedConfig {
        ResolvedConfig {
            schema_version: 1,
            data_dir: Utf8PathBuf::from("/tmp/spider-log-test"),
            remote,
            enrichment: EnrichmentConfig {
                species: default_enrichment_species(),
                ninja_api_key: None,
                unsplash_access_key: None,
            },
        }
    }

    fn remote() -> RemoteConfig {
        RemoteConfig {
            url: "https://example.supabase.co".to_string(),
            anon_key: "anon".to_string(),
        }
    }

    #[test]
    fn local_without_session() {
        let backend = ActiveBackend::select(&config(Some(remote())), &NoSession);
        assert_eq!(backend.kind(), BackendKind::Local);
    }

    #[test]
    fn local_without_remote_config() {
        let session = Some(Session {
            user_id: "u1".to_string(),
            access_token: "token".to_string(),
        });
        let backend = ActiveBackend::select(&config(None), &session);
        assert_eq!(backend.kind(), BackendKind::Local);
    }

    #[test]
    fn remote_with_session_and_config() {
        let session = Some(Session {
            user_id: "u1".to_string(),
            access_token: "token".to_string(),
        });
        let backend = ActiveBackend::select(&config(Some(remote())), &session);
        assert_eq!(backend.kind(), BackendKind::Remote);
    }
}
