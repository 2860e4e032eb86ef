use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SpiderLogError {
    #[error("{0}")]
    #[diagnostic(help("fill in the required fields and try again"))]
    Validation(String),

    #[error("species not found: {0}")]
    SpeciesNotFound(u32),

    #[error("encounter not found: {0}")]
    EncounterNotFound(String),

    #[error("an encounter with id {0} already exists")]
    DuplicateEncounter(String),

    #[error("invalid encounter id: {0:?}")]
    InvalidEncounterId(String),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to parse stored encounters: {0}")]
    EncounterParse(String),

    #[error("remote store request failed: {0}")]
    RemoteHttp(String),

    #[error("remote store returned status {status}: {message}")]
    RemoteStatus { status: u16, message: String },

    #[error("animals API request failed: {0}")]
    AnimalsHttp(String),

    #[error("animals API returned status {status}: {message}")]
    AnimalsStatus { status: u16, message: String },

    #[error("no animals API record for {0}")]
    AnimalsEmpty(String),

    #[error("Unsplash request failed: {0}")]
    UnsplashHttp(String),

    #[error("Unsplash returned status {status}: {message}")]
    UnsplashStatus { status: u16, message: String },

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}
