// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonorunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a project's `package.json` could not be turned into a script manifest.
///
/// None of these abort a run: the prober maps them onto a skip reason.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("no manifest at {0:?}")]
    Missing(PathBuf),

    #[error("manifest {path:?} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("manifest {path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, MonorunError>;
