// src/config/mod.rs

//! Run configuration for monorun.
//!
//! Responsibilities:
//! - Define the optional TOML file model and the resolved [`RunConfig`]
//!   (`model.rs`).
//! - Load the file from disk when present (`loader.rs`).
//! - Capture the process environment once (`env.rs`).
//! - Merge CLI overrides, environment, file and defaults into one immutable
//!   `RunConfig`, rejecting nonsensical values (`validate.rs`).
//!
//! Nothing downstream of `RunConfig::resolve` reads flags or environment
//! variables on its own.

pub mod env;
pub mod loader;
pub mod model;
pub mod validate;

pub use env::EnvSnapshot;
pub use loader::{load_from_path, load_optional};
pub use model::{
    Operation, RawConfigFile, RunConfig, RunOverrides, TimeoutSection, UpdateSection,
    WorkspaceSection,
};
