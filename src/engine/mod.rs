// src/engine/mod.rs

//! Orchestration engine for monorun.
//!
//! The pure planning step (scan + probe → requests) lives in [`plan`]; the
//! async shell that pushes requests through an executor with the chosen
//! strategy lives in [`controller`].

pub mod controller;
pub mod plan;

pub use controller::Controller;
pub use plan::{build_plan, request_for, PlannedTask};
