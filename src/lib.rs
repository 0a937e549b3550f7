//! Workbench for the informatics exam problem sets on sdamgia.
//!
//! Two applications share this library. `ingest` scrapes a generated test
//! page, extracts each problem statement with its attachments and writes a
//! solution stub for the user to fill in. `check` executes or reads the
//! filled-in solutions, scrapes the official answers and renders an HTML
//! scoreboard.
//!
//! The code is layered: `infrastructure` owns scarce resources (the HTTP
//! client, the child-process runner), `services` are single business
//! capabilities, `workflow` composes services for one problem, and
//! `orchestrator` drives whole batches and owns the concurrency budget.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use config::Config;
pub use error::{AppError, Result};
pub use orchestrator::{CheckApp, IngestApp};
