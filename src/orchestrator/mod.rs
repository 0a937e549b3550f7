//! Orchestration layer: owns scarce resources and drives the batch.

pub mod check;
pub mod ingest;

pub use check::CheckApp;
pub use ingest::{IngestApp, Selection};
