//! Workflow layer: per-item composition of services.

pub mod ingest_flow;

pub use ingest_flow::IngestFlow;
