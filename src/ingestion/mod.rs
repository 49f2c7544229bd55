//! The ingestion pipeline: per-document orchestration and the structured
//! outcome types it reports through.

pub mod outcome;
pub mod pipeline;

pub use outcome::{DocumentOutcome, DocumentReport, RunSummary, SegmentOutcome};
pub use pipeline::IngestionCoordinator;
