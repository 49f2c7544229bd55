//! ```text
//! Path arguments ──► discovery::discover_files ──► ordered file list
//!
//! File ──► text::normalize ──► text::title ──► text::segment ──► candidates
//!
//! Candidates ──► ingestion::IngestionCoordinator ─┬─► embeddings::EmbeddingProvider
//!                                                 └─► stores::SegmentStore
//!                                                       (per-document commit)
//!
//! Stored segments ──► stats view & downstream retrieval
//! ```

pub mod config;
pub mod discovery;
pub mod embeddings;
pub mod ingestion;
pub mod stores;
pub mod text;
pub mod types;

pub use config::IngestConfig;
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider, OllamaEmbedder};
pub use ingestion::{DocumentOutcome, IngestionCoordinator, RunSummary, SegmentOutcome};
pub use stores::{MemorySegmentStore, SegmentMetadata, SegmentRecord, SegmentStore};
pub use types::IngestError;
