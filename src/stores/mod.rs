//! Storage backends for embedded segments.
//!
//! [`SegmentStore`] is the narrow contract the coordinator writes through:
//! an existence lookup on the `(source_path, chunk_index)` identity key, an
//! atomic per-document upsert batch, and an aggregated count per source
//! type.  Backends:
//!
//! - [`postgres::PostgresSegmentStore`]: PostgreSQL with pgvector.
//! - [`memory::MemorySegmentStore`]: in-process map for tests and dry runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::IngestError;

pub use memory::MemorySegmentStore;
pub use postgres::PostgresSegmentStore;

/// Per-segment metadata persisted as JSON alongside the prose.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMetadata {
    /// File name of the source document.
    pub filename: String,
    /// Name of the source document's parent directory.
    pub parent: String,
    /// Character count of the segment text.
    pub chars: usize,
}

/// One segment ready for persistence.
///
/// `(source_path, chunk_index)` is the identity key: committing a record
/// whose key already exists overwrites the mutable columns and refreshes the
/// indexed timestamp, never duplicating the row.  `source_path`,
/// `chunk_index`, and `source_type` are immutable once set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Canonicalized path of the source document.
    pub source_path: String,
    /// Source format tag (`"markdown"`, `"text"`).
    pub source_type: String,
    /// Zero-based position within the document's segmentation.
    pub chunk_index: usize,
    /// Segment count this pass produced for the whole document.
    pub total_chunks: usize,
    /// Resolved document title.
    pub title: String,
    /// The segment's prose.
    pub text: String,
    /// Embedding vector; length is fixed by the provider.
    pub embedding: Vec<f32>,
    /// Filename / parent / char-count metadata.
    pub metadata: SegmentMetadata,
}

/// Aggregated indexed-count for one source type (the stats view).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTypeCount {
    pub source_type: String,
    pub indexed_count: i64,
}

/// Keyed, idempotent persistence for segments.
#[async_trait]
pub trait SegmentStore: Send + Sync {
    /// Whether a segment with this identity key is already indexed.
    async fn exists(&self, source_path: &str, chunk_index: usize) -> Result<bool, IngestError>;

    /// Upsert one document's surviving segments as a unit.
    ///
    /// Either every record lands (insert-or-overwrite on the identity key,
    /// timestamps refreshed) or none do.  Returns the number of records
    /// written.
    async fn commit_document(&self, segments: Vec<SegmentRecord>) -> Result<usize, IngestError>;

    /// Indexed-count per source type.
    async fn count_by_source_type(&self) -> Result<Vec<SourceTypeCount>, IngestError>;
}
