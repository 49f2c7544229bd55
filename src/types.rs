//! Error taxonomy for the ingestion pipeline.
//!
//! Only the embedding preflight is run-fatal; every other failure is scoped
//! to the document or segment it occurred in and reported through the
//! outcome types in [`crate::ingestion`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Filesystem failure while reading a document or walking a directory.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the embedding service.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The embedding service responded but no usable vector came back
    /// (non-success status, malformed body, timeout).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The persistent store rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid configuration (e.g. overlap not smaller than max size).
    #[error("configuration error: {0}")]
    Config(String),
}
