//! Ingestion configuration.
//!
//! All knobs live in one explicit [`IngestConfig`] passed to the coordinator
//! at construction; nothing reads the process environment behind the
//! caller's back. [`IngestConfig::from_env`] is the single opt-in point for
//! `.env` / environment overrides.

use std::time::Duration;

use crate::types::IngestError;

/// Configuration for one ingestion run.
///
/// Uses a builder pattern; all setters are `#[must_use]`.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// PostgreSQL connection string.  Default: `postgres://localhost:5432/chunkmill`.
    pub database_url: String,
    /// Base URL of the embedding service.  Default: `http://localhost:11434`.
    pub embedding_url: String,
    /// Model identifier sent with each embedding request.
    pub embedding_model: String,
    /// Vector dimension used when provisioning the pgvector column.
    pub embedding_dimension: usize,
    /// Timeout for a single embedding request.
    pub embedding_timeout: Duration,
    /// Timeout for the one-shot availability probe before the run starts.
    pub preflight_timeout: Duration,
    /// Maximum characters per segment.
    pub max_segment_chars: usize,
    /// Characters of overlap between consecutive segments.
    pub overlap_chars: usize,
    /// Documents whose cleaned text is shorter than this yield zero segments.
    pub min_document_chars: usize,
    /// Candidate segments shorter than this are dropped before embedding.
    pub min_segment_chars: usize,
    /// Reprocess segments whose key already exists in the store.
    pub force: bool,
    /// Cap on the number of files processed in this run.
    pub file_limit: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost:5432/chunkmill".to_string(),
            embedding_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dimension: 768,
            embedding_timeout: Duration::from_secs(60),
            preflight_timeout: Duration::from_secs(5),
            max_segment_chars: 1500,
            overlap_chars: 200,
            min_document_chars: 50,
            min_segment_chars: 30,
            force: false,
            file_limit: None,
        }
    }
}

impl IngestConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `DATABASE_URL`, `EMBEDDING_URL`, and
    /// `EMBEDDING_MODEL` when present (a `.env` file is honored).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(url) = std::env::var("EMBEDDING_URL") {
            config.embedding_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        config
    }

    /// Set the PostgreSQL connection string.
    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Set the embedding service base URL.
    #[must_use]
    pub fn with_embedding_url(mut self, url: impl Into<String>) -> Self {
        self.embedding_url = url.into();
        self
    }

    /// Set the embedding model identifier.
    #[must_use]
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the segment window size and overlap.
    #[must_use]
    pub fn with_window(mut self, max_segment_chars: usize, overlap_chars: usize) -> Self {
        self.max_segment_chars = max_segment_chars;
        self.overlap_chars = overlap_chars;
        self
    }

    /// Enable or disable force reprocessing.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Cap the number of files processed per run.
    #[must_use]
    pub fn with_file_limit(mut self, limit: Option<usize>) -> Self {
        self.file_limit = limit;
        self
    }

    /// Check the invariant `overlap_chars < max_segment_chars` (and that the
    /// window is non-degenerate).  Called once by the coordinator.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.max_segment_chars == 0 {
            return Err(IngestError::Config(
                "max_segment_chars must be positive".to_string(),
            ));
        }
        if self.overlap_chars >= self.max_segment_chars {
            return Err(IngestError::Config(format!(
                "overlap ({}) must be smaller than max segment size ({})",
                self.overlap_chars, self.max_segment_chars
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = IngestConfig::default();
        assert_eq!(config.max_segment_chars, 1500);
        assert_eq!(config.overlap_chars, 200);
        assert_eq!(config.min_document_chars, 50);
        assert_eq!(config.min_segment_chars, 30);
        assert!(!config.force);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overlap_must_stay_below_window() {
        let config = IngestConfig::new().with_window(100, 100);
        assert!(config.validate().is_err());

        let config = IngestConfig::new().with_window(100, 99);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = IngestConfig::new()
            .with_database_url("postgres://db/kb")
            .with_embedding_model("all-minilm")
            .with_force(true)
            .with_file_limit(Some(5));
        assert_eq!(config.database_url, "postgres://db/kb");
        assert_eq!(config.embedding_model, "all-minilm");
        assert!(config.force);
        assert_eq!(config.file_limit, Some(5));
    }
}
