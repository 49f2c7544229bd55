//! Embedding providers: the [`EmbeddingProvider`] contract, the HTTP-backed
//! [`OllamaEmbedder`], and a deterministic [`MockEmbeddingProvider`] for
//! tests and offline runs.
//!
//! The coordinator treats every provider failure uniformly as "no embedding
//! available"; subtypes matter only for logging.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::IngestConfig;
use crate::types::IngestError;

/// Text → fixed-length vector, or failure.
///
/// `health_check` is probed exactly once before a run touches any document;
/// an unavailable provider aborts the run at that point.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IngestError>;

    async fn health_check(&self) -> Result<(), IngestError>;
}

// ── OllamaEmbedder ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedding client for an Ollama-compatible HTTP service.
#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    request_timeout: Duration,
    preflight_timeout: Duration,
}

impl OllamaEmbedder {
    /// Create a client for `base_url` using `model`, with the default
    /// request (60 s) and preflight (5 s) timeouts.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            request_timeout: Duration::from_secs(60),
            preflight_timeout: Duration::from_secs(5),
        }
    }

    /// Build a client from an [`IngestConfig`].
    pub fn from_config(config: &IngestConfig) -> Self {
        let mut embedder = Self::new(&config.embedding_url, &config.embedding_model);
        embedder.request_timeout = config.embedding_timeout;
        embedder.preflight_timeout = config.preflight_timeout;
        embedder
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IngestError> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .timeout(self.request_timeout)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IngestError::Embedding(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| IngestError::Embedding(format!("malformed response: {err}")))?;

        if body.embedding.is_empty() {
            return Err(IngestError::Embedding("empty embedding vector".to_string()));
        }
        Ok(body.embedding)
    }

    async fn health_check(&self) -> Result<(), IngestError> {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.preflight_timeout)
            .send()
            .await
            .map_err(|err| {
                IngestError::Embedding(format!(
                    "embedding service unavailable at {}: {err}",
                    self.base_url
                ))
            })?
            .error_for_status()
            .map_err(|err| IngestError::Embedding(err.to_string()))?;
        Ok(())
    }
}

// ── MockEmbeddingProvider ──────────────────────────────────────────────

/// Deterministic provider for tests: identical text yields an identical
/// vector, distinct text (almost always) a distinct one.  Can be flipped
/// into an always-failing mode to exercise failure paths.
#[derive(Debug, Default)]
pub struct MockEmbeddingProvider {
    dimension: usize,
    fail: bool,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            dimension: 8,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// A provider whose every `embed` call fails.
    pub fn failing() -> Self {
        Self {
            dimension: 8,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed` calls made so far (successful or not).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        // Splitmix-style scramble of a byte-wise seed; deterministic and
        // cheap, with enough diffusion to separate similar inputs.
        let mut seed = text
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
                (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            });
        (0..self.dimension)
            .map(|_| {
                seed = seed
                    .wrapping_add(0x9e37_79b9_7f4a_7c15)
                    .wrapping_mul(0xbf58_476d_1ce4_e5b9);
                let unit = (seed >> 40) as f32 / (1u64 << 24) as f32;
                unit * 2.0 - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IngestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(IngestError::Embedding("mock provider set to fail".to_string()));
        }
        Ok(self.vector_for(text))
    }

    async fn health_check(&self) -> Result<(), IngestError> {
        Ok(())
    }
}
