//! The per-document ingestion state machine.
//!
//! One document at a time, synchronously: read → title → normalize → length
//! gate → segment → per segment: length gate → existence check → embed →
//! collect → one atomic commit for the whole document.  Segments within a
//! document stay strictly sequential so the existence check cannot race
//! against this run's own writes.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::IngestConfig;
use crate::discovery::{DEFAULT_EXTENSIONS, discover_files};
use crate::embeddings::EmbeddingProvider;
use crate::ingestion::outcome::{DocumentOutcome, DocumentReport, RunSummary, SegmentOutcome};
use crate::stores::{SegmentMetadata, SegmentRecord, SegmentStore};
use crate::text::{clean_markup, resolve_title, segment};
use crate::types::IngestError;

/// Drives normalization, segmentation, embedding, and persistence for a set
/// of documents.
pub struct IngestionCoordinator<E, S> {
    embedder: E,
    store: S,
    config: IngestConfig,
}

impl<E, S> IngestionCoordinator<E, S>
where
    E: EmbeddingProvider,
    S: SegmentStore,
{
    /// Validates the window invariant once, up front.
    pub fn new(embedder: E, store: S, config: IngestConfig) -> Result<Self, IngestError> {
        config.validate()?;
        Ok(Self {
            embedder,
            store,
            config,
        })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Ingest every discoverable file under `paths`.
    ///
    /// The embedding capability is probed exactly once before any document
    /// is touched; an unavailable provider aborts the run here.  After that,
    /// failures are scoped to their document or segment and the run always
    /// continues.
    pub async fn run(&self, paths: &[PathBuf]) -> Result<RunSummary, IngestError> {
        self.embedder.health_check().await?;

        let mut files = discover_files(paths, DEFAULT_EXTENSIONS).await?;
        if let Some(limit) = self.config.file_limit {
            files.truncate(limit);
        }
        info!(files = files.len(), force = self.config.force, "starting ingestion run");

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            let outcome = self.process_document(&path).await;
            info!(
                path = %path.display(),
                outcome = outcome.variant_name(),
                stored = outcome.stored_count(),
                "document finished"
            );
            documents.push(DocumentReport { path, outcome });
        }

        let summary = RunSummary { documents };
        info!(
            files_processed = summary.files_processed(),
            segments_stored = summary.segments_stored(),
            "ingestion run complete"
        );
        Ok(summary)
    }

    /// Run one document through the full state machine.
    ///
    /// Never returns an error: every failure mode maps to a
    /// [`DocumentOutcome`] so sibling documents are unaffected.
    pub async fn process_document(&self, path: &Path) -> DocumentOutcome {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read document");
                return DocumentOutcome::ReadFailed {
                    reason: err.to_string(),
                };
            }
        };

        let source_path = canonical_source_path(path);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let title = resolve_title(&raw, stem);
        let cleaned = clean_markup(&raw);

        let cleaned_chars = cleaned.chars().count();
        if cleaned_chars < self.config.min_document_chars {
            debug!(path = %path.display(), chars = cleaned_chars, "document below content threshold");
            return DocumentOutcome::BelowThreshold {
                chars: cleaned_chars,
            };
        }

        let segments = segment(
            &cleaned,
            self.config.max_segment_chars,
            self.config.overlap_chars,
        );
        let total_chunks = segments.len();
        let source_type = source_type_for(path);
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let parent = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let mut outcomes = Vec::with_capacity(total_chunks);
        let mut records = Vec::new();

        for (chunk_index, text) in segments.into_iter().enumerate() {
            let chars = text.chars().count();
            if chars < self.config.min_segment_chars {
                outcomes.push(SegmentOutcome::TooShort { chars });
                continue;
            }

            if !self.config.force {
                match self.store.exists(&source_path, chunk_index).await {
                    Ok(true) => {
                        outcomes.push(SegmentOutcome::AlreadyIndexed);
                        continue;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        warn!(path = %path.display(), chunk_index, %err, "existence check failed");
                        return DocumentOutcome::StoreFailed {
                            reason: err.to_string(),
                        };
                    }
                }
            }

            match self.embedder.embed(&text).await {
                Ok(embedding) => {
                    records.push(SegmentRecord {
                        source_path: source_path.clone(),
                        source_type: source_type.to_string(),
                        chunk_index,
                        total_chunks,
                        title: title.clone(),
                        text,
                        embedding,
                        metadata: SegmentMetadata {
                            filename: filename.clone(),
                            parent: parent.clone(),
                            chars,
                        },
                    });
                    outcomes.push(SegmentOutcome::Upserted);
                }
                Err(err) => {
                    warn!(path = %path.display(), chunk_index, %err, "embedding failed, skipping segment");
                    outcomes.push(SegmentOutcome::EmbeddingFailed {
                        reason: err.to_string(),
                    });
                }
            }
        }

        // The whole document commits as a unit; an interrupted run leaves no
        // partially written document behind.
        if let Err(err) = self.store.commit_document(records).await {
            warn!(path = %path.display(), %err, "commit failed");
            return DocumentOutcome::StoreFailed {
                reason: err.to_string(),
            };
        }

        DocumentOutcome::Ingested { segments: outcomes }
    }
}

/// Stable identity for a document: the canonicalized absolute path when the
/// filesystem can resolve it, the literal path otherwise.
fn canonical_source_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn source_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx") => {
            "markdown"
        }
        _ => "text",
    }
}
