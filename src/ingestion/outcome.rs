//! Outcome types for documents and segments.
//!
//! The pipeline never reports through print statements; every document and
//! every candidate segment resolves to one of these variants and the caller
//! decides how to log or format them.

use std::path::PathBuf;

/// Terminal state of one candidate segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// Embedded and written (or queued into the document's commit).
    Upserted,
    /// Below the minimum segment length; dropped before any embedding or
    /// storage attempt.
    TooShort {
        /// Character count of the rejected segment.
        chars: usize,
    },
    /// The identity key already exists and force mode is off.
    AlreadyIndexed,
    /// The embedding capability failed; no partial write occurred.
    EmbeddingFailed {
        /// Provider failure, for logging only.
        reason: String,
    },
}

impl SegmentOutcome {
    /// Short label for metrics and logging.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Upserted => "upserted",
            Self::TooShort { .. } => "too_short",
            Self::AlreadyIndexed => "already_indexed",
            Self::EmbeddingFailed { .. } => "embedding_failed",
        }
    }

    #[must_use]
    pub fn is_upserted(&self) -> bool {
        matches!(self, Self::Upserted)
    }
}

/// Terminal state of one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The file could not be read; the run continues with the next document.
    ReadFailed { reason: String },
    /// Cleaned text was below the minimum content length; zero segments.
    BelowThreshold { chars: usize },
    /// The store rejected the document's commit; nothing from this document
    /// was written in this pass.
    StoreFailed { reason: String },
    /// The document went through segmentation; per-segment outcomes inside.
    Ingested { segments: Vec<SegmentOutcome> },
}

impl DocumentOutcome {
    /// Short label for metrics and logging.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::ReadFailed { .. } => "read_failed",
            Self::BelowThreshold { .. } => "below_threshold",
            Self::StoreFailed { .. } => "store_failed",
            Self::Ingested { .. } => "ingested",
        }
    }

    /// Number of segments this document actually stored.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        match self {
            Self::Ingested { segments } => {
                segments.iter().filter(|s| s.is_upserted()).count()
            }
            _ => 0,
        }
    }
}

/// One document's path paired with how it ended up.
#[derive(Clone, Debug)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: DocumentOutcome,
}

/// Aggregated result of a whole run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub documents: Vec<DocumentReport>,
}

impl RunSummary {
    /// Documents that stored at least one segment.
    #[must_use]
    pub fn files_processed(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.outcome.stored_count() > 0)
            .count()
    }

    /// Total segments stored across the run.
    #[must_use]
    pub fn segments_stored(&self) -> usize {
        self.documents
            .iter()
            .map(|d| d.outcome.stored_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_count_only_counts_upserts() {
        let outcome = DocumentOutcome::Ingested {
            segments: vec![
                SegmentOutcome::Upserted,
                SegmentOutcome::AlreadyIndexed,
                SegmentOutcome::TooShort { chars: 12 },
                SegmentOutcome::Upserted,
            ],
        };
        assert_eq!(outcome.stored_count(), 2);
        assert_eq!(
            DocumentOutcome::ReadFailed {
                reason: "gone".into()
            }
            .stored_count(),
            0
        );
    }

    #[test]
    fn summary_aggregates_across_documents() {
        let summary = RunSummary {
            documents: vec![
                DocumentReport {
                    path: "a.md".into(),
                    outcome: DocumentOutcome::Ingested {
                        segments: vec![SegmentOutcome::Upserted, SegmentOutcome::Upserted],
                    },
                },
                DocumentReport {
                    path: "b.md".into(),
                    outcome: DocumentOutcome::BelowThreshold { chars: 40 },
                },
            ],
        };
        assert_eq!(summary.files_processed(), 1);
        assert_eq!(summary.segments_stored(), 2);
    }

    #[test]
    fn variant_names() {
        assert_eq!(SegmentOutcome::Upserted.variant_name(), "upserted");
        assert_eq!(
            DocumentOutcome::StoreFailed {
                reason: "x".into()
            }
            .variant_name(),
            "store_failed"
        );
    }
}
