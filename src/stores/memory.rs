//! In-process segment store backed by a keyed map.
//!
//! Mirrors the Postgres backend's upsert semantics (overwrite on identity
//! key, refreshed timestamp) without a database, which makes it the store of
//! choice for tests and dry runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{SegmentRecord, SegmentStore, SourceTypeCount};
use crate::types::IngestError;

/// A stored segment plus the timestamp of its last successful write.
#[derive(Clone, Debug)]
pub struct StoredSegment {
    pub record: SegmentRecord,
    pub indexed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct MemorySegmentStore {
    segments: Arc<Mutex<HashMap<(String, usize), StoredSegment>>>,
}

impl MemorySegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored segments.
    pub async fn len(&self) -> usize {
        self.segments.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.segments.lock().await.is_empty()
    }

    /// Fetch a stored segment by its identity key.
    pub async fn get(&self, source_path: &str, chunk_index: usize) -> Option<StoredSegment> {
        self.segments
            .lock()
            .await
            .get(&(source_path.to_string(), chunk_index))
            .cloned()
    }
}

#[async_trait]
impl SegmentStore for MemorySegmentStore {
    async fn exists(&self, source_path: &str, chunk_index: usize) -> Result<bool, IngestError> {
        Ok(self
            .segments
            .lock()
            .await
            .contains_key(&(source_path.to_string(), chunk_index)))
    }

    async fn commit_document(&self, segments: Vec<SegmentRecord>) -> Result<usize, IngestError> {
        let mut guard = self.segments.lock().await;
        let written = segments.len();
        let now = Utc::now();
        for record in segments {
            let key = (record.source_path.clone(), record.chunk_index);
            guard.insert(
                key,
                StoredSegment {
                    record,
                    indexed_at: now,
                },
            );
        }
        Ok(written)
    }

    async fn count_by_source_type(&self) -> Result<Vec<SourceTypeCount>, IngestError> {
        let guard = self.segments.lock().await;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for stored in guard.values() {
            *counts.entry(stored.record.source_type.clone()).or_default() += 1;
        }
        let mut result: Vec<SourceTypeCount> = counts
            .into_iter()
            .map(|(source_type, indexed_count)| SourceTypeCount {
                source_type,
                indexed_count,
            })
            .collect();
        result.sort_by(|a, b| a.source_type.cmp(&b.source_type));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::SegmentMetadata;

    fn record(path: &str, index: usize) -> SegmentRecord {
        SegmentRecord {
            source_path: path.to_string(),
            source_type: "markdown".to_string(),
            chunk_index: index,
            total_chunks: 2,
            title: "Test".to_string(),
            text: "segment text".to_string(),
            embedding: vec![0.1, 0.2, 0.3],
            metadata: SegmentMetadata {
                filename: "t.md".into(),
                parent: "docs".into(),
                chars: 12,
            },
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_instead_of_duplicating() {
        let store = MemorySegmentStore::new();
        store.commit_document(vec![record("/a.md", 0)]).await.unwrap();
        assert!(store.exists("/a.md", 0).await.unwrap());

        let mut updated = record("/a.md", 0);
        updated.text = "rewritten".to_string();
        store.commit_document(vec![updated]).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("/a.md", 0).await.unwrap().record.text, "rewritten");
    }

    #[tokio::test]
    async fn recommit_refreshes_timestamp() {
        let store = MemorySegmentStore::new();
        store.commit_document(vec![record("/a.md", 0)]).await.unwrap();
        let first = store.get("/a.md", 0).await.unwrap().indexed_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.commit_document(vec![record("/a.md", 0)]).await.unwrap();
        let second = store.get("/a.md", 0).await.unwrap().indexed_at;
        assert!(second > first);
    }

    #[tokio::test]
    async fn counts_group_by_source_type() {
        let store = MemorySegmentStore::new();
        let mut text_record = record("/b.txt", 0);
        text_record.source_type = "text".to_string();
        store
            .commit_document(vec![record("/a.md", 0), record("/a.md", 1), text_record])
            .await
            .unwrap();

        let counts = store.count_by_source_type().await.unwrap();
        assert_eq!(
            counts,
            vec![
                SourceTypeCount {
                    source_type: "markdown".into(),
                    indexed_count: 2
                },
                SourceTypeCount {
                    source_type: "text".into(),
                    indexed_count: 1
                },
            ]
        );
    }
}
