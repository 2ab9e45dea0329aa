//! In-memory vector store implementation.
//!
//! Useful for testing and throwaway sessions.

use super::{
    cosine_similarity, ChunkRecord, CollectionId, CollectionMeta, CollectionSummary, ScoredChunk,
    VectorStore,
};
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    // Staged chunks, keyed by collection id string
    chunks: HashMap<String, Vec<ChunkRecord>>,
    // Published collections only
    collections: HashMap<String, CollectionMeta>,
}

/// In-memory vector store.
#[derive(Default)]
pub struct MemoryVectorStore {
    inner: RwLock<Inner>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn insert_chunks(&self, id: &CollectionId, records: &[ChunkRecord]) -> Result<usize> {
        let mut inner = self.inner.write().unwrap();
        inner
            .chunks
            .entry(id.to_string())
            .or_default()
            .extend(records.iter().cloned());
        Ok(records.len())
    }

    async fn create_collection(&self, meta: &CollectionMeta) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.collections.insert(meta.id.to_string(), meta.clone());
        Ok(())
    }

    async fn get_collection(&self, id: &CollectionId) -> Result<Option<CollectionMeta>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.collections.get(&id.to_string()).cloned())
    }

    async fn search(
        &self,
        id: &CollectionId,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let inner = self.inner.read().unwrap();

        if !inner.collections.contains_key(&id.to_string()) {
            return Err(SvarError::CollectionNotFound(id.to_string()));
        }

        let mut results: Vec<ScoredChunk> = inner
            .chunks
            .get(&id.to_string())
            .map(|records| {
                records
                    .iter()
                    .map(|record| ScoredChunk {
                        content: record.content.clone(),
                        order: record.order,
                        score: cosine_similarity(query_embedding, &record.embedding),
                    })
                    .collect()
            })
            .unwrap_or_default();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<usize> {
        let mut inner = self.inner.write().unwrap();
        inner.collections.remove(&id.to_string());
        let removed = inner
            .chunks
            .remove(&id.to_string())
            .map(|records| records.len())
            .unwrap_or(0);
        Ok(removed)
    }

    async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        let inner = self.inner.read().unwrap();

        let mut summaries: Vec<CollectionSummary> = inner
            .collections
            .values()
            .map(|meta| CollectionSummary {
                id: meta.id.clone(),
                locator: meta.locator.clone(),
                embedding_model: meta.embedding_model.clone(),
                chunk_count: inner
                    .chunks
                    .get(&meta.id.to_string())
                    .map(|records| records.len() as u32)
                    .unwrap_or(0),
                created_at: meta.created_at,
            })
            .collect();

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn chunk_count(&self, id: &CollectionId) -> Result<usize> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .chunks
            .get(&id.to_string())
            .map(|records| records.len())
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;

    fn record(content: &str, order: i32, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord::new(TextChunk::new(content.to_string(), 0, order), embedding)
    }

    #[tokio::test]
    async fn test_memory_store_search_ordering() {
        let store = MemoryVectorStore::new();
        let id = CollectionId::new();

        store
            .insert_chunks(
                &id,
                &[
                    record("close", 0, vec![1.0, 0.0, 0.0]),
                    record("far", 1, vec![0.0, 1.0, 0.0]),
                    record("middling", 2, vec![0.7, 0.7, 0.0]),
                ],
            )
            .await
            .unwrap();
        store
            .create_collection(&CollectionMeta::new(
                id.clone(),
                "video1".to_string(),
                "test-model".to_string(),
            ))
            .await
            .unwrap();

        let results = store.search(&id, &[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].content, "close");
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[tokio::test]
    async fn test_unpublished_collection_not_found() {
        let store = MemoryVectorStore::new();
        let id = CollectionId::new();

        store
            .insert_chunks(&id, &[record("staged", 0, vec![1.0])])
            .await
            .unwrap();

        let err = store.search(&id, &[1.0], 1).await.unwrap_err();
        assert!(matches!(err, SvarError::CollectionNotFound(_)));
    }

    #[test]
    fn test_chunk_count() {
        let store = MemoryVectorStore::new();
        let id = CollectionId::new();

        tokio_test::block_on(async {
            store
                .insert_chunks(&id, &[record("a", 0, vec![1.0]), record("b", 1, vec![0.5])])
                .await
                .unwrap();
            assert_eq!(store.chunk_count(&id).await.unwrap(), 2);
        });
    }

    #[tokio::test]
    async fn test_isolation_between_collections() {
        let store = MemoryVectorStore::new();
        let a = CollectionId::new();
        let b = CollectionId::new();

        for (id, content) in [(&a, "from a"), (&b, "from b")] {
            store
                .insert_chunks(id, &[record(content, 0, vec![1.0, 0.0])])
                .await
                .unwrap();
            store
                .create_collection(&CollectionMeta::new(
                    id.clone(),
                    content.to_string(),
                    "test-model".to_string(),
                ))
                .await
                .unwrap();
        }

        let results = store.search(&b, &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "from b");
    }
}
