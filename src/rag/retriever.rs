//! Top-k chunk retrieval for a collection.

use crate::embedding::Embedder;
use crate::error::{Result, SvarError};
use crate::vector_store::{CollectionId, ScoredChunk, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Retrieves the chunks most similar to a question from one collection.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever with the default k of 3.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            top_k: 3,
        }
    }

    /// Set the number of chunks to retrieve.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Retrieve the configured number of chunks for a query.
    pub async fn retrieve(&self, id: &CollectionId, query: &str) -> Result<Vec<ScoredChunk>> {
        self.retrieve_k(id, query, self.top_k).await
    }

    /// Retrieve up to `k` chunks for a query, ordered by decreasing score.
    ///
    /// The collection must have been indexed with the same embedding model
    /// this retriever's embedder uses; a recorded mismatch fails with
    /// `ConfigMismatch` before any vectors are compared.
    #[instrument(skip(self, query), fields(id = %id, k = k))]
    pub async fn retrieve_k(
        &self,
        id: &CollectionId,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(SvarError::InvalidInput(
                "k must be at least 1".to_string(),
            ));
        }

        let meta = self
            .store
            .get_collection(id)
            .await?
            .ok_or_else(|| SvarError::CollectionNotFound(id.to_string()))?;

        if meta.embedding_model != self.embedder.model_id() {
            return Err(SvarError::ConfigMismatch {
                expected: meta.embedding_model,
                actual: self.embedder.model_id().to_string(),
            });
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = self.store.search(id, &query_embedding, k).await?;

        debug!("Retrieved {} chunks", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;
    use crate::vector_store::{ChunkRecord, CollectionMeta, MemoryVectorStore};
    use async_trait::async_trait;

    /// Embedder mapping a few known words onto axis-aligned vectors.
    struct AxisEmbedder {
        model: String,
    }

    fn axis_vector(text: &str) -> Vec<f32> {
        match text {
            t if t.contains("alpha") => vec![1.0, 0.0, 0.0],
            t if t.contains("beta") => vec![0.0, 1.0, 0.0],
            _ => vec![0.0, 0.0, 1.0],
        }
    }

    #[async_trait]
    impl Embedder for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(axis_vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| axis_vector(t)).collect())
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn model_id(&self) -> &str {
            &self.model
        }
    }

    async fn seeded_store(model: &str) -> (Arc<MemoryVectorStore>, CollectionId) {
        let store = Arc::new(MemoryVectorStore::new());
        let id = CollectionId::new();

        let records = vec![
            ChunkRecord::new(
                TextChunk::new("about alpha".to_string(), 0, 0),
                vec![1.0, 0.0, 0.0],
            ),
            ChunkRecord::new(
                TextChunk::new("about beta".to_string(), 10, 1),
                vec![0.0, 1.0, 0.0],
            ),
            ChunkRecord::new(
                TextChunk::new("about gamma".to_string(), 20, 2),
                vec![0.0, 0.0, 1.0],
            ),
        ];
        store.insert_chunks(&id, &records).await.unwrap();
        store
            .create_collection(&CollectionMeta::new(
                id.clone(),
                "video1".to_string(),
                model.to_string(),
            ))
            .await
            .unwrap();

        (store, id)
    }

    fn embedder(model: &str) -> Arc<AxisEmbedder> {
        Arc::new(AxisEmbedder {
            model: model.to_string(),
        })
    }

    #[tokio::test]
    async fn test_retrieve_orders_by_score() {
        let (store, id) = seeded_store("axis-v1").await;
        let retriever = Retriever::new(store, embedder("axis-v1"));

        let results = retriever.retrieve_k(&id, "tell me about beta", 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].content, "about beta");
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_k_and_collection_size() {
        let (store, id) = seeded_store("axis-v1").await;
        let retriever = Retriever::new(store, embedder("axis-v1")).with_top_k(2);

        let results = retriever.retrieve(&id, "alpha").await.unwrap();
        assert_eq!(results.len(), 2);

        let results = retriever.retrieve_k(&id, "alpha", 10).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_k_rejected() {
        let (store, id) = seeded_store("axis-v1").await;
        let retriever = Retriever::new(store, embedder("axis-v1"));

        let err = retriever.retrieve_k(&id, "alpha", 0).await.unwrap_err();
        assert!(matches!(err, SvarError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unknown_collection() {
        let (store, _) = seeded_store("axis-v1").await;
        let retriever = Retriever::new(store, embedder("axis-v1"));

        let err = retriever
            .retrieve_k(&CollectionId::new(), "alpha", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::CollectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_embedding_model_mismatch() {
        let (store, id) = seeded_store("axis-v1").await;
        let retriever = Retriever::new(store, embedder("axis-v2"));

        let err = retriever.retrieve_k(&id, "alpha", 1).await.unwrap_err();
        match err {
            SvarError::ConfigMismatch { expected, actual } => {
                assert_eq!(expected, "axis-v1");
                assert_eq!(actual, "axis-v2");
            }
            other => panic!("Expected ConfigMismatch, got {:?}", other),
        }
    }
}
