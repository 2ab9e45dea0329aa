//! Ingest pipeline orchestrator for Svar.
//!
//! Coordinates the process from transcript fetch to a published, queryable
//! collection.

use crate::chunking::WindowChunker;
use crate::config::{Credentials, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, SvarError};
use crate::transcript::{TranscriptSource, YoutubeTranscripts};
use crate::vector_store::{
    ChunkRecord, CollectionId, CollectionMeta, MemoryVectorStore, SqliteVectorStore, VectorStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// The main orchestrator for the Svar ingest pipeline.
pub struct Orchestrator {
    settings: Settings,
    source: Arc<dyn TranscriptSource>,
    chunker: WindowChunker,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl Orchestrator {
    /// Create a new orchestrator from settings and explicit credentials.
    pub fn new(settings: Settings, credentials: Credentials) -> Result<Self> {
        let source: Arc<dyn TranscriptSource> = Arc::new(YoutubeTranscripts::new(
            &settings.transcript.language,
            Duration::from_secs(settings.transcript.timeout_seconds),
        )?);

        let chunker = WindowChunker::new(settings.chunking.max_chars, settings.chunking.overlap)?;

        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
            &credentials,
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let store: Arc<dyn VectorStore> = match settings.store.provider.as_str() {
            "sqlite" => Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?),
            "memory" => Arc::new(MemoryVectorStore::new()),
            other => {
                return Err(SvarError::Config(format!(
                    "Unknown store provider: {}",
                    other
                )))
            }
        };

        Ok(Self {
            settings,
            source,
            chunker,
            embedder,
            store,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        source: Arc<dyn TranscriptSource>,
        chunker: WindowChunker,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            source,
            chunker,
            embedder,
            store,
        }
    }

    /// Get a reference to the vector store.
    pub fn store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ingest a video: fetch transcript, chunk, embed, and publish a fresh
    /// collection.
    ///
    /// The collection identifier is returned only after every chunk is
    /// written and the collection's metadata row is published. Transcript
    /// errors propagate unchanged; embedding and storage failures surface as
    /// `Indexing`.
    #[instrument(skip(self), fields(locator = %locator))]
    pub async fn ingest(&self, locator: &str) -> Result<IngestResult> {
        let collection_id = CollectionId::new();

        info!("Fetching transcript for {}", locator);
        let segments = self.source.load(locator).await?;
        info!("Fetched {} transcript segments", segments.len());

        let chunks = self.chunker.split(&segments);
        if chunks.is_empty() {
            return Err(SvarError::Indexing(
                "Transcript produced no chunks".to_string(),
            ));
        }
        info!("Split transcript into {} chunks", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| SvarError::Indexing(format!("Embedding failed: {}", e)))?;

        if embeddings.len() != chunks.len() {
            return Err(SvarError::Indexing(format!(
                "Embedding count mismatch: {} chunks, {} vectors",
                chunks.len(),
                embeddings.len()
            )));
        }

        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| ChunkRecord::new(chunk, embedding))
            .collect();

        // Stage all chunk rows, then publish the metadata row last. A failed
        // ingest leaves no queryable collection behind.
        let indexed = self
            .store
            .insert_chunks(&collection_id, &records)
            .await
            .map_err(|e| SvarError::Indexing(format!("Chunk write failed: {}", e)))?;

        let meta = CollectionMeta::new(
            collection_id.clone(),
            locator.to_string(),
            self.embedder.model_id().to_string(),
        );
        self.store
            .create_collection(&meta)
            .await
            .map_err(|e| SvarError::Indexing(format!("Collection publish failed: {}", e)))?;

        info!("Published collection {} ({} chunks)", collection_id, indexed);

        Ok(IngestResult {
            collection_id,
            chunks_indexed: indexed,
        })
    }

    /// Wrap a collection in a guard that releases it when the session ends.
    pub fn guard(&self, collection_id: CollectionId) -> CollectionGuard {
        CollectionGuard {
            collection_id,
            store: self.store.clone(),
            released: false,
        }
    }
}

/// Result of ingesting a video.
#[derive(Debug)]
pub struct IngestResult {
    /// Identifier of the published collection.
    pub collection_id: CollectionId,
    /// Number of chunks indexed.
    pub chunks_indexed: usize,
}

/// Scoped handle on a collection's backing storage.
///
/// The session driver releases the guard when the session ends, deleting the
/// collection. Call `keep` instead to leave the collection in place. Dropping
/// an unreleased guard only logs a warning; `Drop` cannot await the store.
pub struct CollectionGuard {
    collection_id: CollectionId,
    store: Arc<dyn VectorStore>,
    released: bool,
}

impl CollectionGuard {
    /// The guarded collection's identifier.
    pub fn collection_id(&self) -> &CollectionId {
        &self.collection_id
    }

    /// Delete the collection and consume the guard.
    pub async fn release(mut self) -> Result<usize> {
        self.released = true;
        self.store.delete_collection(&self.collection_id).await
    }

    /// Keep the collection and consume the guard.
    pub fn keep(mut self) {
        self.released = true;
    }
}

impl Drop for CollectionGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                "Collection {} was not released; its storage remains on disk",
                self.collection_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::transcript::{TranscriptSegment, TranscriptSource};
    use async_trait::async_trait;

    /// Transcript source returning a fixed set of segments.
    struct FixedSource {
        segments: Vec<TranscriptSegment>,
    }

    #[async_trait]
    impl TranscriptSource for FixedSource {
        async fn load(&self, _locator: &str) -> Result<Vec<TranscriptSegment>> {
            if self.segments.is_empty() {
                return Err(SvarError::TranscriptUnavailable("no captions".to_string()));
            }
            Ok(self.segments.clone())
        }

        fn can_handle(&self, _locator: &str) -> bool {
            true
        }
    }

    /// Deterministic embedder: counts a fixed keyword set.
    struct KeywordEmbedder;

    const KEYWORDS: [&str; 3] = ["one", "two", "text"];

    fn keyword_vector(text: &str) -> Vec<f32> {
        KEYWORDS
            .iter()
            .map(|kw| text.matches(kw).count() as f32)
            .collect()
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(keyword_vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| keyword_vector(t)).collect())
        }

        fn dimensions(&self) -> usize {
            KEYWORDS.len()
        }

        fn model_id(&self) -> &str {
            "keyword-test"
        }
    }

    fn orchestrator_with(segments: Vec<TranscriptSegment>, max_chars: usize, overlap: usize) -> Orchestrator {
        Orchestrator::with_components(
            Settings::default(),
            Arc::new(FixedSource { segments }),
            WindowChunker::new(max_chars, overlap).unwrap(),
            Arc::new(KeywordEmbedder),
            Arc::new(MemoryVectorStore::new()),
        )
    }

    fn sample_segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new("chunk one text.".to_string(), 0.0, 2.0),
            TranscriptSegment::new("chunk two text.".to_string(), 2.0, 2.0),
        ]
    }

    #[tokio::test]
    async fn test_ingest_end_to_end() {
        let orchestrator = orchestrator_with(sample_segments(), 20, 5);

        let result = orchestrator.ingest("video-1").await.unwrap();
        // "chunk one text. chunk two text." is 31 chars; stride 15 -> 2 chunks
        assert_eq!(result.chunks_indexed, 2);

        let store = orchestrator.store();
        let meta = store
            .get_collection(&result.collection_id)
            .await
            .unwrap()
            .expect("collection should be published");
        assert_eq!(meta.embedding_model, "keyword-test");
        assert_eq!(meta.locator, "video-1");

        // Query with k=1 returns exactly one chunk
        let query = keyword_vector("two");
        let results = store.search(&result.collection_id, &query, 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("two"));
    }

    #[tokio::test]
    async fn test_repeated_ingest_yields_distinct_collections() {
        let orchestrator = orchestrator_with(sample_segments(), 20, 5);

        let first = orchestrator.ingest("video-1").await.unwrap();
        let second = orchestrator.ingest("video-1").await.unwrap();
        assert_ne!(first.collection_id, second.collection_id);

        // Both are independently queryable
        let store = orchestrator.store();
        let query = keyword_vector("one");
        for id in [&first.collection_id, &second.collection_id] {
            let results = store.search(id, &query, 1).await.unwrap();
            assert_eq!(results.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_transcript_errors_propagate() {
        let orchestrator = orchestrator_with(Vec::new(), 20, 5);

        let err = orchestrator.ingest("video-1").await.unwrap_err();
        assert!(matches!(err, SvarError::TranscriptUnavailable(_)));
    }

    #[tokio::test]
    async fn test_guard_release_deletes_collection() {
        let orchestrator = orchestrator_with(sample_segments(), 20, 5);

        let result = orchestrator.ingest("video-1").await.unwrap();
        let store = orchestrator.store();
        let guard = orchestrator.guard(result.collection_id.clone());

        let removed = guard.release().await.unwrap();
        assert_eq!(removed, 2);

        let err = store
            .search(&result.collection_id, &[1.0, 0.0, 0.0], 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::CollectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_guard_keep_preserves_collection() {
        let orchestrator = orchestrator_with(sample_segments(), 20, 5);

        let result = orchestrator.ingest("video-1").await.unwrap();
        let guard = orchestrator.guard(result.collection_id.clone());
        guard.keep();

        let store = orchestrator.store();
        assert!(store
            .get_collection(&result.collection_id)
            .await
            .unwrap()
            .is_some());
    }
}
