//! Vector store abstraction for Svar.
//!
//! Provides a trait-based interface for collection-scoped vector storage.
//! Each ingested video owns one collection, addressed by an opaque identifier.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::chunking::TextChunk;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for one ingested video's chunk collection.
///
/// Freshly generated at ingest time and never mutated. Two ingests of the
/// same video produce distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(Uuid);

impl CollectionId {
    /// Generate a fresh identifier.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::error::SvarError::InvalidInput(format!("Invalid collection id: {}", s)))
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Metadata recorded when a collection is published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMeta {
    /// Collection identifier.
    pub id: CollectionId,
    /// The video locator this collection was ingested from.
    pub locator: String,
    /// Embedding model the collection's vectors were produced with.
    pub embedding_model: String,
    /// When the collection was published.
    pub created_at: DateTime<Utc>,
}

impl CollectionMeta {
    /// Create metadata for a fresh collection.
    pub fn new(id: CollectionId, locator: String, embedding_model: String) -> Self {
        Self {
            id,
            locator,
            embedding_model,
            created_at: Utc::now(),
        }
    }
}

/// Summary of a stored collection, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Collection identifier.
    pub id: CollectionId,
    /// Source video locator.
    pub locator: String,
    /// Embedding model used at ingest.
    pub embedding_model: String,
    /// Number of stored chunks.
    pub chunk_count: u32,
    /// When the collection was published.
    pub created_at: DateTime<Utc>,
}

/// A chunk with its embedding, as persisted in a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Unique record ID.
    pub id: Uuid,
    /// Text content of the chunk.
    pub content: String,
    /// Character offset of the chunk in the transcript.
    pub offset: usize,
    /// Order of the chunk in the transcript.
    pub order: i32,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl ChunkRecord {
    /// Create a record from a chunk and its embedding.
    pub fn new(chunk: TextChunk, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: chunk.content,
            offset: chunk.offset,
            order: chunk.order,
            embedding,
        }
    }
}

/// A retrieval result element.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Text content of the matched chunk.
    pub content: String,
    /// Order of the chunk in its transcript.
    pub order: i32,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
///
/// Writes are staged: `insert_chunks` may run before `create_collection`, and
/// only collections with a published metadata row are visible to `search`,
/// `get_collection`, and `list_collections`.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Stage chunk records under a collection identifier.
    async fn insert_chunks(&self, id: &CollectionId, records: &[ChunkRecord]) -> Result<usize>;

    /// Publish a collection's metadata, making it queryable.
    async fn create_collection(&self, meta: &CollectionMeta) -> Result<()>;

    /// Get a published collection's metadata.
    async fn get_collection(&self, id: &CollectionId) -> Result<Option<CollectionMeta>>;

    /// Search a collection for the k chunks most similar to the query vector.
    ///
    /// Results are ordered by decreasing score; fewer than k are returned
    /// when the collection holds fewer chunks. Fails with
    /// `CollectionNotFound` for an unpublished or unknown identifier.
    async fn search(
        &self,
        id: &CollectionId,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>>;

    /// Delete a collection and its chunks. Returns the number of chunks removed.
    async fn delete_collection(&self, id: &CollectionId) -> Result<usize>;

    /// List all published collections.
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>>;

    /// Number of chunks in a published collection.
    async fn chunk_count(&self, id: &CollectionId) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
