//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! Collections live in a `collections` table; their chunks are namespaced by
//! a `collection_id` column. The metadata row is written last at ingest and
//! acts as the publish marker, so partially written collections are never
//! visible to search.

use super::{
    cosine_similarity, ChunkRecord, CollectionId, CollectionMeta, CollectionSummary, ScoredChunk,
    VectorStore,
};
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS collections (
    id TEXT PRIMARY KEY,
    locator TEXT NOT NULL,
    embedding_model TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    collection_id TEXT NOT NULL,
    content TEXT NOT NULL,
    char_offset INTEGER NOT NULL,
    chunk_order INTEGER NOT NULL,
    embedding BLOB NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_collection_id ON chunks(collection_id);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SvarError::Store(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn meta_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn parse_meta(
        id: String,
        locator: String,
        model: String,
        created_at: String,
    ) -> Result<CollectionMeta> {
        Ok(CollectionMeta {
            id: CollectionId::parse(&id)?,
            locator,
            embedding_model: model,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records))]
    async fn insert_chunks(&self, id: &CollectionId, records: &[ChunkRecord]) -> Result<usize> {
        let conn = self.lock()?;

        let tx = conn.unchecked_transaction()?;

        for record in records {
            let embedding_bytes = Self::embedding_to_bytes(&record.embedding);

            tx.execute(
                r#"
                INSERT INTO chunks (id, collection_id, content, char_offset, chunk_order, embedding)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    record.id.to_string(),
                    id.to_string(),
                    record.content,
                    record.offset as i64,
                    record.order,
                    embedding_bytes,
                ],
            )?;
        }

        tx.commit()?;
        info!("Staged {} chunks for collection {}", records.len(), id);
        Ok(records.len())
    }

    #[instrument(skip(self, meta), fields(id = %meta.id))]
    async fn create_collection(&self, meta: &CollectionMeta) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO collections (id, locator, embedding_model, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                meta.id.to_string(),
                meta.locator,
                meta.embedding_model,
                meta.created_at.to_rfc3339(),
            ],
        )?;

        debug!("Published collection {}", meta.id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_collection(&self, id: &CollectionId) -> Result<Option<CollectionMeta>> {
        let conn = self.lock()?;

        let row = conn.query_row(
            "SELECT id, locator, embedding_model, created_at FROM collections WHERE id = ?1",
            params![id.to_string()],
            Self::meta_from_row,
        );

        match row {
            Ok((id, locator, model, created_at)) => {
                Ok(Some(Self::parse_meta(id, locator, model, created_at)?))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(
        &self,
        id: &CollectionId,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let conn = self.lock()?;

        // Only published collections are searchable
        let published: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM collections WHERE id = ?1",
                params![id.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)?;

        if !published {
            return Err(SvarError::CollectionNotFound(id.to_string()));
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT content, chunk_order, embedding
            FROM chunks
            WHERE collection_id = ?1
            "#,
        )?;

        let rows = stmt.query_map(params![id.to_string()], |row| {
            let content: String = row.get(0)?;
            let order: i32 = row.get(1)?;
            let embedding_bytes: Vec<u8> = row.get(2)?;
            Ok((content, order, embedding_bytes))
        })?;

        let mut results: Vec<ScoredChunk> = rows
            .filter_map(|r| r.ok())
            .map(|(content, order, embedding_bytes)| {
                let embedding = Self::bytes_to_embedding(&embedding_bytes);
                ScoredChunk {
                    content,
                    order,
                    score: cosine_similarity(query_embedding, &embedding),
                }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        debug!("Found {} matching chunks in {}", results.len(), id);
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_collection(&self, id: &CollectionId) -> Result<usize> {
        let conn = self.lock()?;

        let deleted = conn.execute(
            "DELETE FROM chunks WHERE collection_id = ?1",
            params![id.to_string()],
        )?;
        conn.execute(
            "DELETE FROM collections WHERE id = ?1",
            params![id.to_string()],
        )?;

        info!("Deleted collection {} ({} chunks)", id, deleted);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.locator, c.embedding_model, c.created_at, COUNT(k.id) as chunk_count
            FROM collections c
            LEFT JOIN chunks k ON k.collection_id = c.id
            GROUP BY c.id
            ORDER BY c.created_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let locator: String = row.get(1)?;
            let model: String = row.get(2)?;
            let created_at: String = row.get(3)?;
            let chunk_count: u32 = row.get(4)?;
            Ok((id, locator, model, created_at, chunk_count))
        })?;

        let mut summaries = Vec::new();
        for row in rows.filter_map(|r| r.ok()) {
            let (id, locator, model, created_at, chunk_count) = row;
            let meta = Self::parse_meta(id, locator, model, created_at)?;
            summaries.push(CollectionSummary {
                id: meta.id,
                locator: meta.locator,
                embedding_model: meta.embedding_model,
                chunk_count,
                created_at: meta.created_at,
            });
        }

        Ok(summaries)
    }

    async fn chunk_count(&self, id: &CollectionId) -> Result<usize> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection_id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;

    fn record(content: &str, order: i32, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord::new(
            TextChunk::new(content.to_string(), 0, order),
            embedding,
        )
    }

    #[tokio::test]
    async fn test_publish_then_search() {
        let store = SqliteVectorStore::in_memory().unwrap();
        let id = CollectionId::new();

        store
            .insert_chunks(
                &id,
                &[
                    record("first chunk", 0, vec![1.0, 0.0, 0.0]),
                    record("second chunk", 1, vec![0.0, 1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        // Unpublished collection is not searchable
        let err = store.search(&id, &[1.0, 0.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, SvarError::CollectionNotFound(_)));

        let meta = CollectionMeta::new(id.clone(), "video1".to_string(), "test-model".to_string());
        store.create_collection(&meta).await.unwrap();

        let results = store.search(&id, &[1.0, 0.0, 0.0], 3).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "first chunk");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_search_caps_at_k() {
        let store = SqliteVectorStore::in_memory().unwrap();
        let id = CollectionId::new();

        let records: Vec<ChunkRecord> = (0..5)
            .map(|i| record(&format!("chunk {}", i), i, vec![i as f32, 1.0, 0.0]))
            .collect();
        store.insert_chunks(&id, &records).await.unwrap();
        store
            .create_collection(&CollectionMeta::new(
                id.clone(),
                "video1".to_string(),
                "test-model".to_string(),
            ))
            .await
            .unwrap();

        let results = store.search(&id, &[1.0, 1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);

        // k larger than the collection returns everything
        let results = store.search(&id, &[1.0, 1.0, 0.0], 50).await.unwrap();
        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn test_collection_isolation() {
        let store = SqliteVectorStore::in_memory().unwrap();
        let a = CollectionId::new();
        let b = CollectionId::new();

        store
            .insert_chunks(&a, &[record("alpha only", 0, vec![1.0, 0.0])])
            .await
            .unwrap();
        store
            .insert_chunks(&b, &[record("beta only", 0, vec![1.0, 0.0])])
            .await
            .unwrap();
        for (id, locator) in [(&a, "video-a"), (&b, "video-b")] {
            store
                .create_collection(&CollectionMeta::new(
                    id.clone(),
                    locator.to_string(),
                    "test-model".to_string(),
                ))
                .await
                .unwrap();
        }

        let results = store.search(&a, &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "alpha only");
    }

    #[tokio::test]
    async fn test_delete_collection() {
        let store = SqliteVectorStore::in_memory().unwrap();
        let id = CollectionId::new();

        store
            .insert_chunks(&id, &[record("to delete", 0, vec![1.0])])
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

        let deleted = store.delete_collection(&id).await.unwrap();
        assert_eq!(deleted, 1);

        assert!(store.get_collection(&id).await.unwrap().is_none());
        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_collections() {
        let store = SqliteVectorStore::in_memory().unwrap();
        let id = CollectionId::new();

        store
            .insert_chunks(
                &id,
                &[
                    record("one", 0, vec![1.0]),
                    record("two", 1, vec![0.5]),
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

        let collections = store.list_collections().await.unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].id, id);
        assert_eq!(collections[0].chunk_count, 2);
        assert_eq!(collections[0].embedding_model, "test-model");
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collections.db");
        let id = CollectionId::new();

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            store
                .insert_chunks(&id, &[record("persisted", 0, vec![1.0, 0.0])])
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
        }

        let store = SqliteVectorStore::new(&path).unwrap();
        let results = store.search(&id, &[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "persisted");
    }
}
