use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use super::types::{cosine_similarity, MemoryMetadata, ScoredChunk, TextChunk, VectorStore};
use super::MemoryError;
use crate::db::{repository, Database};
use crate::models::MemoryChunk;

/// In-memory vector store.
/// Useful for tests and for processes that do not need memory to outlive them.
pub struct InMemoryVectorStore {
    entries: Mutex<Vec<MemoryChunk>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Stored chunk texts of a collection, in insertion order.
    pub fn contents(&self, collection: &str) -> Result<Vec<String>, MemoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|e| e.collection == collection)
            .map(|e| e.content.clone())
            .collect())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<MemoryChunk>>, MemoryError> {
        self.entries
            .lock()
            .map_err(|_| MemoryError::VectorDb("In-memory store lock poisoned".into()))
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn store_chunks(
        &self,
        collection: &str,
        chunks: &[TextChunk],
        embeddings: &[Vec<f32>],
        metadata: &MemoryMetadata,
    ) -> Result<usize, MemoryError> {
        let records = build_records(collection, chunks, embeddings, metadata)?;
        let count = records.len();
        self.lock()?.extend(records);
        Ok(count)
    }

    fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, MemoryError> {
        let entries = self.lock()?;
        Ok(rank(
            entries.iter().filter(|e| e.collection == collection),
            query_embedding,
            top_k,
        ))
    }

    fn count(&self, collection: &str) -> Result<usize, MemoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|e| e.collection == collection)
            .count())
    }

    fn delete_collection(&self, collection: &str) -> Result<usize, MemoryError> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|e| e.collection != collection);
        Ok(before - entries.len())
    }
}

/// Vector store persisted in the `memory_chunks` table.
pub struct SqliteVectorStore {
    db: Arc<Database>,
}

impl SqliteVectorStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl VectorStore for SqliteVectorStore {
    fn store_chunks(
        &self,
        collection: &str,
        chunks: &[TextChunk],
        embeddings: &[Vec<f32>],
        metadata: &MemoryMetadata,
    ) -> Result<usize, MemoryError> {
        let records = build_records(collection, chunks, embeddings, metadata)?;
        self.db.with_transaction(|tx| -> Result<usize, MemoryError> {
            for record in &records {
                repository::insert_memory_chunk(tx, record)?;
            }
            Ok(records.len())
        })
    }

    fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, MemoryError> {
        let entries = self
            .db
            .with_transaction(|tx| repository::get_memory_chunks(tx, collection))?;
        Ok(rank(entries.iter(), query_embedding, top_k))
    }

    fn count(&self, collection: &str) -> Result<usize, MemoryError> {
        Ok(self
            .db
            .with_transaction(|tx| repository::count_memory_chunks(tx, collection))?)
    }

    fn delete_collection(&self, collection: &str) -> Result<usize, MemoryError> {
        Ok(self
            .db
            .with_transaction(|tx| repository::delete_memory_chunks(tx, collection))?)
    }
}

fn build_records(
    collection: &str,
    chunks: &[TextChunk],
    embeddings: &[Vec<f32>],
    metadata: &MemoryMetadata,
) -> Result<Vec<MemoryChunk>, MemoryError> {
    if chunks.len() != embeddings.len() {
        return Err(MemoryError::VectorDb(
            "Chunk count does not match embedding count".into(),
        ));
    }

    let created_at = Utc::now().timestamp();
    Ok(chunks
        .iter()
        .zip(embeddings.iter())
        .map(|(chunk, embedding)| MemoryChunk {
            id: Uuid::new_v4(),
            collection: collection.to_string(),
            content: chunk.content.clone(),
            embedding: embedding.clone(),
            chunk_index: chunk.chunk_index,
            metadata: metadata.clone(),
            created_at,
        })
        .collect())
}

fn rank<'a>(
    entries: impl Iterator<Item = &'a MemoryChunk>,
    query_embedding: &[f32],
    top_k: usize,
) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = entries
        .map(|e| ScoredChunk {
            chunk_id: e.id,
            collection: e.collection.clone(),
            content: e.content.clone(),
            score: cosine_similarity(query_embedding, &e.embedding),
            metadata: e.metadata.clone(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_chunks(texts: &[&str]) -> Vec<TextChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TextChunk {
                content: t.to_string(),
                chunk_index: i,
            })
            .collect()
    }

    fn metadata() -> MemoryMetadata {
        json!({"source": "feedback", "message_id": "msg2"})
            .as_object()
            .unwrap()
            .clone()
    }

    fn exercise_store(store: &dyn VectorStore) {
        let chunks = make_chunks(&["alpha", "beta", "gamma"]);
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]];

        let stored = store
            .store_chunks("conversation_memory_u1", &chunks, &embeddings, &metadata())
            .unwrap();
        assert_eq!(stored, 3);
        store
            .store_chunks("conversation_memory_u2", &chunks[..1], &embeddings[..1], &metadata())
            .unwrap();

        assert_eq!(store.count("conversation_memory_u1").unwrap(), 3);
        assert_eq!(store.count("conversation_memory_u2").unwrap(), 1);

        let hits = store.search("conversation_memory_u1", &[1.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "alpha");
        assert_eq!(hits[1].content, "gamma");
        assert_eq!(hits[0].metadata["message_id"], "msg2");

        assert_eq!(store.delete_collection("conversation_memory_u1").unwrap(), 3);
        assert_eq!(store.count("conversation_memory_u1").unwrap(), 0);
        assert_eq!(store.count("conversation_memory_u2").unwrap(), 1);
    }

    #[test]
    fn in_memory_store_partitions_by_collection() {
        exercise_store(&InMemoryVectorStore::new());
    }

    #[test]
    fn sqlite_store_partitions_by_collection() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        exercise_store(&SqliteVectorStore::new(db));
    }

    #[test]
    fn mismatched_embeddings_rejected() {
        let store = InMemoryVectorStore::new();
        let result = store.store_chunks(
            "c",
            &make_chunks(&["a", "b"]),
            &[vec![1.0]],
            &metadata(),
        );
        assert!(matches!(result, Err(MemoryError::VectorDb(_))));
        assert_eq!(store.count("c").unwrap(), 0);
    }

    #[test]
    fn contents_lists_collection_text() {
        let store = InMemoryVectorStore::new();
        store
            .store_chunks("c", &make_chunks(&["one", "two"]), &[vec![1.0], vec![1.0]], &metadata())
            .unwrap();
        assert_eq!(store.contents("c").unwrap(), vec!["one", "two"]);
        assert!(store.contents("other").unwrap().is_empty());
    }
}
