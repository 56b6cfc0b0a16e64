use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::MemoryError;

/// Free-form key/value metadata attached to ingested text.
pub type MemoryMetadata = Map<String, Value>;

/// A piece of ingested text, before embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub content: String,
    pub chunk_index: usize,
}

/// A stored chunk with its similarity to a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: Uuid,
    pub collection: String,
    pub content: String,
    pub score: f32,
    pub metadata: MemoryMetadata,
}

/// Chunking strategy trait
pub trait Chunker {
    fn chunk(&self, text: &str) -> Vec<TextChunk>;
}

/// Embedding model abstraction
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError>;
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, MemoryError>;
    fn dimension(&self) -> usize;
}

/// Allow `Box<dyn EmbeddingModel>` to be used as `&impl EmbeddingModel`.
impl EmbeddingModel for Box<dyn EmbeddingModel> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, MemoryError> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Vector store abstraction, partitioned by collection name.
pub trait VectorStore: Send + Sync {
    fn store_chunks(
        &self,
        collection: &str,
        chunks: &[TextChunk],
        embeddings: &[Vec<f32>],
        metadata: &MemoryMetadata,
    ) -> Result<usize, MemoryError>;

    fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, MemoryError>;

    fn count(&self, collection: &str) -> Result<usize, MemoryError>;

    fn delete_collection(&self, collection: &str) -> Result<usize, MemoryError>;
}

/// Accepts text for indexing into conversation memory.
pub trait MemorySink: Send + Sync {
    /// Returns the number of chunks stored.
    fn add_text(
        &self,
        text: &str,
        collection_name: &str,
        metadata: &MemoryMetadata,
    ) -> Result<usize, MemoryError>;
}

impl<S: MemorySink + ?Sized> MemorySink for Arc<S> {
    fn add_text(
        &self,
        text: &str,
        collection_name: &str,
        metadata: &MemoryMetadata,
    ) -> Result<usize, MemoryError> {
        (**self).add_text(text, collection_name, metadata)
    }
}

/// Cosine similarity; 0.0 for mismatched or zero-length vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_similarity_identical_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim - 1.0).abs() < 0.01);
    }

    #[test]
    fn cosine_similarity_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 0.01);
    }

    #[test]
    fn cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
