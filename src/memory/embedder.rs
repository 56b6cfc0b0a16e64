use super::types::EmbeddingModel;
use super::MemoryError;

/// Default embedding dimension, matching all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Deterministic feature-hashing embedder.
///
/// Each lowercase alphanumeric token is hashed (FNV-1a) into one of
/// `dimension` buckets with a sign bit, then the vector is L2-normalized.
/// Texts sharing words land close together, which is enough for excerpt
/// recall without shipping a neural model.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: EMBEDDING_DIM,
        }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        Ok(hashed_vector(text, self.dimension))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, MemoryError> {
        Ok(texts
            .iter()
            .map(|t| hashed_vector(t, self.dimension))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn hashed_vector(text: &str, dim: usize) -> Vec<f32> {
    let mut vec = vec![0.0f32; dim];

    let lowered = text.to_lowercase();
    for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
        let hash = fnv1a(token.as_bytes());
        let bucket = (hash % dim as u64) as usize;
        let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
        vec[bucket] += sign;
    }

    // L2 normalize
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in &mut vec {
            *val /= norm;
        }
    }

    vec
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::cosine_similarity;

    #[test]
    fn embed_returns_correct_dimension() {
        let embedder = HashEmbedder::new();
        let vec = embedder.embed("Hello world").unwrap();
        assert_eq!(vec.len(), EMBEDDING_DIM);
    }

    #[test]
    fn embed_batch_returns_correct_count() {
        let embedder = HashEmbedder::new();
        let texts = vec!["text one", "text two", "text three"];
        let vecs = embedder.embed_batch(&texts).unwrap();
        assert_eq!(vecs.len(), 3);
        for v in &vecs {
            assert_eq!(v.len(), EMBEDDING_DIM);
        }
    }

    #[test]
    fn embed_is_deterministic_and_case_insensitive() {
        let embedder = HashEmbedder::new();
        let v1 = embedder.embed("Same text").unwrap();
        let v2 = embedder.embed("same TEXT").unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn embed_is_unit_length() {
        let embedder = HashEmbedder::new();
        let v = embedder.embed("how do I reset my password").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new();
        let v = embedder.embed("").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn shared_words_score_higher() {
        let embedder = HashEmbedder::new();
        let query = embedder.embed("rust borrow checker").unwrap();
        let close = embedder.embed("User: explain the borrow checker in rust").unwrap();
        let far = embedder.embed("User: best pasta recipe").unwrap();
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }
}
