use super::chunker::ExcerptChunker;
use super::types::{Chunker, EmbeddingModel, MemoryMetadata, MemorySink, ScoredChunk, VectorStore};
use super::MemoryError;

/// Embedding-backed conversation memory.
///
/// Ingested text is chunked, embedded and written to the vector store under
/// its collection. Retrieval embeds the query with the same model.
pub struct ConversationMemory<E, V> {
    chunker: ExcerptChunker,
    embedder: E,
    store: V,
}

impl<E: EmbeddingModel, V: VectorStore> ConversationMemory<E, V> {
    pub fn new(embedder: E, store: V) -> Self {
        Self {
            chunker: ExcerptChunker::new(),
            embedder,
            store,
        }
    }

    pub fn with_chunker(mut self, chunker: ExcerptChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    /// Best `top_k` chunks of `collection` for `query`, highest score first.
    pub fn search(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, MemoryError> {
        let query_embedding = self.embedder.embed(query)?;
        self.store.search(collection, &query_embedding, top_k)
    }

    pub fn count(&self, collection: &str) -> Result<usize, MemoryError> {
        self.store.count(collection)
    }

    /// Forget everything in `collection`. Returns the number of chunks removed.
    pub fn clear_collection(&self, collection: &str) -> Result<usize, MemoryError> {
        let removed = self.store.delete_collection(collection)?;
        tracing::info!(collection, removed, "Cleared conversation memory");
        Ok(removed)
    }
}

impl<E: EmbeddingModel, V: VectorStore> MemorySink for ConversationMemory<E, V> {
    fn add_text(
        &self,
        text: &str,
        collection_name: &str,
        metadata: &MemoryMetadata,
    ) -> Result<usize, MemoryError> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(MemoryError::EmptyText);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        let stored = self
            .store
            .store_chunks(collection_name, &chunks, &embeddings, metadata)?;

        tracing::info!(
            collection = collection_name,
            chunks = stored,
            "Added text to conversation memory"
        );
        Ok(stored)
    }
}
