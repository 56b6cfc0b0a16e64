//! Conversation memory: the sink that positive feedback excerpts flow into.
//!
//! Text handed to a [`MemorySink`] is split into chunks, embedded and stored
//! per collection so later prompts can retrieve it by similarity.

pub mod types;
pub mod chunker;
pub mod embedder;
pub mod vectordb;
pub mod conversation;
pub mod subscriber;

pub use chunker::ExcerptChunker;
pub use conversation::ConversationMemory;
pub use embedder::HashEmbedder;
pub use subscriber::MemoryIngestionSubscriber;
pub use types::*;
pub use vectordb::{InMemoryVectorStore, SqliteVectorStore};

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Vector DB error: {0}")]
    VectorDb(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Nothing to ingest: text is empty")]
    EmptyText,
}
