//! Feedback persistence for chat ratings.
//!
//! [`FeedbackStore`] keeps feedback records in SQLite. When a user gives an
//! assistant message a thumbs-up, the store publishes the rated exchange as a
//! [`FeedbackEvent`]; a [`MemoryIngestionSubscriber`] turns that into an entry
//! in the user's conversation memory.
//!
//! ```no_run
//! use std::sync::Arc;
//! use feedback_store::{
//!     config::StoreConfig, ConversationMemory, FeedbackForm, FeedbackStore,
//!     HashEmbedder, MemoryIngestionSubscriber, SqliteVectorStore,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! feedback_store::init_tracing();
//! let config = StoreConfig::default();
//! let mut store = FeedbackStore::open(&config)?;
//! let memory = ConversationMemory::new(HashEmbedder::new(), SqliteVectorStore::new(store.database()));
//! store.subscribe(MemoryIngestionSubscriber::from_config(Arc::new(memory), &config));
//!
//! let created = store.insert_new_feedback("user-1", FeedbackForm::new("rating"));
//! # let _ = created;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod feedback;
pub mod memory;
pub mod models;

pub use db::{Database, DatabaseError};
pub use feedback::{
    ConversationExcerpt, FeedbackError, FeedbackEvent, FeedbackStore, FeedbackSubscriber,
    PositiveFeedback, SubscriberError,
};
pub use memory::{
    ConversationMemory, HashEmbedder, InMemoryVectorStore, MemoryError,
    MemoryIngestionSubscriber, MemorySink, SqliteVectorStore,
};
pub use models::{
    Feedback, FeedbackFilter, FeedbackForm, FeedbackResponse, MetaData, Rating, RatingData,
    SnapshotData,
};

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`config::default_log_filter`]. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
