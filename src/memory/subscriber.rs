use serde_json::Value;

use super::types::{MemoryMetadata, MemorySink};
use crate::config::{StoreConfig, FEEDBACK_MEMORY_SOURCE, MEMORY_COLLECTION_PREFIX};
use crate::feedback::events::{FeedbackEvent, FeedbackSubscriber, SubscriberError};

/// Forwards positive-feedback excerpts into a per-user memory collection.
pub struct MemoryIngestionSubscriber<S> {
    sink: S,
    collection_prefix: String,
}

impl<S: MemorySink> MemoryIngestionSubscriber<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            collection_prefix: MEMORY_COLLECTION_PREFIX.to_string(),
        }
    }

    /// Subscriber using the collection prefix from `config`.
    pub fn from_config(sink: S, config: &StoreConfig) -> Self {
        Self::new(sink).with_collection_prefix(config.collection_prefix.clone())
    }

    pub fn with_collection_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.collection_prefix = prefix.into();
        self
    }

    /// Collection holding `user_id`'s conversation memory.
    pub fn collection_name(&self, user_id: &str) -> String {
        format!("{}{}", self.collection_prefix, user_id)
    }
}

impl<S: MemorySink> FeedbackSubscriber for MemoryIngestionSubscriber<S> {
    fn name(&self) -> &str {
        "conversation_memory"
    }

    fn handle(&self, event: &FeedbackEvent) -> Result<(), SubscriberError> {
        match event {
            FeedbackEvent::PositiveFeedbackRecorded(positive) => {
                let collection = self.collection_name(&positive.user_id);
                tracing::info!("Adding positive feedback to conversation memory: {collection}");

                let mut metadata = MemoryMetadata::new();
                metadata.insert("source".into(), Value::from(FEEDBACK_MEMORY_SOURCE));
                metadata.insert("message_id".into(), Value::from(positive.message_id.as_str()));

                self.sink
                    .add_text(&positive.excerpt.to_text(), &collection, &metadata)?;
                Ok(())
            }
        }
    }
}
