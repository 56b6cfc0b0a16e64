//! Notifications emitted by the feedback store after a write commits.
//!
//! Subscribers run synchronously on the caller's thread, in registration
//! order. A subscriber error is logged and never reaches the caller of the
//! store operation that produced the event.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::excerpt::ConversationExcerpt;
use crate::memory::MemoryError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedbackEvent {
    PositiveFeedbackRecorded(PositiveFeedback),
}

/// A thumbs-up on an assistant message, with the exchange it rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositiveFeedback {
    pub feedback_id: Uuid,
    pub user_id: String,
    pub message_id: String,
    pub excerpt: ConversationExcerpt,
}

#[derive(Error, Debug)]
pub enum SubscriberError {
    #[error("Memory ingestion failed: {0}")]
    Memory(#[from] MemoryError),

    #[error("Subscriber rejected event: {0}")]
    Rejected(String),
}

pub trait FeedbackSubscriber: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn handle(&self, event: &FeedbackEvent) -> Result<(), SubscriberError>;
}

/// Ordered list of subscribers.
#[derive(Default, Clone)]
pub struct FeedbackEvents {
    subscribers: Vec<Arc<dyn FeedbackSubscriber>>,
}

impl FeedbackEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn FeedbackSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver `event` to every subscriber. Returns how many handled it
    /// without error.
    pub fn publish(&self, event: &FeedbackEvent) -> usize {
        let mut delivered = 0;
        for subscriber in &self.subscribers {
            match subscriber.handle(event) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    subscriber = subscriber.name(),
                    error = %e,
                    "Feedback subscriber failed"
                ),
            }
        }
        delivered
    }
}
