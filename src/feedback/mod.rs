pub mod events;
pub mod excerpt;
pub mod store;

pub use events::{FeedbackEvent, FeedbackEvents, FeedbackSubscriber, PositiveFeedback, SubscriberError};
pub use excerpt::{extract_excerpt, positive_feedback_excerpt, ConversationExcerpt};
pub use store::FeedbackStore;

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
