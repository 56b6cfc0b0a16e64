//! Deriving a prompt/response pair from a chat snapshot.
//!
//! Snapshot layout (only the parts read here):
//!
//! ```text
//! chat.history.messages: { <message_id>: { content, parentId? }, ... }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Feedback, SnapshotData};

/// A user prompt and the assistant response that answered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationExcerpt {
    pub user: String,
    pub assistant: String,
}

impl ConversationExcerpt {
    /// Two-line transcript form used for memory ingestion.
    pub fn to_text(&self) -> String {
        format!("User: {}\nAssistant: {}", self.user, self.assistant)
    }
}

/// Locate `message_id` in the snapshot and pair it with its parent message.
///
/// Returns `None` when the chat history is missing, the message is unknown,
/// it has no resolvable `parentId`, or either side lacks `content`.
pub fn extract_excerpt(snapshot: &SnapshotData, message_id: &str) -> Option<ConversationExcerpt> {
    let messages = snapshot
        .chat
        .as_ref()?
        .get("history")?
        .get("messages")?
        .as_object()?;

    let response = messages.get(message_id)?;
    let parent_id = response.get("parentId")?.as_str().filter(|id| !id.is_empty())?;
    let prompt = messages.get(parent_id)?;

    Some(ConversationExcerpt {
        user: content_text(prompt)?,
        assistant: content_text(response)?,
    })
}

/// The message id and excerpt for a record that qualifies for conversation
/// memory: integer rating of 1, a chat snapshot, and a `meta.message_id`.
pub fn positive_feedback_excerpt(feedback: &Feedback) -> Option<(String, ConversationExcerpt)> {
    if !feedback.data.as_ref().is_some_and(|d| d.is_positive()) {
        return None;
    }

    let snapshot = feedback.snapshot.as_ref().filter(|s| s.chat.is_some())?;
    let message_id = feedback
        .meta
        .as_ref()?
        .message_id
        .as_deref()
        .filter(|id| !id.is_empty())?;

    let excerpt = extract_excerpt(snapshot, message_id);
    if excerpt.is_none() {
        tracing::debug!(
            feedback_id = %feedback.id,
            message_id,
            "Rated message or its prompt not found in snapshot"
        );
    }
    excerpt.map(|e| (message_id.to_string(), e))
}

fn content_text(message: &Value) -> Option<String> {
    match message.get("content")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
