use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored user judgment about an assistant response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: String,
    /// Always 0. Kept in the schema for future conflict detection.
    pub version: i64,
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub data: Option<RatingData>,
    pub meta: Option<MetaData>,
    pub snapshot: Option<SnapshotData>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Feedback without the embedded chat snapshot, for list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub user_id: String,
    pub version: i64,
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub data: Option<RatingData>,
    pub meta: Option<MetaData>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id,
            user_id: feedback.user_id,
            version: feedback.version,
            feedback_type: feedback.feedback_type,
            data: feedback.data,
            meta: feedback.meta,
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
        }
    }
}

/// Rating value as submitted by the client: a number (thumbs up = 1,
/// thumbs down = -1) or a free-form label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Number(i64),
    Text(String),
}

impl Rating {
    /// Only the integer 1 counts as positive; the string "1" does not.
    pub fn is_positive(&self) -> bool {
        matches!(self, Rating::Number(1))
    }
}

impl From<i64> for Rating {
    fn from(value: i64) -> Self {
        Rating::Number(value)
    }
}

impl From<&str> for Rating {
    fn from(value: &str) -> Self {
        Rating::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sibling_model_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Client-specific fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RatingData {
    pub fn is_positive(&self) -> bool {
        self.rating.as_ref().is_some_and(Rating::is_positive)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arena: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Copy of the chat state at the moment the feedback was given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client submission for create and update.
///
/// On update, `feedback_type` is ignored and every `Some` payload replaces
/// the stored one wholesale. Unknown top-level keys are accepted and dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackForm {
    #[serde(rename = "type")]
    pub feedback_type: String,
    #[serde(default)]
    pub data: Option<RatingData>,
    #[serde(default)]
    pub meta: Option<MetaData>,
    #[serde(default)]
    pub snapshot: Option<SnapshotData>,
}

impl FeedbackForm {
    pub fn new(feedback_type: impl Into<String>) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: RatingData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_meta(mut self, meta: MetaData) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotData) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}
