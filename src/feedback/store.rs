use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::events::{FeedbackEvent, FeedbackEvents, FeedbackSubscriber, PositiveFeedback};
use super::excerpt::positive_feedback_excerpt;
use super::FeedbackError;
use crate::config::StoreConfig;
use crate::db::{repository, Database};
use crate::models::*;

/// Durable CRUD over feedback records.
///
/// Every method runs in its own transaction. Methods taking `owner` restrict
/// the lookup to records of that user; `None` means unscoped. A record owned
/// by someone else is indistinguishable from a missing one.
pub struct FeedbackStore {
    db: Arc<Database>,
    events: FeedbackEvents,
}

impl FeedbackStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            events: FeedbackEvents::new(),
        }
    }

    /// Open the database file named by `config`, creating it if needed.
    pub fn open(config: &StoreConfig) -> Result<Self, FeedbackError> {
        if let Some(parent) = config.database_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(dir = %parent.display(), error = %e, "Could not create data directory");
            }
        }
        let db = Database::open(&config.database_path)?;
        tracing::info!(path = %config.database_path.display(), "Feedback store opened");
        Ok(Self::new(Arc::new(db)))
    }

    /// Shared database handle, e.g. for a `SqliteVectorStore`.
    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Register a subscriber for events emitted after successful writes.
    pub fn subscribe(&mut self, subscriber: impl FeedbackSubscriber + 'static) {
        self.events.subscribe(Arc::new(subscriber));
    }

    /// Persist a new record for `user_id`.
    ///
    /// Returns `None` if the write fails; the error is logged, not returned.
    /// After commit, a positive rating on a message found in the snapshot
    /// emits [`FeedbackEvent::PositiveFeedbackRecorded`].
    pub fn insert_new_feedback(&self, user_id: &str, form: FeedbackForm) -> Option<Feedback> {
        let now = Utc::now().timestamp();
        let feedback = Feedback {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            version: 0,
            feedback_type: form.feedback_type,
            data: form.data,
            meta: form.meta,
            snapshot: form.snapshot,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self
            .db
            .with_transaction(|tx| repository::insert_feedback(tx, &feedback))
        {
            tracing::error!(user_id, error = %e, "Error creating a new feedback");
            return None;
        }

        self.emit_positive_feedback(&feedback);
        Some(feedback)
    }

    fn emit_positive_feedback(&self, feedback: &Feedback) {
        let Some((message_id, excerpt)) = positive_feedback_excerpt(feedback) else {
            return;
        };

        let event = FeedbackEvent::PositiveFeedbackRecorded(PositiveFeedback {
            feedback_id: feedback.id,
            user_id: feedback.user_id.clone(),
            message_id,
            excerpt,
        });
        let delivered = self.events.publish(&event);
        tracing::debug!(
            feedback_id = %feedback.id,
            delivered,
            subscribers = self.events.len(),
            "Positive feedback event published"
        );
    }

    pub fn get_feedback(
        &self,
        id: &Uuid,
        owner: Option<&str>,
    ) -> Result<Option<Feedback>, FeedbackError> {
        Ok(self
            .db
            .with_transaction(|tx| repository::get_feedback(tx, id, owner))?)
    }

    /// Records matching `filter`, most recently updated first.
    pub fn get_feedbacks(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>, FeedbackError> {
        Ok(self
            .db
            .with_transaction(|tx| repository::list_feedbacks(tx, filter))?)
    }

    pub fn get_all_feedbacks(&self) -> Result<Vec<Feedback>, FeedbackError> {
        self.get_feedbacks(&FeedbackFilter::all())
    }

    pub fn get_feedbacks_by_type(&self, feedback_type: &str) -> Result<Vec<Feedback>, FeedbackError> {
        self.get_feedbacks(&FeedbackFilter::by_type(feedback_type))
    }

    pub fn get_feedbacks_by_user_id(&self, user_id: &str) -> Result<Vec<Feedback>, FeedbackError> {
        self.get_feedbacks(&FeedbackFilter::by_user(user_id))
    }

    /// Same as [`get_feedbacks`](Self::get_feedbacks) without the snapshots.
    pub fn get_feedback_responses(
        &self,
        filter: &FeedbackFilter,
    ) -> Result<Vec<FeedbackResponse>, FeedbackError> {
        Ok(self
            .get_feedbacks(filter)?
            .into_iter()
            .map(FeedbackResponse::from)
            .collect())
    }

    /// Replace the payloads present in `form` and bump `updated_at`.
    ///
    /// `form.feedback_type` is ignored. Payloads are replaced whole, never
    /// merged. Returns `Ok(None)` if the record is absent or not owned.
    pub fn update_feedback(
        &self,
        id: &Uuid,
        owner: Option<&str>,
        form: FeedbackForm,
    ) -> Result<Option<Feedback>, FeedbackError> {
        let now = Utc::now().timestamp();
        self.db
            .with_transaction(|tx| -> Result<Option<Feedback>, FeedbackError> {
                let Some(mut feedback) = repository::get_feedback(tx, id, owner)? else {
                    return Ok(None);
                };

                if let Some(data) = form.data {
                    feedback.data = Some(data);
                }
                if let Some(meta) = form.meta {
                    feedback.meta = Some(meta);
                }
                if let Some(snapshot) = form.snapshot {
                    feedback.snapshot = Some(snapshot);
                }
                // Never move backwards, even if the wall clock does
                feedback.updated_at = now.max(feedback.updated_at);

                repository::update_feedback(tx, &feedback)?;
                Ok(Some(feedback))
            })
    }

    /// Returns false if no matching record existed.
    pub fn delete_feedback(&self, id: &Uuid, owner: Option<&str>) -> Result<bool, FeedbackError> {
        Ok(self
            .db
            .with_transaction(|tx| repository::delete_feedback(tx, id, owner))?)
    }

    /// Returns false if the user had no records.
    pub fn delete_feedbacks_by_user_id(&self, user_id: &str) -> Result<bool, FeedbackError> {
        let deleted = self
            .db
            .with_transaction(|tx| repository::delete_feedbacks(tx, Some(user_id)))?;
        if deleted > 0 {
            tracing::info!(user_id, deleted, "Deleted user feedback");
        }
        Ok(deleted > 0)
    }

    /// Returns false if the table was already empty.
    pub fn delete_all_feedbacks(&self) -> Result<bool, FeedbackError> {
        let deleted = self
            .db
            .with_transaction(|tx| repository::delete_feedbacks(tx, None))?;
        if deleted > 0 {
            tracing::info!(deleted, "Deleted all feedback");
        }
        Ok(deleted > 0)
    }

    pub fn count_feedbacks(&self, owner: Option<&str>) -> Result<usize, FeedbackError> {
        Ok(self
            .db
            .with_transaction(|tx| repository::count_feedbacks(tx, owner))?)
    }
}
