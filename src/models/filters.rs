/// Selection for feedback listings. Empty filter matches every record.
#[derive(Debug, Default, Clone)]
pub struct FeedbackFilter {
    pub user_id: Option<String>,
    pub feedback_type: Option<String>,
}

impl FeedbackFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn by_type(feedback_type: impl Into<String>) -> Self {
        Self {
            feedback_type: Some(feedback_type.into()),
            ..Default::default()
        }
    }
}
