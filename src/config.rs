use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "FeedbackStore";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collection names for conversation memory are this prefix + user id.
pub const MEMORY_COLLECTION_PREFIX: &str = "conversation_memory_";

/// `source` metadata value on memory ingested from feedback.
pub const FEEDBACK_MEMORY_SOURCE: &str = "feedback";

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "feedback.db";

/// Get the application data directory.
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the feedback database.
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,feedback_store=debug"
}

/// Runtime settings for a [`FeedbackStore`](crate::feedback::FeedbackStore)
/// and its conversation-memory subscriber.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub collection_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: database_path(),
            collection_prefix: MEMORY_COLLECTION_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with(DATABASE_FILE));
    }

    #[test]
    fn app_data_dir_named_after_app() {
        assert!(app_data_dir().ends_with(APP_NAME));
    }

    #[test]
    fn default_config_uses_conversation_memory_prefix() {
        let config = StoreConfig::default();
        assert_eq!(config.collection_prefix, "conversation_memory_");
        assert_eq!(config.database_path, database_path());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
