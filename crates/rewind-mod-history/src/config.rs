/// Configuration for the history system.
use rewind_config::AppConfig;

pub use rewind_config::DEFAULT_HISTORY_KEY;

/// Configuration for a `HistoryManager`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Store key the timeline is persisted under.
    pub key: String,
    /// Maximum number of `past` entries kept. `None` = unbounded.
    pub max_history_depth: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_HISTORY_KEY.to_string(),
            max_history_depth: None,
        }
    }
}

impl HistoryConfig {
    /// Default configuration persisted under `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Builds the history settings from the application config.
    pub fn from_app_config(app: &AppConfig) -> Self {
        Self {
            key: app.default_key.clone(),
            max_history_depth: app.history_depth(),
        }
    }
}
