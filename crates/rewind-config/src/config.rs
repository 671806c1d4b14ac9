/// Application configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Store key used for a persisted history when none is configured.
pub const DEFAULT_HISTORY_KEY: &str = "useUndoRedoPersist";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "REWIND_DATA_DIR";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Store key of the history the CLI operates on.
    pub default_key: String,
    /// Directory holding the store database. Empty = resolved at runtime.
    pub data_dir: String,
    /// Maximum number of past entries kept per history. 0 = unbounded.
    pub max_history_depth: usize,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Whether values are printed as pretty JSON.
    pub pretty_print: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_key: DEFAULT_HISTORY_KEY.to_string(),
            data_dir: String::new(),
            max_history_depth: 0,
            log_level: "info".to_string(),
            pretty_print: true,
        }
    }
}

impl AppConfig {
    /// Returns the config file path: exe directory + `rewind.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("rewind.json")))
            .unwrap_or_else(|| PathBuf::from("rewind.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Return defaults on error (don't overwrite broken file)
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Returns the effective data directory.
    ///
    /// An explicit `data_dir` wins; otherwise see [`resolve_data_dir`].
    pub fn resolve_data_dir(&self) -> PathBuf {
        if self.data_dir.is_empty() {
            resolve_data_dir()
        } else {
            PathBuf::from(&self.data_dir)
        }
    }

    /// Returns the depth bound as an option (`None` = unbounded).
    pub fn history_depth(&self) -> Option<usize> {
        (self.max_history_depth > 0).then_some(self.max_history_depth)
    }

    /// Resets invalid fields to their defaults.
    pub fn sanitize(&mut self) {
        let key = self.default_key.trim();
        self.default_key = if key.is_empty() {
            DEFAULT_HISTORY_KEY.to_string()
        } else {
            key.to_string()
        };

        self.log_level = self.log_level.trim().to_ascii_lowercase();
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            self.log_level = "info".to_string();
        }
    }
}

/// Resolves the data directory path.
///
/// Resolution order:
/// 1. `REWIND_DATA_DIR` environment variable
/// 2. The platform's local data directory + `rewind`
/// 3. `.data/` directory next to the executable
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = dirs::data_local_dir() {
        return dir.join("rewind");
    }
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
    exe.parent().unwrap_or(Path::new(".")).join(".data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_key, "useUndoRedoPersist");
        assert!(config.data_dir.is_empty());
        assert_eq!(config.max_history_depth, 0);
        assert_eq!(config.log_level, "info");
        assert!(config.pretty_print);
    }

    #[test]
    fn test_sanitize_empty_key_resets() {
        let mut config = AppConfig::default();
        config.default_key = "   ".to_string();
        config.sanitize();
        assert_eq!(config.default_key, DEFAULT_HISTORY_KEY);
    }

    #[test]
    fn test_sanitize_trims_key() {
        let mut config = AppConfig::default();
        config.default_key = "  drawing  ".to_string();
        config.sanitize();
        assert_eq!(config.default_key, "drawing");
    }

    #[test]
    fn test_sanitize_unknown_log_level_resets() {
        let mut config = AppConfig::default();
        config.log_level = "chatty".to_string();
        config.sanitize();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_sanitize_normalizes_log_level_case() {
        let mut config = AppConfig::default();
        config.log_level = "DEBUG".to_string();
        config.sanitize();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_history_depth() {
        let mut config = AppConfig::default();
        assert_eq!(config.history_depth(), None);
        config.max_history_depth = 25;
        assert_eq!(config.history_depth(), Some(25));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let mut config = AppConfig::default();
        config.data_dir = "/custom/data".to_string();
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/custom/data"));
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let json = r#"{"default_key": "canvas"}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.default_key, "canvas");
        assert_eq!(parsed.log_level, "info");
        assert!(parsed.pretty_print);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut config = AppConfig::default();
        config.max_history_depth = 7;
        config.pretty_print = false;
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.max_history_depth, 7);
        assert!(!parsed.pretty_print);
    }
}
