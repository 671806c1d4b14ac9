use rewind_config::{AppConfig, DEFAULT_HISTORY_KEY};

#[test]
fn test_load_creates_default_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    assert!(!path.exists());

    let config = AppConfig::load_or_create(&path);
    assert!(path.exists());
    assert_eq!(config.default_key, DEFAULT_HISTORY_KEY);

    // File should contain valid JSON
    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert!(parsed.is_object());
}

#[test]
fn test_load_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    let json = r#"{
        "default_key": "sketch",
        "data_dir": "/srv/rewind",
        "max_history_depth": 50,
        "log_level": "warn",
        "pretty_print": false
    }"#;
    std::fs::write(&path, json).unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config.default_key, "sketch");
    assert_eq!(config.data_dir, "/srv/rewind");
    assert_eq!(config.history_depth(), Some(50));
    assert_eq!(config.log_level, "warn");
    assert!(!config.pretty_print);
}

#[test]
fn test_broken_json_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    std::fs::write(&path, "{ this is not valid json }}}").unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config.default_key, DEFAULT_HISTORY_KEY);

    // Broken file is left alone
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "{ this is not valid json }}}");
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    std::fs::write(&path, r#"{"max_history_depth": 3}"#).unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config.max_history_depth, 3);
    assert_eq!(config.default_key, DEFAULT_HISTORY_KEY);
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_loaded_config_is_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");
    std::fs::write(&path, r#"{"default_key": "", "log_level": "LOUD"}"#).unwrap();

    let config = AppConfig::load_or_create(&path);
    assert_eq!(config.default_key, DEFAULT_HISTORY_KEY);
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewind.json");

    let mut config = AppConfig::default();
    config.default_key = "notes".to_string();
    config.max_history_depth = 12;
    config.save(&path).unwrap();

    let loaded = AppConfig::load_or_create(&path);
    assert_eq!(loaded.default_key, "notes");
    assert_eq!(loaded.max_history_depth, 12);
}
