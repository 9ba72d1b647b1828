// integration tests for the settings file

use std::fs;

use block_control::config::{self, Config};
use block_control::{Block, BlockControl, EvalContext};
use serde_json::json;

use crate::common::{at, write_config};

#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = config::load_from(&dir.path().join("nope.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{
            "settings": {
                "timezone_string": "",
                "gmt_offset": 2,
                "unsupported_blocks": ["core/freeform"]
            }
        }"#,
    );

    let config = config::load_from(&path).unwrap();
    assert_eq!(config.settings.gmt_offset.as_deref(), Some("2"));
    assert_eq!(config.settings.unsupported_blocks, vec!["core/freeform"]);
}

#[test]
fn test_invalid_json_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "{ settings: ");

    let err = config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    assert!(err.to_string().contains("settings.json"));
}

#[test]
fn test_verify_reports_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{ "settings": { "timezone_string": "Europe/Nowhere", "gmt_offset": "x" } }"#,
    );

    let errors = config::verify(&path).unwrap();
    assert_eq!(errors.len(), 2, "errors: {:?}", errors);
}

#[test]
fn test_verify_out_of_range_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{ "settings": { "gmt_offset": "1000000:00" } }"#,
    );

    let errors = config::verify(&path).unwrap();
    assert_eq!(errors.len(), 1, "errors: {:?}", errors);
    assert!(errors[0].starts_with("settings.gmt_offset"));
}

#[test]
fn test_verify_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{ "settings": { "timezone_string": "Asia/Kolkata", "gmt_offset": 5.5 } }"#,
    );
    assert!(config::verify(&path).unwrap().is_empty());
}

#[test]
fn test_verify_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(config::verify(&dir.path().join("missing.json")).is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut config = Config::default();
    config::set_value(&mut config, "settings.timezone_string", "Europe/Paris").unwrap();
    config::set_value(&mut config, "settings.unsupported_blocks", "core/html").unwrap();
    config::save_to(&path, &config).unwrap();

    assert!(fs::read_to_string(&path).unwrap().contains("Europe/Paris"));
    assert_eq!(config::load_from(&path).unwrap(), config);
}

#[test]
fn test_loaded_settings_drive_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{ "settings": { "gmt_offset": "-5", "unsupported_blocks": ["core/html"] } }"#,
    );
    let config = config::load_from(&path).unwrap();
    let control = BlockControl::new(&config.settings);
    let tz = config.settings.timezone();

    // 2024-06-01T00:00:00 at UTC-5 is 05:00 UTC
    let attrs = json!({ "hideByDate": true, "hideByDateStart": "2024-06-01T00:00:00" });
    let before = EvalContext::new(at("2024-06-01T04:59:00Z"), &tz);
    let after = EvalContext::new(at("2024-06-01T05:00:00Z"), &tz);

    let block = Block::new("core/paragraph", attrs.clone());
    assert_eq!(control.render_block("<p>x</p>", &block, &before), "<p>x</p>");
    assert_eq!(control.render_block("<p>x</p>", &block, &after), "");

    let html = Block::new("core/html", attrs);
    assert_eq!(control.render_block("<p>x</p>", &html, &after), "<p>x</p>");
}
