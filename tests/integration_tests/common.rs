// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use block_control::Block;

/// parse an RFC 3339 timestamp
pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid test timestamp")
        .with_timezone(&Utc)
}

/// build a paragraph block with the given attributes
pub fn paragraph(attrs: Value) -> Block {
    Block::new("core/paragraph", attrs)
}

/// write a settings file into the given directory
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("settings.json");
    fs::write(&path, content).expect("Failed to write config");
    path
}
