mod json_schema;
mod schema;

pub use json_schema::{write_attribute_schema, ATTRIBUTE_SCHEMA};
pub use schema::{Config, Settings};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::control::{parse_offset, SiteTimezone};

const CONFIG_ENV_VAR: &str = "BLOCK_CONTROL_CONFIG";

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("block-control")
        .join("settings.json")
}

/// load the settings file, falling back to defaults when it does not exist
pub fn load() -> Result<Config> {
    load_from(&get_config_path())
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

pub fn save_to(path: &Path, config: &Config) -> Result<()> {
    // ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    Ok(validate(&config.settings))
}

/// check settings for values the evaluator would reject at render time
pub fn validate(settings: &Settings) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(name) = settings.timezone_string.as_deref() {
        if !name.trim().is_empty() {
            if let Err(e) = SiteTimezone::named(name).resolve() {
                errors.push(format!("settings.timezone_string: {}", e));
            }
        }
    }

    if let Some(offset) = settings.gmt_offset.as_deref() {
        if !offset.trim().is_empty() {
            if let Err(e) = parse_offset(offset) {
                errors.push(format!("settings.gmt_offset: {}", e));
            }
        }
    }

    for (i, name) in settings.unsupported_blocks.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(format!("settings.unsupported_blocks[{}]: empty block name", i));
        }
    }

    errors
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["settings", "timezone_string"] => {
            let value = value.trim();
            if !value.is_empty() {
                SiteTimezone::named(value)
                    .resolve()
                    .with_context(|| format!("Invalid timezone: {}", value))?;
            }
            config.settings.timezone_string = non_empty(value);
        }
        ["settings", "gmt_offset"] => {
            let value = value.trim();
            if !value.is_empty() {
                parse_offset(value).with_context(|| format!("Invalid offset: {}", value))?;
            }
            config.settings.gmt_offset = non_empty(value);
        }
        ["settings", "unsupported_blocks"] => {
            config.settings.unsupported_blocks = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: settings.timezone_string, settings.gmt_offset, settings.unsupported_blocks",
                key
            ));
        }
    }

    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
