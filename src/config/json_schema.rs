use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// attribute definitions merged into every block type by the editor
pub const ATTRIBUTE_SCHEMA: &str = r##"{
  "hideDesktop": {
    "type": "boolean",
    "default": false
  },
  "hideMobile": {
    "type": "boolean",
    "default": false
  },
  "hideTablet": {
    "type": "boolean",
    "default": false
  },
  "loginStatus": {
    "type": "string",
    "enum": ["none", "logged-in", "logged-out"],
    "default": "none"
  },
  "hideByDate": {
    "type": "boolean",
    "default": false
  },
  "hideByDateStart": {
    "type": "string",
    "default": ""
  },
  "hideByDateEnd": {
    "type": "string",
    "default": ""
  },
  "hideRoles": {
    "type": "object",
    "default": {}
  },
  "hideConditionalTags": {
    "type": "object",
    "default": {}
  },
  "hidePosts": {
    "type": "object",
    "default": {}
  },
  "hideScreenReader": {
    "type": "boolean",
    "default": false
  }
}"##;

/// write the attribute schema for the editor bundle
pub fn write_attribute_schema(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, ATTRIBUTE_SCHEMA)
        .with_context(|| format!("Failed to write attribute schema: {}", path.display()))?;

    Ok(())
}
