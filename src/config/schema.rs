use serde::{Deserialize, Deserializer, Serialize};

use crate::control::SiteTimezone;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

/// site-level settings the rules depend on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// IANA zone name; takes priority over `gmt_offset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_string: Option<String>,
    /// UTC offset in hours, stored as a number or a string
    #[serde(
        default,
        deserialize_with = "deserialize_offset",
        skip_serializing_if = "Option::is_none"
    )]
    pub gmt_offset: Option<String>,
    /// block names the visibility rules never apply to
    #[serde(default)]
    pub unsupported_blocks: Vec<String>,
}

impl Settings {
    /// timezone settings for an evaluation context
    pub fn timezone(&self) -> SiteTimezone {
        SiteTimezone {
            timezone_string: self.timezone_string.clone(),
            gmt_offset: self.gmt_offset.clone(),
        }
    }
}

/// accept `"gmt_offset": 5.5` as well as `"gmt_offset": "5.5"`
fn deserialize_offset<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawOffset {
        Number(serde_json::Number),
        Text(String),
    }

    let raw: Option<RawOffset> = Option::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        RawOffset::Number(n) => n.to_string(),
        RawOffset::Text(s) => s,
    }))
}
