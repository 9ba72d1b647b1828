//! attribute types for the visibility rules
//!
//! the attribute schema grew over time (device only, then login, date and
//! roles, then conditional tags, posts and screen readers). every key is
//! optional and decoded on its own, so a block saved by any schema version
//! evaluates without errors.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// required authentication state for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoginStatus {
    /// no requirement
    None,
    /// only show to logged-in viewers
    LoggedIn,
    /// only show to logged-out viewers
    LoggedOut,
}

impl LoginStatus {
    /// parse from the stored attribute value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(LoginStatus::None),
            "logged-in" => Some(LoginStatus::LoggedIn),
            "logged-out" => Some(LoginStatus::LoggedOut),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::None => "none",
            LoginStatus::LoggedIn => "logged-in",
            LoginStatus::LoggedOut => "logged-out",
        }
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// flag map keyed by role name or conditional tag name
pub type FlagMap = BTreeMap<String, bool>;

/// post type -> (post id or "all" -> flag)
pub type PostTargets = BTreeMap<String, FlagMap>;

/// key inside a post type map that targets every post of that type
pub const ALL_POSTS: &str = "all";

/// visibility attributes of a single block instance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_desktop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_mobile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_tablet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_status: Option<LoginStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_by_date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_by_date_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_by_date_end: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hide_roles: FlagMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hide_conditional_tags: FlagMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hide_posts: PostTargets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_screen_reader: Option<bool>,
}

impl BlockAttributes {
    /// decode attributes from a block's JSON attribute object
    ///
    /// values with an unexpected JSON type are treated as absent and unknown
    /// keys are ignored. anything other than an object decodes to the empty
    /// attribute set.
    pub fn from_json(json: &JsonValue) -> Self {
        let obj = match json.as_object() {
            Some(obj) => obj,
            None => return Self::default(),
        };

        Self {
            hide_desktop: bool_attr(obj, "hideDesktop", Some("hide_desktop")),
            hide_mobile: bool_attr(obj, "hideMobile", Some("hide_mobile")),
            hide_tablet: bool_attr(obj, "hideTablet", Some("hide_tablet")),
            login_status: str_attr(obj, "loginStatus", Some("login_status"))
                .and_then(LoginStatus::parse),
            hide_by_date: bool_attr(obj, "hideByDate", None),
            hide_by_date_start: str_attr(obj, "hideByDateStart", None).map(str::to_string),
            hide_by_date_end: str_attr(obj, "hideByDateEnd", None).map(str::to_string),
            hide_roles: flag_map(obj.get("hideRoles")),
            hide_conditional_tags: flag_map(obj.get("hideConditionalTags")),
            hide_posts: post_targets(obj.get("hidePosts")),
            hide_screen_reader: bool_attr(obj, "hideScreenReader", None),
        }
    }

    /// decode attributes from a JSON string
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let json: JsonValue = serde_json::from_str(s)?;
        Ok(Self::from_json(&json))
    }

    /// true when no recognized attribute is set
    pub fn is_empty(&self) -> bool {
        self.hide_desktop.is_none()
            && self.hide_mobile.is_none()
            && self.hide_tablet.is_none()
            && self.login_status.is_none()
            && self.hide_by_date.is_none()
            && self.hide_by_date_start.is_none()
            && self.hide_by_date_end.is_none()
            && self.hide_roles.is_empty()
            && self.hide_conditional_tags.is_empty()
            && self.hide_posts.is_empty()
            && self.hide_screen_reader.is_none()
    }

    /// the effective login requirement
    pub fn login_status(&self) -> LoginStatus {
        self.login_status.unwrap_or(LoginStatus::None)
    }
}

/// look up a key, falling back to its first-schema spelling
fn lookup<'a>(
    obj: &'a Map<String, JsonValue>,
    key: &str,
    legacy: Option<&str>,
) -> Option<&'a JsonValue> {
    obj.get(key).or_else(|| legacy.and_then(|k| obj.get(k)))
}

fn bool_attr(obj: &Map<String, JsonValue>, key: &str, legacy: Option<&str>) -> Option<bool> {
    lookup(obj, key, legacy).and_then(JsonValue::as_bool)
}

fn str_attr<'a>(
    obj: &'a Map<String, JsonValue>,
    key: &str,
    legacy: Option<&str>,
) -> Option<&'a str> {
    lookup(obj, key, legacy).and_then(JsonValue::as_str)
}

fn flag_map(value: Option<&JsonValue>) -> FlagMap {
    value
        .and_then(JsonValue::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                .collect()
        })
        .unwrap_or_default()
}

fn post_targets(value: Option<&JsonValue>) -> PostTargets {
    value
        .and_then(JsonValue::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(post_type, ids)| {
                    ids.as_object()
                        .map(|_| (post_type.clone(), flag_map(Some(ids))))
                })
                .collect()
        })
        .unwrap_or_default()
}
