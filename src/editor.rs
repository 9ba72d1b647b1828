//! editor-side helpers
//!
//! the editor needs the available roles and posts to offer as choices, an
//! indicator whether a block has any control set, and the class names the
//! saved markup carries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::control::{BlockAttributes, LoginStatus};

/// a selectable post in the post targeting control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostChoice {
    pub id: u64,
    pub title: String,
}

/// data handed to the editor script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorStore {
    /// role key -> translated display label
    pub roles: BTreeMap<String, String>,
    /// post type -> posts of that type
    pub posts: BTreeMap<String, Vec<PostChoice>>,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles<I, K, V>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.roles
            .extend(roles.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn add_post(&mut self, post_type: impl Into<String>, id: u64, title: impl Into<String>) {
        self.posts.entry(post_type.into()).or_default().push(PostChoice {
            id,
            title: title.into(),
        });
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// whether any visibility control is set on the block
///
/// any `hideRoles` entry counts, since a role flagged `false` still hides
/// the block from every other logged-in role.
pub fn is_active(attrs: &BlockAttributes) -> bool {
    attrs.hide_desktop == Some(true)
        || attrs.hide_mobile == Some(true)
        || attrs.hide_tablet == Some(true)
        || attrs.login_status() != LoginStatus::None
        || attrs.hide_by_date == Some(true)
        || !attrs.hide_roles.is_empty()
        || attrs.hide_conditional_tags.values().any(|v| *v)
        || attrs
            .hide_posts
            .values()
            .any(|targets| targets.values().any(|v| *v))
        || attrs.hide_screen_reader == Some(true)
}

/// class names added to the saved block markup
pub fn class_names(attrs: &BlockAttributes) -> Vec<&'static str> {
    let mut classes = Vec::new();

    if attrs.hide_desktop == Some(true) {
        classes.push("block-control-hide-desktop");
    }
    if attrs.hide_mobile == Some(true) {
        classes.push("block-control-hide-mobile");
    }
    if attrs.hide_tablet == Some(true) {
        classes.push("block-control-hide-tablet");
    }

    match attrs.login_status() {
        LoginStatus::LoggedIn => classes.push("block-control-hide-logged-out"),
        LoginStatus::LoggedOut => classes.push("block-control-hide-logged-in"),
        LoginStatus::None => {}
    }

    classes
}

/// append the control classes to an existing class attribute value
pub fn merge_class_names(existing: Option<&str>, attrs: &BlockAttributes) -> Option<String> {
    let mut all: Vec<&str> = existing
        .map(|s| s.split_whitespace().collect())
        .unwrap_or_default();
    all.extend(class_names(attrs));

    if all.is_empty() {
        None
    } else {
        Some(all.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_json() {
        let mut store = EditorStore::new().with_roles([
            ("administrator", "Administrator"),
            ("editor", "Editor"),
        ]);
        store.add_post("post", 42, "Hello world");
        store.add_post("post", 43, "Second post");
        store.add_post("page", 2, "Sample Page");

        let json: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        assert_eq!(json["roles"]["editor"], "Editor");
        assert_eq!(json["posts"]["post"].as_array().unwrap().len(), 2);
        assert_eq!(json["posts"]["page"][0]["id"], 2);
        assert_eq!(json["posts"]["page"][0]["title"], "Sample Page");
    }

    #[test]
    fn test_is_active() {
        assert!(!is_active(&BlockAttributes::default()));

        let inactive = BlockAttributes::from_json(&json!({
            "hideDesktop": false,
            "loginStatus": "none",
            "hideRoles": {},
            "hidePosts": { "post": { "1": false } }
        }));
        assert!(!is_active(&inactive));

        for attrs in [
            json!({ "hideMobile": true }),
            json!({ "loginStatus": "logged-in" }),
            json!({ "hideByDate": true }),
            json!({ "hideRoles": { "editor": true } }),
            json!({ "hideRoles": { "subscriber": false } }),
            json!({ "hideConditionalTags": { "is_home": true } }),
            json!({ "hidePosts": { "page": { "all": true } } }),
            json!({ "hideScreenReader": true }),
        ] {
            assert!(
                is_active(&BlockAttributes::from_json(&attrs)),
                "expected active: {}",
                attrs
            );
        }
    }

    #[test]
    fn test_class_names() {
        let attrs = BlockAttributes::from_json(&json!({
            "hideDesktop": true,
            "hideTablet": true,
            "loginStatus": "logged-in"
        }));
        assert_eq!(
            class_names(&attrs),
            vec![
                "block-control-hide-desktop",
                "block-control-hide-tablet",
                "block-control-hide-logged-out"
            ]
        );

        let attrs = BlockAttributes::from_json(&json!({ "loginStatus": "logged-out" }));
        assert_eq!(class_names(&attrs), vec!["block-control-hide-logged-in"]);

        assert!(class_names(&BlockAttributes::default()).is_empty());
    }

    #[test]
    fn test_merge_class_names() {
        let attrs = BlockAttributes::from_json(&json!({ "hideMobile": true }));
        assert_eq!(
            merge_class_names(Some("is-style-wide  has-text "), &attrs).as_deref(),
            Some("is-style-wide has-text block-control-hide-mobile")
        );
        assert_eq!(
            merge_class_names(None, &attrs).as_deref(),
            Some("block-control-hide-mobile")
        );
        assert_eq!(merge_class_names(None, &BlockAttributes::default()), None);
    }
}
