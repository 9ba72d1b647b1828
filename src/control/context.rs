//! request-scoped context the rules are evaluated against

use chrono::{DateTime, Utc};

use super::tags::PageFlags;
use super::time::SiteTimezone;
use crate::device::DeviceClass;

/// the logged-in viewer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub id: u64,
    /// role keys, e.g. "administrator", "editor"
    pub roles: Vec<String>,
}

impl Viewer {
    pub fn new<I, S>(id: u64, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// the singular content being viewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPost {
    /// post type key, e.g. "post", "page", "product"
    pub post_type: String,
    pub id: u64,
}

impl CurrentPost {
    pub fn new(post_type: impl Into<String>, id: u64) -> Self {
        Self {
            post_type: post_type.into(),
            id,
        }
    }
}

/// context for evaluating visibility rules
///
/// built once per request by the host and shared by every block on the
/// page. nothing in here is mutated during evaluation.
#[derive(Debug, Clone)]
pub struct EvalContext<'a> {
    /// current wall-clock instant
    pub now: DateTime<Utc>,
    /// site timezone settings used to read naive dates
    pub timezone: &'a SiteTimezone,
    /// device class of the requesting client
    pub device: DeviceClass,
    /// `None` for logged-out viewers
    pub viewer: Option<&'a Viewer>,
    /// singular content being viewed, if any
    pub current_post: Option<&'a CurrentPost>,
    /// conditional tag state of the current page
    pub page: PageFlags,
}

impl<'a> EvalContext<'a> {
    /// create a context for a logged-out desktop viewer on a plain page
    pub fn new(now: DateTime<Utc>, timezone: &'a SiteTimezone) -> Self {
        Self {
            now,
            timezone,
            device: DeviceClass::Desktop,
            viewer: None,
            current_post: None,
            page: PageFlags::default(),
        }
    }

    /// set the device class
    pub fn with_device(mut self, device: DeviceClass) -> Self {
        self.device = device;
        self
    }

    /// set the viewer (`None` = logged out)
    pub fn with_viewer(mut self, viewer: Option<&'a Viewer>) -> Self {
        self.viewer = viewer;
        self
    }

    /// set the current singular content
    pub fn with_current_post(mut self, post: Option<&'a CurrentPost>) -> Self {
        self.current_post = post;
        self
    }

    /// set the page flags
    pub fn with_page(mut self, page: PageFlags) -> Self {
        self.page = page;
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.viewer.is_some()
    }
}
