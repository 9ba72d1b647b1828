//! visibility evaluator
//!
//! evaluates a block's attributes against the current request context. the
//! hide rules are independent predicates combined with OR: the first one
//! that fires suppresses the block. the screen-reader rule runs afterwards
//! and only annotates content that is still visible.

use std::fmt;

use super::a11y::hide_from_screen_readers;
use super::context::EvalContext;
use super::tags::ConditionalTag;
use super::time::HideWindow;
use super::types::{BlockAttributes, LoginStatus, ALL_POSTS};

/// the rule that suppressed a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideRule {
    Desktop,
    Mobile,
    Tablet,
    LoginStatus(LoginStatus),
    DateWindow,
    Roles,
    ConditionalTag(ConditionalTag),
    Post,
}

impl fmt::Display for HideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HideRule::Desktop => write!(f, "hideDesktop"),
            HideRule::Mobile => write!(f, "hideMobile"),
            HideRule::Tablet => write!(f, "hideTablet"),
            HideRule::LoginStatus(status) => write!(f, "loginStatus={}", status),
            HideRule::DateWindow => write!(f, "hideByDate"),
            HideRule::Roles => write!(f, "hideRoles"),
            HideRule::ConditionalTag(tag) => write!(f, "hideConditionalTags.{}", tag),
            HideRule::Post => write!(f, "hidePosts"),
        }
    }
}

/// outcome of evaluating one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decision {
    /// the rule that hid the block, if any
    pub hidden_by: Option<HideRule>,
    /// visible content gets an `aria-hidden` marker
    pub screen_reader_hidden: bool,
}

impl Decision {
    /// render everything unchanged
    pub fn visible() -> Self {
        Self::default()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden_by.is_some()
    }

    /// produce the output for the given block content
    pub fn apply(&self, content: &str) -> String {
        if self.is_hidden() {
            String::new()
        } else if self.screen_reader_hidden {
            hide_from_screen_readers(content)
        } else {
            content.to_string()
        }
    }
}

/// decide how a block should be rendered
pub fn decide(attrs: &BlockAttributes, ctx: &EvalContext) -> Decision {
    if attrs.is_empty() {
        return Decision::visible();
    }

    let hidden_by = first_hide_rule(attrs, ctx);
    if let Some(rule) = hidden_by {
        tracing::debug!(rule = %rule, "block hidden");
    }

    Decision {
        hidden_by,
        screen_reader_hidden: hidden_by.is_none() && attrs.hide_screen_reader == Some(true),
    }
}

/// evaluate a block and return the content to output
///
/// returns an empty string when any hide rule fires, otherwise the content,
/// annotated for screen readers when requested.
pub fn evaluate(attrs: &BlockAttributes, ctx: &EvalContext, content: &str) -> String {
    decide(attrs, ctx).apply(content)
}

fn first_hide_rule(attrs: &BlockAttributes, ctx: &EvalContext) -> Option<HideRule> {
    if let Some(rule) = device_rule(attrs, ctx) {
        return Some(rule);
    }
    if let Some(rule) = login_rule(attrs, ctx) {
        return Some(rule);
    }
    if hides_by_date(attrs, ctx) {
        return Some(HideRule::DateWindow);
    }
    if hides_by_role(attrs, ctx) {
        return Some(HideRule::Roles);
    }
    if let Some(tag) = matching_conditional_tag(attrs, ctx) {
        return Some(HideRule::ConditionalTag(tag));
    }
    if hides_by_post(attrs, ctx) {
        return Some(HideRule::Post);
    }
    None
}

// ============================================================================
// Device
// ============================================================================

fn device_rule(attrs: &BlockAttributes, ctx: &EvalContext) -> Option<HideRule> {
    let device = ctx.device;

    if attrs.hide_desktop == Some(true) && device.is_desktop() {
        return Some(HideRule::Desktop);
    }
    if attrs.hide_mobile == Some(true) && device.is_mobile() && !device.is_tablet() {
        return Some(HideRule::Mobile);
    }
    if attrs.hide_tablet == Some(true) && device.is_tablet() {
        return Some(HideRule::Tablet);
    }
    None
}

// ============================================================================
// Login
// ============================================================================

fn login_rule(attrs: &BlockAttributes, ctx: &EvalContext) -> Option<HideRule> {
    let status = attrs.login_status();
    let hidden = match status {
        LoginStatus::LoggedOut => ctx.is_logged_in(),
        LoginStatus::LoggedIn => !ctx.is_logged_in(),
        LoginStatus::None => false,
    };
    hidden.then_some(HideRule::LoginStatus(status))
}

// ============================================================================
// Date
// ============================================================================

fn hides_by_date(attrs: &BlockAttributes, ctx: &EvalContext) -> bool {
    if attrs.hide_by_date != Some(true) {
        return false;
    }

    let window = HideWindow::resolve(
        attrs.hide_by_date_start.as_deref(),
        attrs.hide_by_date_end.as_deref(),
        ctx.timezone,
    );

    match window {
        Ok(window) => window.contains(ctx.now),
        Err(e) => {
            // a broken date only disables the date rule for this block
            tracing::warn!(
                error = %e,
                start = ?attrs.hide_by_date_start,
                end = ?attrs.hide_by_date_end,
                "ignoring hide-by-date window"
            );
            false
        }
    }
}

// ============================================================================
// Roles
// ============================================================================

fn hides_by_role(attrs: &BlockAttributes, ctx: &EvalContext) -> bool {
    // logged-out viewers hold no role; the login rule covers them
    let viewer = match ctx.viewer {
        Some(viewer) => viewer,
        None => return false,
    };

    if attrs.hide_roles.is_empty() {
        return false;
    }

    // a held role explicitly flagged visible overrides every other entry
    !attrs
        .hide_roles
        .iter()
        .any(|(role, hidden)| !*hidden && viewer.has_role(role))
}

// ============================================================================
// Conditional Tags
// ============================================================================

fn matching_conditional_tag(attrs: &BlockAttributes, ctx: &EvalContext) -> Option<ConditionalTag> {
    attrs
        .hide_conditional_tags
        .iter()
        .filter(|(_, flagged)| **flagged)
        .find_map(|(key, _)| match ConditionalTag::from_key(key) {
            Some(tag) => tag.holds(&ctx.page).then_some(tag),
            None => {
                tracing::debug!(
                    key = %key,
                    suggestion = ?ConditionalTag::suggest(key),
                    "unknown conditional tag"
                );
                None
            }
        })
}

// ============================================================================
// Posts
// ============================================================================

fn hides_by_post(attrs: &BlockAttributes, ctx: &EvalContext) -> bool {
    let post = match ctx.current_post {
        Some(post) => post,
        None => return false,
    };

    let targets = match attrs.hide_posts.get(&post.post_type) {
        Some(targets) => targets,
        None => return false,
    };

    targets.get(ALL_POSTS) == Some(&true) || targets.get(&post.id.to_string()) == Some(&true)
}
