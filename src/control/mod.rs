//! block visibility control
//!
//! decides per rendered block whether its content is output, suppressed,
//! or hidden from assistive technology only. hide rules:
//! - device: hideDesktop, hideMobile, hideTablet
//! - login: loginStatus
//! - date window: hideByDate, hideByDateStart, hideByDateEnd
//! - roles: hideRoles
//! - page type: hideConditionalTags
//! - specific content: hidePosts
//!
//! plus hideScreenReader, which annotates visible content with aria-hidden.

mod a11y;
mod context;
mod eval;
mod tags;
mod time;
mod types;

pub use a11y::{hide_from_screen_readers, screen_reader_text, SCREEN_READER_TEXT_CLASS};
pub use context::{CurrentPost, EvalContext, Viewer};
pub use eval::{decide, evaluate, Decision, HideRule};
pub use tags::{ConditionalTag, PageFlags};
pub use time::{parse_datetime, parse_offset, HideWindow, SiteTimezone, SiteZone, TimeError};
pub use types::{BlockAttributes, FlagMap, LoginStatus, PostTargets, ALL_POSTS};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::Settings;

/// a parsed block as handed over by the rendering pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// fully qualified block name, e.g. "core/paragraph"
    #[serde(rename = "blockName", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub attrs: JsonValue,
}

impl Block {
    pub fn new(name: impl Into<String>, attrs: JsonValue) -> Self {
        Self {
            name: Some(name.into()),
            attrs,
        }
    }

    fn has_attributes(&self) -> bool {
        match &self.attrs {
            JsonValue::Object(obj) => !obj.is_empty(),
            _ => false,
        }
    }
}

/// render filter applying the visibility rules to blocks
///
/// holds the site-level settings; everything request-specific comes in
/// through [`EvalContext`].
#[derive(Debug, Clone, Default)]
pub struct BlockControl {
    unsupported_blocks: Vec<String>,
}

impl BlockControl {
    pub fn new(settings: &Settings) -> Self {
        Self {
            unsupported_blocks: settings.unsupported_blocks.clone(),
        }
    }

    /// whether visibility rules apply to blocks of this type
    pub fn is_supported(&self, block_name: &str) -> bool {
        !self.unsupported_blocks.iter().any(|b| b == block_name)
    }

    /// decide how a block should be rendered
    pub fn decide(&self, block: &Block, ctx: &EvalContext) -> Decision {
        if let Some(name) = block.name.as_deref() {
            if !self.is_supported(name) {
                return Decision::visible();
            }
        }

        if !block.has_attributes() {
            return Decision::visible();
        }

        decide(&BlockAttributes::from_json(&block.attrs), ctx)
    }

    /// filter a rendered block's content
    pub fn render_block(&self, content: &str, block: &Block, ctx: &EvalContext) -> String {
        self.decide(block, ctx).apply(content)
    }
}
