//! device classification from the request user agent

use std::fmt;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// the device class a block is rendered for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

lazy_static! {
    static ref TABLET_PATTERN: Regex = case_insensitive(
        r"ipad|tablet|kindle|silk/|playbook|xoom|nexus (7|9|10)\b|sm-t\d{3}|tab\d{1,2}"
    );
    static ref ANDROID_PATTERN: Regex = case_insensitive(r"android");
    static ref PHONE_PATTERN: Regex = case_insensitive(
        r"iphone|ipod|mobile|windows phone|iemobile|blackberry|bb10|opera mini|webos|palm|symbian|nokia"
    );
}

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid built-in device pattern {pattern:?}: {e}"))
}

impl DeviceClass {
    /// classify a user agent string
    ///
    /// android devices without the "Mobile" token are tablets; an empty
    /// user agent is treated as desktop.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.trim();
        if ua.is_empty() {
            return DeviceClass::Desktop;
        }

        if TABLET_PATTERN.is_match(ua) {
            return DeviceClass::Tablet;
        }

        let is_phone = PHONE_PATTERN.is_match(ua);
        if ANDROID_PATTERN.is_match(ua) {
            return if is_phone {
                DeviceClass::Mobile
            } else {
                DeviceClass::Tablet
            };
        }

        if is_phone {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// phones and tablets are both mobile devices
    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceClass::Mobile | DeviceClass::Tablet)
    }

    pub fn is_tablet(&self) -> bool {
        matches!(self, DeviceClass::Tablet)
    }

    /// neither a phone nor a tablet
    pub fn is_desktop(&self) -> bool {
        !self.is_mobile()
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Desktop => write!(f, "desktop"),
            DeviceClass::Mobile => write!(f, "mobile"),
            DeviceClass::Tablet => write!(f, "tablet"),
        }
    }
}
