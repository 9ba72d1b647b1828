// library crate for block-control
// conditional visibility rules for rendered content blocks

pub mod config;
pub mod control;
pub mod device;
pub mod editor;

pub use control::{
    decide, evaluate, Block, BlockAttributes, BlockControl, CurrentPost, Decision, EvalContext,
    HideRule, PageFlags, SiteTimezone, Viewer,
};
pub use device::DeviceClass;
