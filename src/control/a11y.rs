//! accessibility post-processing for rendered block content

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// class of the inline "screen reader text" format
pub const SCREEN_READER_TEXT_CLASS: &str = "block-control__screen-reader-text";

lazy_static! {
    /// an opening tag at the start of a line
    static ref LEADING_TAG: Regex = Regex::new(r"(?m)^([ \t]*)<([A-Za-z][A-Za-z0-9:-]*)([^>]*)>")
        .unwrap_or_else(|e| panic!("invalid leading tag pattern: {e}"));

    /// one attribute inside a tag, quoted values consumed whole
    static ref ATTRIBUTE: Regex =
        Regex::new(r#"([^\s"'=/>]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?"#)
            .unwrap_or_else(|e| panic!("invalid attribute pattern: {e}"));
}

/// mark every top-level element as hidden from assistive technology
///
/// block markup can have several roots, so each line starting with an
/// opening tag gets `aria-hidden="true"`. an existing `aria-hidden`
/// attribute is overwritten.
pub fn hide_from_screen_readers(content: &str) -> String {
    LEADING_TAG
        .replace_all(content, |caps: &Captures| {
            format!("{}<{}{}>", &caps[1], &caps[2], mark_hidden(&caps[3]))
        })
        .into_owned()
}

fn mark_hidden(attrs: &str) -> String {
    let existing = ATTRIBUTE
        .captures_iter(attrs)
        .filter(|c| c[1].eq_ignore_ascii_case("aria-hidden"))
        .find_map(|c| c.get(0).map(|m| m.range()));

    match existing {
        Some(range) => format!(
            "{}aria-hidden=\"true\"{}",
            &attrs[..range.start],
            &attrs[range.end..]
        ),
        None => format!(" aria-hidden=\"true\"{}", attrs),
    }
}

/// wrap inline text so it is visually hidden but still read out
pub fn screen_reader_text(text: &str) -> String {
    format!(
        "<span class=\"{}\">{}</span>",
        SCREEN_READER_TEXT_CLASS, text
    )
}
