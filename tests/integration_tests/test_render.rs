// integration tests for rendering blocks through the visibility rules

use block_control::control::{ConditionalTag, HideRule};
use block_control::{
    Block, BlockControl, CurrentPost, DeviceClass, EvalContext, PageFlags, SiteTimezone, Viewer,
};
use serde_json::json;

use crate::common::{at, paragraph};

const CONTENT: &str = "<p>Members only</p>";

fn render(block: &Block, ctx: &EvalContext) -> String {
    BlockControl::default().render_block(CONTENT, block, ctx)
}

#[test]
fn test_page_with_mixed_blocks() {
    let tz = SiteTimezone::default();
    let viewer = Viewer::new(10, ["subscriber"]);
    let ctx = EvalContext::new(at("2024-05-01T08:00:00Z"), &tz)
        .with_device(DeviceClass::from_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148",
        ))
        .with_viewer(Some(&viewer));

    let blocks = [
        paragraph(json!({})),
        paragraph(json!({ "hideMobile": true })),
        paragraph(json!({ "hideDesktop": true })),
        paragraph(json!({ "loginStatus": "logged-in" })),
        paragraph(json!({ "loginStatus": "logged-out" })),
        paragraph(json!({ "hideScreenReader": true })),
    ];

    let outputs: Vec<String> = blocks.iter().map(|b| render(b, &ctx)).collect();
    assert_eq!(
        outputs,
        vec![
            CONTENT.to_string(),
            String::new(),
            CONTENT.to_string(),
            CONTENT.to_string(),
            String::new(),
            "<p aria-hidden=\"true\">Members only</p>".to_string(),
        ]
    );
}

#[test]
fn test_broken_block_does_not_affect_siblings() {
    let tz = SiteTimezone::default();
    let ctx = EvalContext::new(at("2024-05-01T08:00:00Z"), &tz);

    let broken = paragraph(json!({
        "hideByDate": true,
        "hideByDateStart": "the day after tomorrow",
        "hideDesktop": "maybe"
    }));
    let sibling = paragraph(json!({ "hideByDate": true, "hideByDateStart": "2024-04-01" }));

    assert_eq!(render(&broken, &ctx), CONTENT);
    assert_eq!(render(&sibling, &ctx), "");
}

#[test]
fn test_legacy_schema_block() {
    let tz = SiteTimezone::default();
    let tablet = EvalContext::new(at("2024-05-01T08:00:00Z"), &tz).with_device(DeviceClass::Tablet);

    let block = paragraph(json!({ "hide_tablet": true, "hide_mobile": false }));
    assert_eq!(render(&block, &tablet), "");
}

#[test]
fn test_conditional_tags_and_posts() {
    let tz = SiteTimezone::default();
    let post = CurrentPost::new("post", 42);
    let ctx = EvalContext::new(at("2024-05-01T08:00:00Z"), &tz)
        .with_current_post(Some(&post))
        .with_page(PageFlags {
            single: true,
            ..Default::default()
        });

    let singular = paragraph(json!({ "hideConditionalTags": { "is_singular": true } }));
    let decision = BlockControl::default().decide(&singular, &ctx);
    assert_eq!(
        decision.hidden_by,
        Some(HideRule::ConditionalTag(ConditionalTag::Singular))
    );

    let on_post = paragraph(json!({ "hidePosts": { "post": { "42": true } } }));
    assert_eq!(render(&on_post, &ctx), "");

    let on_other_post = paragraph(json!({ "hidePosts": { "post": { "7": true } } }));
    assert_eq!(render(&on_other_post, &ctx), CONTENT);
}

#[test]
fn test_role_gating() {
    let tz = SiteTimezone::default();
    let editor = Viewer::new(2, ["editor"]);
    let logged_in = EvalContext::new(at("2024-05-01T08:00:00Z"), &tz).with_viewer(Some(&editor));
    let anonymous = EvalContext::new(at("2024-05-01T08:00:00Z"), &tz);

    let hidden_for_editors = paragraph(json!({ "hideRoles": { "editor": true } }));
    assert_eq!(render(&hidden_for_editors, &logged_in), "");
    assert_eq!(render(&hidden_for_editors, &anonymous), CONTENT);

    let visible_for_editors =
        paragraph(json!({ "hideRoles": { "editor": false, "subscriber": true } }));
    assert_eq!(render(&visible_for_editors, &logged_in), CONTENT);
}

#[test]
fn test_render_is_idempotent() {
    let tz = SiteTimezone::named("America/Chicago");
    let ctx = EvalContext::new(at("2024-11-03T06:30:00Z"), &tz);
    let block = paragraph(json!({
        "hideByDate": true,
        "hideByDateStart": "2024-11-03T01:30:00",
        "hideScreenReader": true
    }));

    let first = render(&block, &ctx);
    assert_eq!(render(&block, &ctx), first);
    // ambiguous 01:30 resolves to the earlier (CDT) instant, 06:30 UTC
    assert_eq!(first, "");
}
