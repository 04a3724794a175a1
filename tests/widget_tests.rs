//! Widget-level behavior: activation flow, dynamic button sets and
//! lifecycle.

mod support;

use std::sync::Arc;

use actionchain::{parse_props, RunContext};
use serde_json::json;
use support::{Harness, MockSession};

#[tokio::test]
async fn activate_runs_chain_then_navigation() {
    let h = Harness::new(MockSession::new());
    let props = parse_props(&json!({
        "buttons": [{
            "label": "Go",
            "actions": [{ "action": "setVariable", "variable": "vX", "value": "1" }],
            "navigation": { "enabled": true, "action": "goToNextSheet" }
        }]
    }))
    .unwrap();

    h.widget.activate(&props.buttons[0], &RunContext::default()).await;

    assert_eq!(h.session.numeric_var("vX"), Some(1.0));
    assert_eq!(h.surface.calls(), vec!["next_sheet".to_string()]);
}

#[tokio::test]
async fn activate_skips_navigation_after_a_stop() {
    let h = Harness::new(MockSession::new());
    let props = parse_props(&json!({
        "buttons": [{
            "label": "Go",
            "actions": [{ "action": "continueOrTerminate", "value": "0" }],
            "navigation": { "enabled": true, "action": "goToNextSheet" }
        }]
    }))
    .unwrap();

    h.widget.activate(&props.buttons[0], &RunContext::default()).await;

    assert!(h.surface.calls().is_empty());
}

#[tokio::test]
async fn activate_is_inert_in_edit_mode() {
    let h = Harness::new(MockSession::new());
    let props = parse_props(&json!({
        "buttons": [{
            "actions": [{ "action": "setVariable", "variable": "vX", "value": "1" }]
        }]
    }))
    .unwrap();
    let ctx = RunContext {
        no_interaction: true,
        ..Default::default()
    };

    h.widget.activate(&props.buttons[0], &ctx).await;

    assert!(h.session.calls().is_empty());
}

#[tokio::test]
async fn activate_logs_chain_errors_without_panicking() {
    // vForbidden writes fail in the mock session; activation absorbs the
    // error.
    let h = Harness::new(MockSession::new());
    let props = parse_props(&json!({
        "buttons": [{
            "actions": [
                { "action": "setVariable", "variable": "vForbidden", "value": "x" }
            ],
            "navigation": { "enabled": true, "action": "goToNextSheet" }
        }]
    }))
    .unwrap();

    h.widget.activate(&props.buttons[0], &RunContext::default()).await;

    // Navigation is skipped when the chain rejected.
    assert!(h.surface.calls().is_empty());
}

#[tokio::test]
async fn dynamic_buttons_are_cached_per_rule_and_cleared_on_destroy() {
    let h = Harness::new(MockSession::new());
    let props = parse_props(&json!({
        "buttonSet": {
            "dynamic": true,
            "rule": "North~N|South~S",
            "limit": true,
            "definition": [{
                "label": "$1",
                "actions": [{ "action": "applySelection", "field": "Region", "value": "$2" }]
            }]
        }
    }))
    .unwrap();

    let first = h.widget.dynamic_buttons(&props.button_set);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].label, "North");
    assert_eq!(first[0].actions[0].value, "N");
    assert_eq!(first[1].label, "South");
    assert!(!first[0].id.is_empty());
    assert_ne!(first[0].id, first[1].id);

    // Same rule and limit: the cached array instance comes back.
    let second = h.widget.dynamic_buttons(&props.button_set);
    assert!(Arc::ptr_eq(&first, &second));

    // Teardown clears the cache, so the next call re-materializes.
    h.widget.on_destroy();
    let third = h.widget.dynamic_buttons(&props.button_set);
    assert!(!Arc::ptr_eq(&first, &third));
}

#[tokio::test]
async fn dynamic_button_chain_runs_like_a_static_one() {
    let h = Harness::new(MockSession::new().with_field("Region"));
    let props = parse_props(&json!({
        "buttonSet": {
            "dynamic": true,
            "rule": "North~N",
            "limit": true,
            "definition": [{
                "label": "$1",
                "actions": [{ "action": "setVariable", "variable": "vPicked", "value": "$2" }]
            }]
        }
    }))
    .unwrap();

    let buttons = h.widget.dynamic_buttons(&props.button_set);
    h.widget.activate(&buttons[0], &RunContext::default()).await;

    assert_eq!(h.session.string_var("vPicked").as_deref(), Some("N"));
}
