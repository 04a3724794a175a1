//! Serde schema for the persisted widget configuration.
//!
//! The persisted form uses camelCase keys. Unknown action kinds are a
//! load-time error (the kind enum is closed); unknown navigation kinds are
//! tolerated and ignored at dispatch time, since navigation is best-effort.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ActionError;

/// All registered action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    ApplyBookmark,
    ApplySelection,
    ClearSelection,
    BackOrForward,
    LockField,
    SelectAdjacent,
    SelectAll,
    SelectPossible,
    SelectAlternative,
    SelectExcluded,
    SelectPareto,
    SetVariable,
    StartReload,
    StartReloadTask,
    ApplyTheme,
    CallRestApi,
    DelayExecution,
    ContinueOrTerminate,
    LogToConsole,
    RequestConfirmation,
}

impl ActionKind {
    /// The persisted tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::ApplyBookmark => "applyBookmark",
            ActionKind::ApplySelection => "applySelection",
            ActionKind::ClearSelection => "clearSelection",
            ActionKind::BackOrForward => "backOrForward",
            ActionKind::LockField => "lockField",
            ActionKind::SelectAdjacent => "selectAdjacent",
            ActionKind::SelectAll => "selectAll",
            ActionKind::SelectPossible => "selectPossible",
            ActionKind::SelectAlternative => "selectAlternative",
            ActionKind::SelectExcluded => "selectExcluded",
            ActionKind::SelectPareto => "selectPareto",
            ActionKind::SetVariable => "setVariable",
            ActionKind::StartReload => "startReload",
            ActionKind::StartReloadTask => "startReloadTask",
            ActionKind::ApplyTheme => "applyTheme",
            ActionKind::CallRestApi => "callRestApi",
            ActionKind::DelayExecution => "delayExecution",
            ActionKind::ContinueOrTerminate => "continueOrTerminate",
            ActionKind::LogToConsole => "logToConsole",
            ActionKind::RequestConfirmation => "requestConfirmation",
        }
    }

    /// The default display label for this kind.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::ApplyBookmark => "Apply Bookmark",
            ActionKind::ApplySelection => "Select Field Value",
            ActionKind::ClearSelection => "Clear Field Selection",
            ActionKind::BackOrForward => "Back or Forward",
            ActionKind::LockField => "Lock or Unlock Field",
            ActionKind::SelectAdjacent => "Select Adjacent Value",
            ActionKind::SelectAll => "Select All Values",
            ActionKind::SelectPossible => "Select Possible Values",
            ActionKind::SelectAlternative => "Select Alternative Values",
            ActionKind::SelectExcluded => "Select Excluded Values",
            ActionKind::SelectPareto => "Select Pareto Values",
            ActionKind::SetVariable => "Set Variable Value",
            ActionKind::StartReload => "Start Reload",
            ActionKind::StartReloadTask => "Start Reload Task",
            ActionKind::ApplyTheme => "Apply Theme",
            ActionKind::CallRestApi => "Call REST API",
            ActionKind::DelayExecution => "Delay Execution",
            ActionKind::ContinueOrTerminate => "Continue or Terminate",
            ActionKind::LogToConsole => "Log to Console",
            ActionKind::RequestConfirmation => "Request confirmation",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All known navigation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationKind {
    GoToSheet,
    GoToFirstSheet,
    GoToPrevSheet,
    GoToNextSheet,
    GoToLastSheet,
    GoToAppSheet,
    StartStory,
    #[serde(rename = "goToURI")]
    GoToUri,
    SwitchToEdit,
}

/// Accepts unknown navigation tags as `None` instead of failing the parse.
fn lenient_navigation_kind<'de, D>(deserializer: D) -> Result<Option<NavigationKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.and_then(|tag| serde_json::from_value(Value::String(tag)).ok()))
}

fn default_true() -> bool {
    true
}

fn default_sort_order() -> i32 {
    1
}

fn default_threshold() -> f64 {
    80.0
}

/// One configured action step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub action: ActionKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub variable: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub either_or: bool,
    #[serde(default)]
    pub bookmark: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub sort_expression: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_true")]
    pub include_threshold: bool,
    #[serde(default)]
    pub modal_title: String,
    #[serde(default)]
    pub modal_content: String,
    #[serde(default)]
    pub modal_ok_label: String,
    #[serde(default)]
    pub modal_cancel_label: String,
    #[serde(default)]
    pub task_skip_confirmation: bool,
    #[serde(default)]
    pub task_display_progress: TaskDisplayProgress,
    #[serde(default)]
    pub task_auto_resolve: bool,
    #[serde(default)]
    pub rest: Option<RestCallSettings>,
}

impl ActionItem {
    /// A bare item of the given kind with defaults for everything else.
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            enabled: true,
            field: String::new(),
            value: String::new(),
            variable: String::new(),
            state: String::new(),
            either_or: false,
            bookmark: String::new(),
            task: String::new(),
            theme: String::new(),
            sort_expression: String::new(),
            sort_order: default_sort_order(),
            threshold: default_threshold(),
            include_threshold: true,
            modal_title: String::new(),
            modal_content: String::new(),
            modal_ok_label: String::new(),
            modal_cancel_label: String::new(),
            task_skip_confirmation: false,
            task_display_progress: TaskDisplayProgress::Enforced,
            task_auto_resolve: false,
            rest: None,
        }
    }

    /// Sanitized display title, matching what hosting property panels show.
    pub fn title(&self) -> String {
        let title = match self.action {
            ActionKind::SelectAdjacent => {
                if self.either_or {
                    "Select Previous Value".to_string()
                } else {
                    "Select Next Value".to_string()
                }
            }
            ActionKind::ClearSelection => {
                if self.field.is_empty() {
                    "Clear All Selections".to_string()
                } else if self.either_or {
                    "Clear Other Fields".to_string()
                } else {
                    "Clear Field".to_string()
                }
            }
            ActionKind::BackOrForward => {
                if self.either_or {
                    "Forward".to_string()
                } else {
                    "Back".to_string()
                }
            }
            ActionKind::LockField => match (self.field.is_empty(), self.either_or) {
                (false, false) => "Lock Field".to_string(),
                (false, true) => "Unlock Field".to_string(),
                (true, false) => "Lock All Fields".to_string(),
                (true, true) => "Unlock All Fields".to_string(),
            },
            other => other.label().to_string(),
        };

        if self.enabled {
            title
        } else {
            format!("// {}", title)
        }
    }
}

/// How a reload-task progress dialog behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskDisplayProgress {
    /// Progress shown, dialog stays until the task finishes.
    #[default]
    #[serde(rename = "")]
    Enforced,
    /// Progress shown, but the dialog may be dismissed early.
    Optional,
    /// No progress display or polling; the dialog is informational only.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// Where a REST response value lands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestAssignment {
    pub variable: String,
    /// JSON Pointer into the response body; empty assigns the whole body.
    #[serde(default)]
    pub pointer: String,
}

/// Settings of a `callRestApi` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestCallSettings {
    #[serde(default)]
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
    /// Blank the target variables before the call runs.
    #[serde(default)]
    pub clear_variables: bool,
    #[serde(default)]
    pub assignments: Vec<RestAssignment>,
}

/// The optional navigation step of a button, evaluated only after its action
/// chain completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient_navigation_kind")]
    pub action: Option<NavigationKind>,
    #[serde(default)]
    pub sheet: String,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_true")]
    pub new_tab: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleType {
    #[default]
    Style,
    Color,
    ColorExpression,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaletteColor {
    #[serde(default)]
    pub color: String,
}

/// A single button definition, either user-authored or materialized from a
/// dynamic set rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub style_type: StyleType,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub color: Option<PaletteColor>,
    #[serde(default)]
    pub color_expression: String,
    /// Evaluated visibility expression result; loosely interpreted.
    #[serde(default)]
    pub visible: String,
    /// Evaluated enablement expression result; loosely interpreted.
    #[serde(default)]
    pub enabled: String,
    #[serde(default)]
    pub actions: Vec<ActionItem>,
    #[serde(default)]
    pub navigation: Option<NavigationItem>,
}

impl Button {
    pub fn is_visible(&self) -> bool {
        loose_bool(&self.visible)
    }

    pub fn is_enabled(&self) -> bool {
        loose_bool(&self.enabled)
    }
}

/// The dynamic button set configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSet {
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub rule: String,
    #[serde(default = "default_true")]
    pub limit: bool,
    /// The template the rule expands into; only the first entry is used.
    #[serde(default)]
    pub definition: Vec<Button>,
}

/// The full persisted widget configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetProps {
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub button_set: ButtonSet,
}

/// Parse persisted widget properties.
pub fn parse_props(value: &Value) -> Result<WidgetProps, ActionError> {
    serde_json::from_value(value.clone())
        .map_err(|e| ActionError::Config(format!("Invalid widget properties: {}", e)))
}

/// Loose boolean interpretation of an evaluated expression result: an empty
/// or unparsable string counts as true, otherwise the leading integer decides.
pub fn loose_bool(value: &str) -> bool {
    match parse_int_prefix(value) {
        Some(n) => n != 0,
        None => true,
    }
}

/// Parse the leading integer of a string the way a browser would: optional
/// sign, then digits, ignoring any trailing garbage. `None` when there are no
/// leading digits at all.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  -7 days"), Some(-7));
        assert_eq!(parse_int_prefix("+3"), Some(3));
        assert_eq!(parse_int_prefix("12.9"), Some(12));
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn test_loose_bool() {
        assert!(loose_bool(""));
        assert!(loose_bool("yes"));
        assert!(loose_bool("1"));
        assert!(loose_bool("-1"));
        assert!(!loose_bool("0"));
        assert!(!loose_bool("0.9"));
    }

    #[test]
    fn test_action_kind_round_trip() {
        for kind in [
            ActionKind::ApplySelection,
            ActionKind::SelectPareto,
            ActionKind::CallRestApi,
            ActionKind::ContinueOrTerminate,
        ] {
            let tag = serde_json::to_value(kind).unwrap();
            assert_eq!(tag, json!(kind.as_str()));
            let back: ActionKind = serde_json::from_value(tag).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_unknown_action_kind_fails_at_parse() {
        let result: Result<ActionItem, _> =
            serde_json::from_value(json!({ "action": "doesNotExist" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_navigation_kind_is_tolerated() {
        let nav: NavigationItem = serde_json::from_value(json!({
            "enabled": true,
            "action": "doesNotExist"
        }))
        .unwrap();
        assert!(nav.enabled);
        assert_eq!(nav.action, None);

        let nav: NavigationItem = serde_json::from_value(json!({
            "enabled": true,
            "action": "goToURI",
            "value": "https://example.com"
        }))
        .unwrap();
        assert_eq!(nav.action, Some(NavigationKind::GoToUri));
    }

    #[test]
    fn test_action_item_defaults() {
        let item: ActionItem = serde_json::from_value(json!({
            "action": "applySelection",
            "field": "Region",
            "value": "Nordic"
        }))
        .unwrap();
        assert!(item.enabled);
        assert!(!item.either_or);
        assert_eq!(item.threshold, 80.0);
        assert!(item.include_threshold);
        assert_eq!(item.task_display_progress, TaskDisplayProgress::Enforced);
    }

    #[test]
    fn test_action_item_titles() {
        let mut item = ActionItem::new(ActionKind::ClearSelection);
        assert_eq!(item.title(), "Clear All Selections");
        item.field = "Region".into();
        assert_eq!(item.title(), "Clear Field");
        item.either_or = true;
        assert_eq!(item.title(), "Clear Other Fields");

        let mut item = ActionItem::new(ActionKind::LockField);
        item.either_or = true;
        assert_eq!(item.title(), "Unlock All Fields");

        let mut item = ActionItem::new(ActionKind::SelectAdjacent);
        assert_eq!(item.title(), "Select Next Value");
        item.enabled = false;
        assert_eq!(item.title(), "// Select Next Value");
    }

    #[test]
    fn test_button_loose_expressions() {
        let button: Button = serde_json::from_value(json!({
            "label": "Go",
            "visible": "",
            "enabled": "0"
        }))
        .unwrap();
        assert!(button.is_visible());
        assert!(!button.is_enabled());
    }

    #[test]
    fn test_parse_props() {
        let props = parse_props(&json!({
            "buttons": [{
                "label": "Clear",
                "actions": [{ "action": "clearSelection" }],
                "navigation": { "enabled": true, "action": "goToNextSheet" }
            }],
            "buttonSet": { "dynamic": true, "rule": "A|B", "limit": true }
        }))
        .unwrap();
        assert_eq!(props.buttons.len(), 1);
        assert!(props.button_set.dynamic);
        assert_eq!(props.button_set.rule, "A|B");
    }
}
