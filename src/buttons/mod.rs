//! Dynamic button set materialization.
//!
//! A rule expression expands into concrete button definitions by splitting on
//! `|` (one segment per button) and `~` (positional parameters substituted
//! into the template's `$1..$n` placeholders). Results are memoized per
//! `(rule, limit)` key for the lifetime of the owning widget instance, and
//! the cached array is shared as-is so re-renders are reference-stable.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::config::{Button, StyleType};
use crate::core::context::IdGenerator;

/// Safety cap on the number of generated buttons. A runaway rule expression
/// would otherwise degrade the hosting page.
pub const BUTTON_LIMIT: usize = 100;

/// Structural cache key: value equality on rule and limit flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SetKey {
    rule: String,
    limited: bool,
}

/// Per-widget cache of materialized button sets.
#[derive(Default)]
pub struct ButtonSetCache {
    entries: Mutex<HashMap<SetKey, Arc<[Button]>>>,
}

impl ButtonSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `rule` into buttons, or return the cached expansion for the
    /// same `(rule, limited)` key.
    pub fn materialize(
        &self,
        rule: &str,
        limited: bool,
        template: &Button,
        ids: &dyn IdGenerator,
    ) -> Arc<[Button]> {
        let key = SetKey {
            rule: rule.to_string(),
            limited,
        };

        if let Some(cached) = self.entries.lock().get(&key) {
            return Arc::clone(cached);
        }

        let buttons: Arc<[Button]> = expand_rule(rule, limited, template, ids).into();
        debug!(rule, limited, count = buttons.len(), "materialized button set");
        self.entries
            .lock()
            .insert(key, Arc::clone(&buttons));
        buttons
    }

    /// Drop every entry. Called when the owning widget is torn down.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn expand_rule(rule: &str, limited: bool, template: &Button, ids: &dyn IdGenerator) -> Vec<Button> {
    let mut segments: Vec<&str> = rule.split('|').filter(|s| !s.is_empty()).collect();
    if limited {
        segments.truncate(BUTTON_LIMIT);
    }

    segments
        .into_iter()
        .map(|segment| {
            let params: Vec<&str> = segment.split('~').collect();
            let mut button = substitute_params(template, &params);
            button.id = ids.next_id();
            // Without an explicit color expression the plain outline style
            // applies.
            if button.color_expression.is_empty() {
                button.style_type = StyleType::Style;
            }
            button
        })
        .collect()
}

/// Substitute `$1..$n` tokens across every string field of the template.
/// Placeholders beyond the supplied parameters stay as literal text.
fn substitute_params(template: &Button, params: &[&str]) -> Button {
    let mut value = serde_json::to_value(template).unwrap_or(Value::Null);
    substitute_value(&mut value, params);
    serde_json::from_value(value).unwrap_or_else(|_| template.clone())
}

fn substitute_value(value: &mut Value, params: &[&str]) {
    match value {
        Value::String(text) => {
            // Highest index first, so `$1` never clobbers the prefix of `$10`.
            for (i, param) in params.iter().enumerate().rev() {
                let token = format!("${}", i + 1);
                if text.contains(&token) {
                    *text = text.replace(&token, param);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_value(item, params);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                substitute_value(item, params);
            }
        }
        _ => {}
    }
}
