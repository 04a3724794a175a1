//! Load-time validation of widget configuration against the action registry.
//!
//! Catching an unconfigured action kind here turns what would be a run-time
//! chain failure into a configuration diagnostic.

use crate::actions::ActionRegistry;
use crate::config::WidgetProps;
use crate::error::ChainError;

/// Outcome of validating a widget configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Convert into a hard error when any issue was found.
    pub fn into_result(self) -> Result<(), ChainError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(ChainError::InvalidConfig(self.issues.join("; ")))
        }
    }
}

/// Check that every configured action resolves to a registered executor and
/// that the dynamic set is well formed.
pub fn validate_props(props: &WidgetProps, registry: &ActionRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();

    let buttons = props
        .buttons
        .iter()
        .chain(props.button_set.definition.iter());
    for (b, button) in buttons.enumerate() {
        for (i, item) in button.actions.iter().enumerate() {
            if registry.get(item.action).is_none() {
                report.issues.push(format!(
                    "button {}: action {} ({}) has no registered executor",
                    b, i, item.action
                ));
            }
        }
    }

    if props.button_set.dynamic {
        if props.button_set.rule.is_empty() {
            report
                .issues
                .push("dynamic button set has an empty rule".to_string());
        }
        if props.button_set.definition.is_empty() {
            report
                .issues
                .push("dynamic button set has no definition template".to_string());
        }
    }

    report
}
