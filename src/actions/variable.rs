//! Variable mutation.

use async_trait::async_trait;

use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::config::{ActionItem, ActionKind};
use crate::core::context::RunContext;
use crate::error::ActionError;

/// Escape a string for the engine's string-literal rule: single quotes are
/// doubled.
pub(crate) fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "''")
}

/// Sets a variable to a numeric or string value. Numeric-looking values use
/// the numeric setter; everything else goes through the string setter with
/// quote escaping applied.
pub struct SetVariableExecutor;

#[async_trait]
impl ActionExecutor for SetVariableExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if item.variable.is_empty() {
            return Ok(ActionOutcome::Continue);
        }

        let result = match item.value.trim().parse::<f64>() {
            Ok(number) => env.session.set_numeric_variable(&item.variable, number).await,
            Err(_) => {
                env.session
                    .set_string_variable(&item.variable, &escape_single_quotes(&item.value))
                    .await
            }
        };

        result.map_err(|e| ActionError::VariableSet {
            variable: item.variable.clone(),
            message: e.to_string(),
        })?;

        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::SetVariable
    }
}
