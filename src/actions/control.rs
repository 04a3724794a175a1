//! Control-flow and miscellaneous actions.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::config::{loose_bool, parse_int_prefix, ActionItem, ActionKind};
use crate::core::context::RunContext;
use crate::core::dialog::DialogOptions;
use crate::error::ActionError;

const DEFAULT_DELAY_MILLIS: i64 = 1000;

pub struct ApplyThemeExecutor;

#[async_trait]
impl ActionExecutor for ApplyThemeExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if !item.theme.is_empty() {
            env.session.apply_theme(&item.theme).await?;
        }
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ApplyTheme
    }
}

/// Pauses the chain for a configured number of milliseconds.
pub struct DelayExecutionExecutor;

#[async_trait]
impl ActionExecutor for DelayExecutionExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        _env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        let millis = parse_int_prefix(&item.value)
            .unwrap_or(DEFAULT_DELAY_MILLIS)
            .max(0) as u64;
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::DelayExecution
    }
}

/// Interprets its value expression as a loose boolean and stops the chain on
/// a falsy result.
pub struct ContinueOrTerminateExecutor;

#[async_trait]
impl ActionExecutor for ContinueOrTerminateExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        _env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        Ok(ActionOutcome::from_flag(loose_bool(&item.value)))
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ContinueOrTerminate
    }
}

pub struct LogToConsoleExecutor;

#[async_trait]
impl ActionExecutor for LogToConsoleExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        _env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        info!(value = %item.value, "action log");
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::LogToConsole
    }
}

/// Shows a modal confirmation; cancelling short-circuits the chain.
///
/// While the dialog is open the shared confirmation flag is set, so a chain
/// invocation racing this one stops instead of prompting a second time.
pub struct RequestConfirmationExecutor;

#[async_trait]
impl ActionExecutor for RequestConfirmationExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        let message = if !item.modal_content.is_empty() {
            item.modal_content.clone()
        } else if item.modal_title.is_empty() {
            "Are you sure?".to_string()
        } else {
            String::new()
        };

        let options = DialogOptions {
            title: item.modal_title.clone(),
            message,
            ok_label: Some(env.label_or(&item.modal_ok_label, "Common.OK")),
            cancel_label: (!item.modal_cancel_label.is_empty())
                .then(|| item.modal_cancel_label.clone()),
            hide_cancel_button: item.modal_cancel_label.is_empty(),
            ..Default::default()
        };

        let _guard = env.chain.open_confirmation();
        let confirmed = env.dialogs.confirm(options).await;
        Ok(ActionOutcome::from_flag(confirmed))
    }

    fn kind(&self) -> ActionKind {
        ActionKind::RequestConfirmation
    }
}
