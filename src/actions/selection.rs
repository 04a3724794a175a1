//! Field selection actions.

use async_trait::async_trait;

use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::config::{ActionItem, ActionKind};
use crate::core::context::RunContext;
use crate::error::ActionError;
use crate::session::FieldValue;

/// Parse a configured value expression into selectable values: split on `;`,
/// numeric-looking entries select by number, the rest by text.
pub(crate) fn parse_values(value: &str) -> Vec<FieldValue> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .split(';')
        .map(|part| match part.trim().parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) => FieldValue::Text(part.to_string()),
        })
        .collect()
}

/// Resolve a field and apply the given values, replacing the selection or
/// toggling the first value. Shared by the selection, adjacent and pareto
/// executors.
pub(crate) async fn apply_selection_values(
    env: &ActionEnv,
    field: &str,
    state: &str,
    values: &[FieldValue],
    toggle: bool,
) -> Result<ActionOutcome, ActionError> {
    let Some(handle) = env.resolver.resolve(env.session.as_ref(), field, state).await else {
        return Ok(ActionOutcome::Stop);
    };

    if toggle {
        let first = values.first().map(FieldValue::as_text).unwrap_or_default();
        handle.toggle_select(&first).await?;
    } else {
        handle.select_values(values).await?;
    }
    Ok(ActionOutcome::Continue)
}

pub struct ApplyBookmarkExecutor;

#[async_trait]
impl ActionExecutor for ApplyBookmarkExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if !item.bookmark.is_empty() {
            env.session.apply_bookmark(&item.bookmark).await?;
        }
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ApplyBookmark
    }
}

pub struct ApplySelectionExecutor;

#[async_trait]
impl ActionExecutor for ApplySelectionExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if ctx.no_selections || item.field.is_empty() {
            return Ok(ActionOutcome::Continue);
        }
        let state = ctx.state_for(&item.state);
        let values = parse_values(&item.value);
        apply_selection_values(env, &item.field, &state, &values, item.either_or).await
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ApplySelection
    }
}

/// Clears one field, other fields, or every selection when no field is named.
pub struct ClearSelectionExecutor;

#[async_trait]
impl ActionExecutor for ClearSelectionExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if ctx.no_selections {
            return Ok(ActionOutcome::Continue);
        }
        let state = ctx.state_for(&item.state);

        if item.field.is_empty() {
            env.session.clear_all(&state).await?;
            return Ok(ActionOutcome::Continue);
        }

        let Some(handle) = env
            .resolver
            .resolve(env.session.as_ref(), &item.field, &state)
            .await
        else {
            return Ok(ActionOutcome::Stop);
        };
        if item.either_or {
            handle.clear_other().await?;
        } else {
            handle.clear().await?;
        }
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ClearSelection
    }
}

pub struct BackOrForwardExecutor;

#[async_trait]
impl ActionExecutor for BackOrForwardExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if item.either_or {
            env.session.forward().await?;
        } else {
            env.session.back().await?;
        }
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::BackOrForward
    }
}

/// Locks or unlocks one field, or every field when none is named.
pub struct LockFieldExecutor;

#[async_trait]
impl ActionExecutor for LockFieldExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if ctx.no_selections {
            return Ok(ActionOutcome::Continue);
        }
        let state = ctx.state_for(&item.state);

        if item.field.is_empty() {
            if item.either_or {
                env.session.unlock_all(&state).await?;
            } else {
                env.session.lock_all(&state).await?;
            }
            return Ok(ActionOutcome::Continue);
        }

        let Some(handle) = env
            .resolver
            .resolve(env.session.as_ref(), &item.field, &state)
            .await
        else {
            return Ok(ActionOutcome::Stop);
        };
        if item.either_or {
            handle.unlock().await?;
        } else {
            handle.lock().await?;
        }
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::LockField
    }
}

#[derive(Debug, Clone, Copy)]
enum SelectVerb {
    All,
    Possible,
    Alternative,
    Excluded,
}

/// Whole-group selection actions (all/possible/alternative/excluded) share
/// one executor shape; only the field verb differs.
pub struct SelectVerbExecutor {
    verb: SelectVerb,
}

impl SelectVerbExecutor {
    pub fn all() -> Self {
        Self {
            verb: SelectVerb::All,
        }
    }

    pub fn possible() -> Self {
        Self {
            verb: SelectVerb::Possible,
        }
    }

    pub fn alternative() -> Self {
        Self {
            verb: SelectVerb::Alternative,
        }
    }

    pub fn excluded() -> Self {
        Self {
            verb: SelectVerb::Excluded,
        }
    }
}

#[async_trait]
impl ActionExecutor for SelectVerbExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if ctx.no_selections || item.field.is_empty() {
            return Ok(ActionOutcome::Continue);
        }
        let state = ctx.state_for(&item.state);

        let Some(handle) = env
            .resolver
            .resolve(env.session.as_ref(), &item.field, &state)
            .await
        else {
            return Ok(ActionOutcome::Stop);
        };
        match self.verb {
            SelectVerb::All => handle.select_all().await?,
            SelectVerb::Possible => handle.select_possible().await?,
            SelectVerb::Alternative => handle.select_alternative().await?,
            SelectVerb::Excluded => handle.select_excluded().await?,
        }
        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        match self.verb {
            SelectVerb::All => ActionKind::SelectAll,
            SelectVerb::Possible => ActionKind::SelectPossible,
            SelectVerb::Alternative => ActionKind::SelectAlternative,
            SelectVerb::Excluded => ActionKind::SelectExcluded,
        }
    }
}
