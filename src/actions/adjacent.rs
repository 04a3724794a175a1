//! Adjacent-value selection.

use async_trait::async_trait;

use super::selection::apply_selection_values;
use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::config::{ActionItem, ActionKind};
use crate::core::context::RunContext;
use crate::error::ActionError;
use crate::session::{FieldValue, ListValue, ValueListDef};

const LIST_FETCH_ROWS: usize = 10_000;

/// Prefix an expression with `=` unless it already starts with one.
pub(crate) fn normalize_expression(expr: &str) -> String {
    if expr.starts_with('=') {
        expr.to_string()
    } else {
        format!("={}", expr)
    }
}

/// Index of the value to select, stepping from the currently selected value
/// with wraparound. `previous` steps back from the first selected value,
/// otherwise forward from the last selected one.
fn adjacent_index(items: &[ListValue], previous: bool) -> Option<usize> {
    if items.is_empty() {
        return None;
    }

    let selected: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, v)| v.state.is_selected())
        .map(|(i, _)| i)
        .collect();

    let len = items.len() as i64;
    let index = if previous {
        selected.first().map(|&i| i as i64).unwrap_or(-1)
    } else {
        selected.last().map(|&i| i as i64).unwrap_or(-1)
    };

    let target = if previous {
        // Step back; the first (or no) selection wraps to the end.
        (if index <= 0 { len } else { index }) - 1
    } else {
        // Step forward; the last (or no) selection wraps to the start.
        (if index == len - 1 || index == -1 { -1 } else { index }) + 1
    };

    Some(target as usize)
}

/// Selects the value before or after the current selection in a field's
/// value list, skipping excluded values and honoring an optional custom sort.
pub struct SelectAdjacentExecutor;

#[async_trait]
impl ActionExecutor for SelectAdjacentExecutor {
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

        if env
            .resolver
            .resolve(env.session.as_ref(), &item.field, &state)
            .await
            .is_none()
        {
            return Ok(ActionOutcome::Stop);
        }

        let def = ValueListDef {
            field: item.field.clone(),
            state: state.clone(),
            sort_expression: (!item.sort_expression.is_empty())
                .then(|| normalize_expression(&item.sort_expression)),
            sort_order: item.sort_order,
            max_rows: LIST_FETCH_ROWS,
        };

        let list = env.session.create_value_list(&def).await?;
        env.session.destroy_session_object(&list.object_id).await?;

        let items: Vec<ListValue> = list
            .data
            .into_iter()
            .filter(|v| !v.state.is_excluded())
            .collect();

        let Some(target) = adjacent_index(&items, item.either_or) else {
            return Ok(ActionOutcome::Continue);
        };

        let value = FieldValue::from(&items[target]);
        apply_selection_values(env, &item.field, &state, &[value], false).await
    }

    fn kind(&self) -> ActionKind {
        ActionKind::SelectAdjacent
    }
}
