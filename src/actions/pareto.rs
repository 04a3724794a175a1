//! Pareto-share selection.

use async_trait::async_trait;

use super::selection::apply_selection_values;
use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::actions::adjacent::normalize_expression;
use crate::config::{ActionItem, ActionKind};
use crate::core::context::RunContext;
use crate::error::ActionError;
use crate::session::{CubeDef, CubeRow, FieldValue};

const CUBE_FETCH_ROWS: usize = 5_000;

/// Accumulate dimension values by descending measure until the running sum
/// reaches `threshold`. The crossing value itself is included only when the
/// sum strictly exceeds the threshold and inclusion is requested; a sum that
/// lands exactly on the threshold excludes it regardless. Null rows are
/// skipped without counting toward the sum.
fn pareto_selection(rows: &[CubeRow], threshold_pct: f64, include_threshold: bool) -> Vec<String> {
    let total: f64 = rows
        .iter()
        .filter(|r| !r.is_null)
        .filter_map(|r| r.measure)
        .sum();
    let threshold = total * (threshold_pct / 100.0);

    let mut sorted: Vec<&CubeRow> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        let a = a.measure.unwrap_or(f64::NEG_INFINITY);
        let b = b.measure.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    let mut added = 0.0;
    let mut selection = Vec::new();
    for row in sorted {
        if row.is_null {
            continue;
        }
        let Some(measure) = row.measure else {
            continue;
        };
        added += measure;
        if added >= threshold {
            if added > threshold && include_threshold {
                selection.push(row.text.clone());
            }
            break;
        }
        selection.push(row.text.clone());
    }
    selection
}

/// Selects the field values making up a leading share of a measure.
///
/// The cube is created when the action runs and destroyed right after its
/// single fetch, so no standing hypercube keeps updating in the background.
pub struct SelectParetoExecutor;

#[async_trait]
impl ActionExecutor for SelectParetoExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if ctx.no_selections || item.field.is_empty() || item.value.is_empty() {
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

        let def = CubeDef {
            field: item.field.clone(),
            measure: normalize_expression(&item.value),
            state: state.clone(),
            max_rows: CUBE_FETCH_ROWS,
        };

        let cube = env.session.create_cube(&def).await?;
        env.session.destroy_session_object(&cube.object_id).await?;

        let values: Vec<FieldValue> =
            pareto_selection(&cube.data, item.threshold, item.include_threshold)
                .into_iter()
                .map(FieldValue::Text)
                .collect();

        apply_selection_values(env, &item.field, &state, &values, false).await
    }

    fn kind(&self) -> ActionKind {
        ActionKind::SelectPareto
    }
}
