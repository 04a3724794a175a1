//! Sequential action-chain execution with short-circuit semantics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::actions::{ActionEnv, ActionOutcome, ActionRegistry};
use crate::config::ActionItem;
use crate::core::context::RunContext;
use crate::error::ChainError;

/// Mutable state shared across chain invocations of one widget instance.
///
/// The confirmation flag is the only inter-invocation mutual-exclusion
/// device: a chain started while another chain's confirmation dialog is open
/// stops instead of prompting a second time.
#[derive(Debug, Default)]
pub struct ChainState {
    confirmation_open: AtomicBool,
}

impl ChainState {
    pub fn confirmation_open(&self) -> bool {
        self.confirmation_open.load(Ordering::SeqCst)
    }

    /// Mark a confirmation dialog open for as long as the guard lives.
    pub fn open_confirmation(self: &Arc<Self>) -> ConfirmationGuard {
        self.confirmation_open.store(true, Ordering::SeqCst);
        ConfirmationGuard {
            state: Arc::clone(self),
        }
    }
}

/// Clears the confirmation flag when dropped, so an aborted dialog can never
/// leave the flag stuck.
pub struct ConfirmationGuard {
    state: Arc<ChainState>,
}

impl Drop for ConfirmationGuard {
    fn drop(&mut self) {
        self.state.confirmation_open.store(false, Ordering::SeqCst);
    }
}

/// Where a chain invocation gets its action list from.
///
/// A `Producer` is re-invoked at every step boundary so that configuration
/// edits made mid-chain are honored; stepping is by original index either
/// way.
pub enum ActionSource {
    List(Vec<ActionItem>),
    Producer(Box<dyn Fn() -> Vec<ActionItem> + Send + Sync>),
}

impl ActionSource {
    fn item_at(&self, index: usize) -> Option<ActionItem> {
        match self {
            ActionSource::List(items) => items.get(index).cloned(),
            ActionSource::Producer(produce) => produce().get(index).cloned(),
        }
    }
}

impl From<Vec<ActionItem>> for ActionSource {
    fn from(items: Vec<ActionItem>) -> Self {
        ActionSource::List(items)
    }
}

/// Terminal result of a chain invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every step ran; navigation may follow.
    Completed,
    /// The chain broke early; navigation must not follow.
    Stopped,
}

impl ChainOutcome {
    pub fn is_completed(self) -> bool {
        self == ChainOutcome::Completed
    }
}

/// Runs ordered action lists strictly sequentially. Later steps routinely
/// depend on side effects of earlier ones, so there is no parallelism.
pub struct ChainRunner {
    registry: Arc<ActionRegistry>,
}

impl ChainRunner {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Run a chain to a terminal state.
    ///
    /// Disabled steps are pure continues. An unregistered kind is fatal.
    /// A step resolving to stop, or a confirmation dialog left open by a
    /// concurrent invocation, stops the chain without running further steps.
    pub async fn run(
        &self,
        source: &ActionSource,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ChainOutcome, ChainError> {
        if ctx.no_interaction {
            return Ok(ChainOutcome::Completed);
        }

        let mut index = 0;
        loop {
            if env.chain.confirmation_open() {
                debug!(index, "confirmation dialog open, stopping chain");
                return Ok(ChainOutcome::Stopped);
            }

            let Some(item) = source.item_at(index) else {
                return Ok(ChainOutcome::Completed);
            };

            if item.enabled {
                let executor = self
                    .registry
                    .get(item.action)
                    .ok_or(ChainError::ExecutorNotFound(item.action))?;

                debug!(index, kind = %item.action, "running action");
                let outcome = executor.execute(&item, ctx, env).await.map_err(|source| {
                    ChainError::ActionFailed {
                        index,
                        kind: item.action,
                        source,
                    }
                })?;

                if outcome.is_stop() {
                    debug!(index, kind = %item.action, "action stopped the chain");
                    return Ok(ChainOutcome::Stopped);
                }
            }

            index += 1;
        }
    }
}
