//! Chain-level error types.

use thiserror::Error;

use super::ActionError;
use crate::config::ActionKind;

/// Errors that terminate an action chain as a whole.
///
/// Step-local "could not proceed now" states never surface here; they resolve
/// the step to a stop outcome instead. Only programming-level errors (an
/// unregistered action kind, malformed configuration, a failed variable
/// write) reject the chain promise.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Action executor not found for kind: {0}")]
    ExecutorNotFound(ActionKind),
    #[error("Action failed at step {index} ({kind}): {source}")]
    ActionFailed {
        index: usize,
        kind: ActionKind,
        #[source]
        source: ActionError,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ActionError> for ChainError {
    fn from(value: ActionError) -> Self {
        ChainError::InvalidConfig(value.to_string())
    }
}
