use thiserror::Error;

use crate::session::SessionError;

/// Step-level errors raised by a single action executor.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Session error: {0}")]
    Session(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Variable '{variable}' could not be set: {message}")]
    VariableSet { variable: String, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ActionError {
    fn from(e: serde_json::Error) -> Self {
        ActionError::Serialization(e.to_string())
    }
}

impl From<SessionError> for ActionError {
    fn from(e: SessionError) -> Self {
        ActionError::Session(e.to_string())
    }
}

impl From<reqwest::Error> for ActionError {
    fn from(e: reqwest::Error) -> Self {
        ActionError::Http(e.to_string())
    }
}
