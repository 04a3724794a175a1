//! Opaque collaborator traits for the hosting analytics platform.
//!
//! The engine never talks to the platform directly; everything goes through
//! [`AnalyticsSession`] and the handle types below, so the whole crate can be
//! exercised against in-memory fakes.

mod types;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use types::{
    ConnectionOptions, CubeDef, CubeRow, FieldValue, ListValue, SessionObjectData, SheetInfo,
    ValueListDef, ValueState,
};

/// Error reported by the wrapped platform session.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SessionError(pub String);

impl SessionError {
    pub fn new(message: impl Into<String>) -> Self {
        SessionError(message.into())
    }
}

/// Handle to a named field within a selection state.
///
/// The handle is returned synchronously by [`AnalyticsSession::field`] and may
/// point at a field that does not exist; [`FieldHandle::exists`] only reports
/// reliably after the session has had time to settle, which is why callers go
/// through the field resolver instead of checking directly.
#[async_trait]
pub trait FieldHandle: Send + Sync {
    fn name(&self) -> &str;
    fn exists(&self) -> bool;

    /// Replace the current selection with the given values.
    async fn select_values(&self, values: &[FieldValue]) -> Result<(), SessionError>;
    /// Toggle a single value in the current selection.
    async fn toggle_select(&self, value: &str) -> Result<(), SessionError>;
    async fn clear(&self) -> Result<(), SessionError>;
    /// Clear selections in every field but this one.
    async fn clear_other(&self) -> Result<(), SessionError>;
    async fn lock(&self) -> Result<(), SessionError>;
    async fn unlock(&self) -> Result<(), SessionError>;
    async fn select_all(&self) -> Result<(), SessionError>;
    async fn select_possible(&self) -> Result<(), SessionError>;
    async fn select_alternative(&self) -> Result<(), SessionError>;
    async fn select_excluded(&self) -> Result<(), SessionError>;
}

/// The live analytical session the engine runs actions against.
#[async_trait]
pub trait AnalyticsSession: Send + Sync {
    /// Look up a field by name within a selection state. Always returns a
    /// handle; existence is only knowable after a settling delay.
    fn field(&self, name: &str, state: &str) -> Arc<dyn FieldHandle>;

    async fn clear_all(&self, state: &str) -> Result<(), SessionError>;
    async fn back(&self) -> Result<(), SessionError>;
    async fn forward(&self) -> Result<(), SessionError>;
    async fn lock_all(&self, state: &str) -> Result<(), SessionError>;
    async fn unlock_all(&self, state: &str) -> Result<(), SessionError>;
    async fn apply_bookmark(&self, bookmark: &str) -> Result<(), SessionError>;
    async fn apply_theme(&self, theme: &str) -> Result<(), SessionError>;

    async fn set_string_variable(&self, name: &str, value: &str) -> Result<(), SessionError>;
    async fn set_numeric_variable(&self, name: &str, value: f64) -> Result<(), SessionError>;

    /// Create a transient value-list object and fetch its single data page.
    /// The caller owns disposal via [`AnalyticsSession::destroy_session_object`].
    async fn create_value_list(
        &self,
        def: &ValueListDef,
    ) -> Result<SessionObjectData<Vec<ListValue>>, SessionError>;

    /// Create a transient two-column cube and fetch its single data page.
    async fn create_cube(
        &self,
        def: &CubeDef,
    ) -> Result<SessionObjectData<Vec<CubeRow>>, SessionError>;

    async fn destroy_session_object(&self, object_id: &str) -> Result<(), SessionError>;

    /// Run a reload of the app. Resolves `true` on success, `false` on
    /// failure or cancellation.
    async fn do_reload(&self, partial: bool) -> Result<bool, SessionError>;
    async fn cancel_reload(&self);
    async fn do_save(&self) -> Result<(), SessionError>;

    async fn sheets(&self) -> Result<Vec<SheetInfo>, SessionError>;

    fn connection(&self) -> ConnectionOptions;
}

/// The hosting surface's navigation primitives.
pub trait NavigationSurface: Send + Sync {
    fn goto_sheet(&self, sheet: &str);
    fn next_sheet(&self);
    fn prev_sheet(&self);
    fn goto_story(&self, story: &str);
    fn open_url(&self, url: &str, new_tab: bool);
    fn can_edit(&self) -> bool;
    fn enter_edit_mode(&self);
}

/// Label lookup pass-through. Implementations may defer to the platform's
/// translation catalog; the default falls back to a small built-in table.
pub trait Translator: Send + Sync {
    fn get(&self, key: &str) -> String;
}

/// Built-in English labels for the keys the engine needs.
#[derive(Debug, Default)]
pub struct DefaultTranslator;

impl Translator for DefaultTranslator {
    fn get(&self, key: &str) -> String {
        match key {
            "Common.OK" => "OK".to_string(),
            "Common.Cancel" => "Cancel".to_string(),
            "Common.Close" => "Close".to_string(),
            other => other.to_string(),
        }
    }
}

/// Receives a downloaded reload-task script log.
pub trait ScriptLogSink: Send + Sync {
    fn save(&self, filename: &str, content: &str);
}

/// Discards script logs. Hosts that offer downloads supply their own sink.
#[derive(Debug, Default)]
pub struct NoopLogSink;

impl ScriptLogSink for NoopLogSink {
    fn save(&self, _filename: &str, _content: &str) {}
}
