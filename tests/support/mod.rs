//! Shared mock collaborators for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};

use actionchain::{
    create_default_registry, ActionRegistry, AnalyticsSession, ButtonsWidget, ConnectionOptions,
    CubeDef, CubeRow, DefaultTranslator, DialogOptions, DialogService, DialogUpdate, FakeIdGenerator,
    FieldHandle, FieldValue, HttpClientProvider, ListValue, NavigationSurface, ProgressDialog,
    RuntimeContext, ScriptLogSink, SessionError, SessionObjectData, SheetInfo, ValueListDef,
};

// ---------------------------------------------------------------------------
// Session mocks
// ---------------------------------------------------------------------------

pub struct MockField {
    name: String,
    exists: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockField {
    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl FieldHandle for MockField {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self) -> bool {
        self.exists
    }

    async fn select_values(&self, values: &[FieldValue]) -> Result<(), SessionError> {
        let rendered: Vec<String> = values.iter().map(FieldValue::as_text).collect();
        self.log(format!("{}.select_values([{}])", self.name, rendered.join(",")));
        Ok(())
    }

    async fn toggle_select(&self, value: &str) -> Result<(), SessionError> {
        self.log(format!("{}.toggle_select({})", self.name, value));
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.log(format!("{}.clear", self.name));
        Ok(())
    }

    async fn clear_other(&self) -> Result<(), SessionError> {
        self.log(format!("{}.clear_other", self.name));
        Ok(())
    }

    async fn lock(&self) -> Result<(), SessionError> {
        self.log(format!("{}.lock", self.name));
        Ok(())
    }

    async fn unlock(&self) -> Result<(), SessionError> {
        self.log(format!("{}.unlock", self.name));
        Ok(())
    }

    async fn select_all(&self) -> Result<(), SessionError> {
        self.log(format!("{}.select_all", self.name));
        Ok(())
    }

    async fn select_possible(&self) -> Result<(), SessionError> {
        self.log(format!("{}.select_possible", self.name));
        Ok(())
    }

    async fn select_alternative(&self) -> Result<(), SessionError> {
        self.log(format!("{}.select_alternative", self.name));
        Ok(())
    }

    async fn select_excluded(&self) -> Result<(), SessionError> {
        self.log(format!("{}.select_excluded", self.name));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSession {
    pub existing_fields: Mutex<HashSet<String>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub string_vars: Mutex<HashMap<String, String>>,
    pub numeric_vars: Mutex<HashMap<String, f64>>,
    pub list_values: Mutex<Vec<ListValue>>,
    pub cube_rows: Mutex<Vec<CubeRow>>,
    pub reload_result: Mutex<Option<bool>>,
    pub reload_delay: Mutex<Duration>,
    pub sheet_list: Mutex<Vec<SheetInfo>>,
    pub connection: ConnectionOptions,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(self, name: &str) -> Self {
        self.existing_fields.lock().insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn called(&self, needle: &str) -> bool {
        self.calls.lock().iter().any(|c| c.contains(needle))
    }

    pub fn string_var(&self, name: &str) -> Option<String> {
        self.string_vars.lock().get(name).cloned()
    }

    pub fn numeric_var(&self, name: &str) -> Option<f64> {
        self.numeric_vars.lock().get(name).copied()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl AnalyticsSession for MockSession {
    fn field(&self, name: &str, state: &str) -> Arc<dyn FieldHandle> {
        self.log(format!("field({},{})", name, state));
        Arc::new(MockField {
            name: name.to_string(),
            exists: self.existing_fields.lock().contains(name),
            calls: self.calls.clone(),
        })
    }

    async fn clear_all(&self, state: &str) -> Result<(), SessionError> {
        self.log(format!("clear_all({})", state));
        Ok(())
    }

    async fn back(&self) -> Result<(), SessionError> {
        self.log("back");
        Ok(())
    }

    async fn forward(&self) -> Result<(), SessionError> {
        self.log("forward");
        Ok(())
    }

    async fn lock_all(&self, state: &str) -> Result<(), SessionError> {
        self.log(format!("lock_all({})", state));
        Ok(())
    }

    async fn unlock_all(&self, state: &str) -> Result<(), SessionError> {
        self.log(format!("unlock_all({})", state));
        Ok(())
    }

    async fn apply_bookmark(&self, bookmark: &str) -> Result<(), SessionError> {
        self.log(format!("apply_bookmark({})", bookmark));
        Ok(())
    }

    async fn apply_theme(&self, theme: &str) -> Result<(), SessionError> {
        self.log(format!("apply_theme({})", theme));
        Ok(())
    }

    async fn set_string_variable(&self, name: &str, value: &str) -> Result<(), SessionError> {
        if name == "vForbidden" {
            return Err(SessionError::new("access denied"));
        }
        self.log(format!("set_string_variable({},{})", name, value));
        self.string_vars
            .lock()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn set_numeric_variable(&self, name: &str, value: f64) -> Result<(), SessionError> {
        self.log(format!("set_numeric_variable({},{})", name, value));
        self.numeric_vars.lock().insert(name.to_string(), value);
        Ok(())
    }

    async fn create_value_list(
        &self,
        def: &ValueListDef,
    ) -> Result<SessionObjectData<Vec<ListValue>>, SessionError> {
        self.log(format!(
            "create_value_list({},{},{:?})",
            def.field, def.state, def.sort_expression
        ));
        Ok(SessionObjectData {
            object_id: "list-1".to_string(),
            data: self.list_values.lock().clone(),
        })
    }

    async fn create_cube(
        &self,
        def: &CubeDef,
    ) -> Result<SessionObjectData<Vec<CubeRow>>, SessionError> {
        self.log(format!("create_cube({},{},{})", def.field, def.measure, def.state));
        Ok(SessionObjectData {
            object_id: "cube-1".to_string(),
            data: self.cube_rows.lock().clone(),
        })
    }

    async fn destroy_session_object(&self, object_id: &str) -> Result<(), SessionError> {
        self.log(format!("destroy_session_object({})", object_id));
        Ok(())
    }

    async fn do_reload(&self, partial: bool) -> Result<bool, SessionError> {
        self.log(format!("do_reload(partial={})", partial));
        let delay = *self.reload_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match *self.reload_result.lock() {
            Some(success) => Ok(success),
            None => Err(SessionError::new("no reload scripted")),
        }
    }

    async fn cancel_reload(&self) {
        self.log("cancel_reload");
    }

    async fn do_save(&self) -> Result<(), SessionError> {
        self.log("do_save");
        Ok(())
    }

    async fn sheets(&self) -> Result<Vec<SheetInfo>, SessionError> {
        Ok(self.sheet_list.lock().clone())
    }

    fn connection(&self) -> ConnectionOptions {
        self.connection.clone()
    }
}

// ---------------------------------------------------------------------------
// Dialog mocks
// ---------------------------------------------------------------------------

pub struct MockProgressState {
    pub options: DialogOptions,
    pub updates: Mutex<Vec<DialogUpdate>>,
    closed_tx: watch::Sender<Option<bool>>,
    auto_close_on_terminal: Option<bool>,
}

impl MockProgressState {
    /// All title updates this dialog received, in order.
    pub fn titles(&self) -> Vec<String> {
        self.updates
            .lock()
            .iter()
            .filter_map(|u| u.title.clone())
            .collect()
    }
}

pub struct MockProgressDialog {
    state: Arc<MockProgressState>,
    closed_rx: watch::Receiver<Option<bool>>,
}

#[async_trait]
impl ProgressDialog for MockProgressDialog {
    fn update(&self, update: DialogUpdate) {
        // A terminal update re-enables the OK button; the scripted "user"
        // reacts to it by closing the dialog.
        let terminal = update.hide_ok_button == Some(false);
        self.state.updates.lock().push(update);
        if terminal {
            if let Some(result) = self.state.auto_close_on_terminal {
                self.close(result);
            }
        }
    }

    fn close(&self, result: bool) {
        self.state.closed_tx.send_replace(Some(result));
    }

    async fn wait_closed(&self) -> bool {
        let mut rx = self.closed_rx.clone();
        loop {
            if let Some(result) = *rx.borrow() {
                return result;
            }
            if rx.changed().await.is_err() {
                return false;
            }
        }
    }
}

#[derive(Default)]
pub struct MockDialogs {
    /// Scripted confirm results, consumed front to back; missing entries
    /// default to `true`.
    pub confirm_results: Mutex<VecDeque<bool>>,
    /// When set, confirms block until released via `resolve_next_confirm`.
    pub manual_confirm: AtomicBool,
    pending: Mutex<VecDeque<oneshot::Sender<bool>>>,
    /// Titles of every dialog that was opened.
    pub opened: Mutex<Vec<String>>,
    /// Scripted result a progress dialog closes itself with immediately.
    pub progress_close_immediately: Mutex<Option<bool>>,
    /// Scripted result the "user" closes a progress dialog with once it
    /// shows a terminal update.
    pub progress_close_on_terminal: Mutex<Option<bool>>,
    /// State handles of every opened progress dialog.
    pub progress: Mutex<Vec<Arc<MockProgressState>>>,
}

impl MockDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_confirm(&self, result: bool) {
        self.confirm_results.lock().push_back(result);
    }

    pub fn opened_titles(&self) -> Vec<String> {
        self.opened.lock().clone()
    }

    pub fn pending_confirms(&self) -> usize {
        self.pending.lock().len()
    }

    /// Release the oldest blocked confirm with the given result.
    pub fn resolve_next_confirm(&self, result: bool) {
        if let Some(tx) = self.pending.lock().pop_front() {
            let _ = tx.send(result);
        }
    }
}

#[async_trait]
impl DialogService for MockDialogs {
    async fn confirm(&self, options: DialogOptions) -> bool {
        self.opened.lock().push(options.title.clone());
        if self.manual_confirm.load(Ordering::SeqCst) {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().push_back(tx);
            rx.await.unwrap_or(true)
        } else {
            self.confirm_results.lock().pop_front().unwrap_or(true)
        }
    }

    fn open_progress(&self, options: DialogOptions) -> Box<dyn ProgressDialog> {
        self.opened.lock().push(options.title.clone());
        let (closed_tx, closed_rx) = watch::channel(None);
        let state = Arc::new(MockProgressState {
            options,
            updates: Mutex::new(Vec::new()),
            closed_tx,
            auto_close_on_terminal: *self.progress_close_on_terminal.lock(),
        });
        self.progress.lock().push(state.clone());
        let dialog = MockProgressDialog {
            state,
            closed_rx,
        };
        if let Some(result) = *self.progress_close_immediately.lock() {
            dialog.close(result);
        }
        Box::new(dialog)
    }
}

// ---------------------------------------------------------------------------
// Navigation surface mock
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockSurface {
    pub calls: Mutex<Vec<String>>,
    pub editable: AtomicBool,
}

impl MockSurface {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

impl NavigationSurface for MockSurface {
    fn goto_sheet(&self, sheet: &str) {
        self.log(format!("goto_sheet({})", sheet));
    }

    fn next_sheet(&self) {
        self.log("next_sheet");
    }

    fn prev_sheet(&self) {
        self.log("prev_sheet");
    }

    fn goto_story(&self, story: &str) {
        self.log(format!("goto_story({})", story));
    }

    fn open_url(&self, url: &str, new_tab: bool) {
        self.log(format!("open_url({},{})", url, new_tab));
    }

    fn can_edit(&self) -> bool {
        self.editable.load(Ordering::SeqCst)
    }

    fn enter_edit_mode(&self) {
        self.log("enter_edit_mode");
    }
}

#[derive(Default)]
pub struct MemoryLogSink {
    pub saved: Mutex<Vec<(String, String)>>,
}

impl ScriptLogSink for MemoryLogSink {
    fn save(&self, filename: &str, content: &str) {
        self.saved
            .lock()
            .push((filename.to_string(), content.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub session: Arc<MockSession>,
    pub dialogs: Arc<MockDialogs>,
    pub surface: Arc<MockSurface>,
    pub log_sink: Arc<MemoryLogSink>,
    pub widget: ButtonsWidget,
}

impl Harness {
    pub fn new(session: MockSession) -> Self {
        Self::with_registry(session, Arc::new(create_default_registry()))
    }

    pub fn with_registry(session: MockSession, registry: Arc<ActionRegistry>) -> Self {
        let session = Arc::new(session);
        let dialogs = Arc::new(MockDialogs::new());
        let surface = Arc::new(MockSurface::default());
        let log_sink = Arc::new(MemoryLogSink::default());
        let runtime = RuntimeContext {
            id_generator: Arc::new(FakeIdGenerator::new("dyn")),
            ..Default::default()
        };
        let widget = ButtonsWidget::new(
            session.clone(),
            surface.clone(),
            dialogs.clone(),
            Arc::new(DefaultTranslator),
            log_sink.clone(),
            registry,
            runtime,
            &HttpClientProvider::default(),
        )
        .expect("widget construction");
        Harness {
            session,
            dialogs,
            surface,
            log_sink,
            widget,
        }
    }
}
