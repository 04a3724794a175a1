//! Modal dialog collaborator traits.
//!
//! The hosting surface owns dialog rendering. The engine only needs two
//! shapes: a blocking confirm (feedback dialogs, confirmation prompts) and a
//! progress dialog it can update while a long-running operation is in flight.

use async_trait::async_trait;

/// Options for opening a dialog.
#[derive(Debug, Clone)]
pub struct DialogOptions {
    pub title: String,
    pub message: String,
    pub ok_label: Option<String>,
    pub cancel_label: Option<String>,
    pub hide_ok_button: bool,
    pub hide_cancel_button: bool,
    pub show_progress: bool,
    pub close_on_escape: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            ok_label: None,
            cancel_label: None,
            hide_ok_button: false,
            hide_cancel_button: false,
            show_progress: false,
            close_on_escape: true,
        }
    }
}

impl DialogOptions {
    /// A feedback dialog: message plus a single OK button.
    pub fn feedback(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            hide_cancel_button: true,
            ..Default::default()
        }
    }
}

/// Incremental changes to an open progress dialog. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct DialogUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
    pub ok_label: Option<String>,
    pub cancel_label: Option<String>,
    pub hide_ok_button: Option<bool>,
    pub hide_cancel_button: Option<bool>,
    pub elapsed: Option<String>,
}

impl DialogUpdate {
    pub fn elapsed(value: impl Into<String>) -> Self {
        Self {
            elapsed: Some(value.into()),
            ..Default::default()
        }
    }
}

/// An open, updatable dialog tracking a long-running operation.
#[async_trait]
pub trait ProgressDialog: Send + Sync {
    fn update(&self, update: DialogUpdate);

    /// Close the dialog programmatically with the given result.
    fn close(&self, result: bool);

    /// Resolves once the dialog is closed, by the user or via
    /// [`ProgressDialog::close`]. `false` means the negative affordance.
    async fn wait_closed(&self) -> bool;
}

#[async_trait]
pub trait DialogService: Send + Sync {
    /// Show a modal dialog and wait for it to close. Returns the close
    /// result: `true` for the positive affordance.
    async fn confirm(&self, options: DialogOptions) -> bool;

    /// Open a progress dialog without waiting for it.
    fn open_progress(&self, options: DialogOptions) -> Box<dyn ProgressDialog>;
}
