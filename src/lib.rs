//! # actionchain — an embeddable action-chain engine for BI dashboards
//!
//! `actionchain` drives configurable dashboard buttons: each button carries an
//! ordered list of action descriptors that run against a live analytical
//! session, with short-circuit semantics and an optional navigation step once
//! the chain completes. It provides:
//!
//! - **Action execution**: selection actions (apply, clear, lock, adjacent,
//!   pareto, whole-group verbs), variable mutation, reloads and remote reload
//!   tasks, REST calls, and control flow (delay, confirm,
//!   continue-or-terminate).
//! - **Chain semantics**: strictly sequential steps, disabled steps as
//!   no-ops, a `false` result or an open confirmation dialog stopping the
//!   chain, unknown kinds failing it.
//! - **Field resolution**: delayed existence checks against the session, with
//!   a missing field reported to the user instead of thrown.
//! - **Dynamic button sets**: `|`/`~`-delimited rule expressions expanded
//!   into button definitions, memoized per `(rule, limit)` for the widget's
//!   lifetime.
//! - **Opaque collaborators**: the analytics session, dialogs, navigation
//!   surface and translations are traits supplied by the host, so the engine
//!   runs unmodified against fakes in tests.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use actionchain::{
//!     create_default_registry, ActionSource, ButtonsWidget, HttpClientProvider, RunContext,
//!     RuntimeContext,
//! };
//!
//! # async fn run(session: Arc<dyn actionchain::AnalyticsSession>,
//! #              surface: Arc<dyn actionchain::NavigationSurface>,
//! #              dialogs: Arc<dyn actionchain::DialogService>) {
//! let widget = ButtonsWidget::new(
//!     session,
//!     surface,
//!     dialogs,
//!     Arc::new(actionchain::DefaultTranslator),
//!     Arc::new(actionchain::NoopLogSink),
//!     Arc::new(create_default_registry()),
//!     RuntimeContext::default(),
//!     &HttpClientProvider::default(),
//! )
//! .unwrap();
//!
//! let props = actionchain::parse_props(&serde_json::json!({
//!     "buttons": [{ "label": "Clear", "actions": [{ "action": "clearSelection" }] }]
//! }))
//! .unwrap();
//! widget
//!     .activate(&props.buttons[0], &RunContext::default())
//!     .await;
//! # }
//! ```

pub mod actions;
pub mod buttons;
pub mod config;
pub mod core;
pub mod error;
pub mod session;
pub mod widget;

pub use crate::actions::{
    create_default_registry, ActionEnv, ActionExecutor, ActionOutcome, ActionRegistry,
};
pub use crate::buttons::{ButtonSetCache, BUTTON_LIMIT};
pub use crate::config::{
    loose_bool, parse_props, validate_props, ActionItem, ActionKind, Button, ButtonSet,
    NavigationItem, NavigationKind, ValidationReport, WidgetProps,
};
pub use crate::core::{
    ActionSource, ChainOutcome, ChainRunner, ChainState, DialogOptions, DialogService,
    DialogUpdate, EngineConfig, FakeIdGenerator, FakeTimeProvider, FieldResolver,
    HttpClientProvider, HttpPoolConfig, IdGenerator, NavigationDispatcher, ProgressDialog,
    RealIdGenerator, RealTimeProvider, RunContext, RuntimeContext, TimeProvider,
};
pub use crate::error::{ActionError, ChainError};
pub use crate::session::{
    AnalyticsSession, ConnectionOptions, CubeDef, CubeRow, DefaultTranslator, FieldHandle,
    FieldValue, ListValue, NavigationSurface, NoopLogSink, ScriptLogSink, SessionError,
    SessionObjectData, SheetInfo, Translator, ValueListDef, ValueState,
};
pub use crate::widget::ButtonsWidget;
