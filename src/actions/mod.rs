//! Action executors and their registry.
//!
//! Each configured action kind maps to one [`ActionExecutor`]. Executors
//! receive the full descriptor, the per-invocation [`RunContext`] and the
//! shared [`ActionEnv`] of collaborators, and resolve to an
//! [`ActionOutcome`] telling the chain whether to keep going.

pub mod adjacent;
pub mod control;
pub mod pareto;
pub mod registry;
pub mod reload;
pub mod rest_call;
pub mod selection;
pub mod task;
pub mod variable;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ActionItem, ActionKind};
use crate::core::chain::ChainState;
use crate::core::context::{RunContext, RuntimeContext};
use crate::core::dialog::DialogService;
use crate::core::http::{HttpClientProvider, PlatformRestClient};
use crate::core::resolver::FieldResolver;
use crate::error::ActionError;
use crate::session::{AnalyticsSession, ScriptLogSink, Translator};

pub use registry::{create_default_registry, ActionRegistry};

/// What an action tells the chain to do next.
///
/// `Stop` is the normal short-circuit ("could not proceed now", user
/// cancelled); errors are reserved for programming-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Continue,
    Stop,
}

impl ActionOutcome {
    /// `true` continues the chain, `false` stops it.
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            ActionOutcome::Continue
        } else {
            ActionOutcome::Stop
        }
    }

    pub fn is_stop(self) -> bool {
        self == ActionOutcome::Stop
    }
}

/// The collaborators an executor may need. Owned by the widget instance and
/// shared by reference with every chain invocation.
#[derive(Clone)]
pub struct ActionEnv {
    pub session: Arc<dyn AnalyticsSession>,
    pub dialogs: Arc<dyn DialogService>,
    pub resolver: FieldResolver,
    pub http: reqwest::Client,
    pub rest: PlatformRestClient,
    pub runtime: RuntimeContext,
    pub translator: Arc<dyn Translator>,
    pub log_sink: Arc<dyn ScriptLogSink>,
    pub chain: Arc<ChainState>,
}

impl ActionEnv {
    pub fn new(
        session: Arc<dyn AnalyticsSession>,
        dialogs: Arc<dyn DialogService>,
        translator: Arc<dyn Translator>,
        log_sink: Arc<dyn ScriptLogSink>,
        runtime: RuntimeContext,
        provider: &HttpClientProvider,
    ) -> Result<Self, ActionError> {
        let rest = PlatformRestClient::new(provider, &session.connection())?;
        let resolver = FieldResolver::new(dialogs.clone(), runtime.config.field_settle_delay);
        Ok(Self {
            session,
            dialogs,
            resolver,
            http: provider.client(),
            rest,
            runtime,
            translator,
            log_sink,
            chain: Arc::new(ChainState::default()),
        })
    }

    /// Label lookup with a configured override taking precedence.
    pub(crate) fn label_or(&self, configured: &str, key: &str) -> String {
        if configured.is_empty() {
            self.translator.get(key)
        } else {
            configured.to_string()
        }
    }
}

/// Trait for action execution. Each action kind implements this.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(
        &self,
        item: &ActionItem,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError>;

    fn kind(&self) -> ActionKind;
}
