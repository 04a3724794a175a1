//! Per-instance widget controller.

use std::sync::Arc;

use tracing::{debug, error};

use crate::actions::{ActionEnv, ActionRegistry};
use crate::buttons::ButtonSetCache;
use crate::config::{Button, ButtonSet, NavigationItem};
use crate::core::chain::{ActionSource, ChainOutcome, ChainRunner};
use crate::core::context::{RunContext, RuntimeContext};
use crate::core::dialog::DialogService;
use crate::core::http::HttpClientProvider;
use crate::core::navigation::NavigationDispatcher;
use crate::error::ChainError;
use crate::session::{AnalyticsSession, NavigationSurface, ScriptLogSink, Translator};

/// One mounted buttons widget.
///
/// Owns the state shared across its chain invocations: the dynamic button
/// cache and the confirmation-dialog flag (via the [`ActionEnv`]). Neither is
/// shared across instances, and the cache lives exactly as long as the
/// instance.
pub struct ButtonsWidget {
    env: ActionEnv,
    runner: ChainRunner,
    navigation: NavigationDispatcher,
    cache: ButtonSetCache,
}

impl ButtonsWidget {
    pub fn new(
        session: Arc<dyn AnalyticsSession>,
        surface: Arc<dyn NavigationSurface>,
        dialogs: Arc<dyn DialogService>,
        translator: Arc<dyn Translator>,
        log_sink: Arc<dyn ScriptLogSink>,
        registry: Arc<ActionRegistry>,
        runtime: RuntimeContext,
        provider: &HttpClientProvider,
    ) -> Result<Self, ChainError> {
        let env = ActionEnv::new(
            session.clone(),
            dialogs.clone(),
            translator,
            log_sink,
            runtime,
            provider,
        )?;
        Ok(Self {
            env,
            runner: ChainRunner::new(registry),
            navigation: NavigationDispatcher::new(session, surface, dialogs),
            cache: ButtonSetCache::new(),
        })
    }

    pub fn env(&self) -> &ActionEnv {
        &self.env
    }

    /// Run an action chain to its terminal state.
    pub async fn run_chain(
        &self,
        source: &ActionSource,
        ctx: &RunContext,
    ) -> Result<ChainOutcome, ChainError> {
        self.runner.run(source, ctx, &self.env).await
    }

    /// Run a button's navigation step, gated on the chain outcome.
    pub async fn run_navigation(
        &self,
        nav: &NavigationItem,
        outcome: ChainOutcome,
        ctx: &RunContext,
    ) {
        self.navigation.dispatch(nav, outcome, ctx).await;
    }

    /// Full button activation: run the chain, then navigation when the chain
    /// completed. Chain errors are logged and leave the UI stable.
    pub async fn activate(&self, button: &Button, ctx: &RunContext) {
        if ctx.no_interaction {
            return;
        }

        let source = ActionSource::List(button.actions.clone());
        match self.run_chain(&source, ctx).await {
            Ok(outcome) => {
                if let Some(nav) = &button.navigation {
                    self.run_navigation(nav, outcome, ctx).await;
                }
            }
            Err(err) => error!(%err, button = %button.label, "action chain failed"),
        }
    }

    /// The buttons a dynamic set currently expands to.
    pub fn dynamic_buttons(&self, set: &ButtonSet) -> Arc<[Button]> {
        let template = set.definition.first().cloned().unwrap_or_default();
        self.cache.materialize(
            &set.rule,
            set.limit,
            &template,
            self.env.runtime.id_generator.as_ref(),
        )
    }

    pub fn on_mount(&self) {
        debug!("buttons widget mounted");
    }

    pub fn on_destroy(&self) {
        debug!("buttons widget destroyed");
        self.cache.clear();
    }
}
