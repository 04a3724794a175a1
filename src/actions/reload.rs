//! In-session reload with a progress dialog.

use async_trait::async_trait;
use tracing::warn;

use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::config::{ActionItem, ActionKind};
use crate::core::context::{format_elapsed, RunContext};
use crate::core::dialog::{DialogOptions, DialogUpdate};
use crate::error::ActionError;

/// Starts a complete or partial reload and tracks it in a progress dialog.
///
/// The dialog shows elapsed time on a fixed tick while the reload runs. A
/// successful reload saves the app and flips the dialog to a done message; a
/// failed one flips it to a failure message. Closing the dialog negatively
/// cancels the reload and stops the chain; everything else continues it.
pub struct StartReloadExecutor;

impl StartReloadExecutor {
    async fn finish(
        env: &ActionEnv,
        started: i64,
        confirmed: bool,
    ) -> Result<ActionOutcome, ActionError> {
        if confirmed {
            return Ok(ActionOutcome::Continue);
        }

        env.session.cancel_reload().await;

        let elapsed = format_elapsed(started, env.runtime.time_provider.now_millis());
        let mut options = DialogOptions::feedback(
            "Reload aborted",
            format!("The reload for this app was aborted after {}.", elapsed),
        );
        options.ok_label = Some(env.translator.get("Common.Close"));
        env.dialogs.confirm(options).await;

        Ok(ActionOutcome::Stop)
    }
}

#[async_trait]
impl ActionExecutor for StartReloadExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        let started = env.runtime.time_provider.now_millis();

        let dialog = env.dialogs.open_progress(DialogOptions {
            title: "Reload started".to_string(),
            message: "The reload for this app was started.".to_string(),
            ok_label: Some(env.translator.get("Common.OK")),
            cancel_label: Some("Abort".to_string()),
            hide_ok_button: true,
            hide_cancel_button: false,
            show_progress: true,
            close_on_escape: false,
        });

        let mut ticker = tokio::time::interval(env.runtime.config.progress_tick);
        let mut reload_fut = env.session.do_reload(item.either_or);

        // Track the reload until it settles, keeping the elapsed time fresh
        // and honoring an early close.
        let success = loop {
            tokio::select! {
                result = &mut reload_fut => {
                    break match result {
                        Ok(success) => success,
                        Err(error) => {
                            warn!(%error, "reload request failed");
                            false
                        }
                    };
                }
                confirmed = dialog.wait_closed() => {
                    return Self::finish(env, started, confirmed).await;
                }
                _ = ticker.tick() => {
                    dialog.update(DialogUpdate::elapsed(format_elapsed(
                        started,
                        env.runtime.time_provider.now_millis(),
                    )));
                }
            }
        };

        if success {
            dialog.update(DialogUpdate {
                title: Some("Reload executed".to_string()),
                message: Some("The reload for this app was successfully executed.".to_string()),
                hide_ok_button: Some(false),
                hide_cancel_button: Some(true),
                ..Default::default()
            });
            if let Err(error) = env.session.do_save().await {
                warn!(%error, "saving the app after reload failed");
            }
            if item.task_auto_resolve {
                dialog.close(true);
            }
        } else {
            dialog.update(DialogUpdate {
                title: Some("Reload failed".to_string()),
                message: Some("Execution of the reload for this app failed.".to_string()),
                hide_ok_button: Some(false),
                hide_cancel_button: Some(true),
                ..Default::default()
            });
        }

        let confirmed = dialog.wait_closed().await;
        Self::finish(env, started, confirmed).await
    }

    fn kind(&self) -> ActionKind {
        ActionKind::StartReload
    }
}
