//! Remote reload-task execution over the repository REST API.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::config::{ActionItem, ActionKind, TaskDisplayProgress};
use crate::core::context::{format_elapsed, RunContext};
use crate::core::dialog::{DialogOptions, DialogUpdate};
use crate::error::ActionError;

/// Terminal execution status codes reported by the repository service.
const STATUS_SUCCESS: i64 = 7;
const STATUS_FAILURE: i64 = 8;

#[derive(Debug, Clone, Deserialize)]
struct ReloadTask {
    id: String,
    name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ExecutionDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ExecutionResult {
    status: i64,
    #[serde(default)]
    details: Vec<ExecutionDetail>,
    #[serde(default, rename = "fileReferenceID")]
    file_reference_id: Option<String>,
}

enum TaskPoll {
    Running,
    Done,
}

struct TaskFailure {
    message: String,
    file_reference_id: Option<String>,
    has_details: bool,
}

impl From<ExecutionResult> for TaskFailure {
    fn from(result: ExecutionResult) -> Self {
        TaskFailure {
            message: result
                .details
                .last()
                .map(|d| d.message.clone())
                .unwrap_or_default(),
            file_reference_id: result.file_reference_id.clone(),
            has_details: !result.details.is_empty(),
        }
    }
}

/// Starts a server-side reload task and follows it to a terminal status.
///
/// The task is looked up first (it may have been deleted or be inaccessible),
/// an already-running task is not started a second time, and starting is
/// confirmed with the user unless configured otherwise. Progress is polled
/// until the execution result reports success or failure; on failure with a
/// script log available, the dialog's negative affordance downloads the log.
pub struct StartReloadTaskExecutor;

impl StartReloadTaskExecutor {
    async fn feedback(env: &ActionEnv, title: &str, message: String) -> bool {
        env.dialogs
            .confirm(DialogOptions::feedback(title, message))
            .await
    }

    /// The task was not found, or the action is not properly configured.
    async fn task_not_found(env: &ActionEnv, id: Option<&str>) -> ActionOutcome {
        let message = match id {
            Some(id) => format!("The reload task with id '{}' was not found.", id),
            None => "The settings for this action are not properly defined.".to_string(),
        };
        ActionOutcome::from_flag(Self::feedback(env, "Reload task error", message).await)
    }

    /// One status poll against the execution-result endpoint.
    async fn check_execution_result(
        env: &ActionEnv,
        session_id: &str,
    ) -> Result<TaskPoll, TaskFailure> {
        let filter = format!("executionId eq {}", session_id);
        let response = env
            .rest
            .get_json("/qrs/executionresult", &[("filter", &filter)])
            .await
            .map_err(|e| TaskFailure {
                message: e.to_string(),
                file_reference_id: None,
                has_details: false,
            })?;

        let Some(first) = response.as_array().and_then(|list| list.first()) else {
            return Err(TaskFailure {
                message: "Forbidden".to_string(),
                file_reference_id: None,
                has_details: false,
            });
        };

        let result: ExecutionResult =
            serde_json::from_value(first.clone()).map_err(|e| TaskFailure {
                message: e.to_string(),
                file_reference_id: None,
                has_details: false,
            })?;

        match result.status {
            STATUS_SUCCESS => Ok(TaskPoll::Done),
            STATUS_FAILURE => Err(TaskFailure::from(result)),
            _ => Ok(TaskPoll::Running),
        }
    }

    /// Fetch the script log of a failed execution and hand it to the host.
    async fn download_script_log(
        env: &ActionEnv,
        task: &ReloadTask,
        file_reference_id: &str,
    ) -> Result<(), ActionError> {
        let reference = env
            .rest
            .get_json(
                &format!("/qrs/reloadtask/{}/scriptlog", task.id),
                &[("fileReferenceId", file_reference_id)],
            )
            .await?;
        let value = reference
            .get("value")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ActionError::Http("script log reference missing".to_string()))?;

        let filename = format!("{}.log", task.name);
        let content = env
            .rest
            .get_text(
                &format!("/qrs/download/reloadtask/{}/{}", value, filename),
                &[],
            )
            .await?;

        env.log_sink.save(&filename, &content);
        Ok(())
    }

    async fn finish(
        env: &ActionEnv,
        task: &ReloadTask,
        confirmed: bool,
        failure: Option<TaskFailure>,
    ) -> ActionOutcome {
        if confirmed {
            return ActionOutcome::Continue;
        }

        if let Some(reference) = failure.and_then(|f| f.file_reference_id) {
            if let Err(error) = Self::download_script_log(env, task, &reference).await {
                warn!(%error, task = %task.name, "script log download failed");
            }
        }

        ActionOutcome::Stop
    }

    /// Follow the started task in a progress dialog until it is closed.
    async fn track_task(
        env: &ActionEnv,
        item: &ActionItem,
        task: &ReloadTask,
        session_id: &str,
    ) -> ActionOutcome {
        let show_progress = item.task_display_progress != TaskDisplayProgress::Hidden;
        let started = env.runtime.time_provider.now_millis();

        let dialog = env.dialogs.open_progress(DialogOptions {
            title: "Reload task started".to_string(),
            message: format!("The reload task named '{}' was started.", task.name),
            ok_label: Some(env.translator.get("Common.OK")),
            cancel_label: Some(env.translator.get("Common.Cancel")),
            hide_ok_button: item.task_display_progress == TaskDisplayProgress::Enforced,
            hide_cancel_button: true,
            show_progress,
            close_on_escape: false,
        });

        if !show_progress {
            let confirmed = dialog.wait_closed().await;
            return Self::finish(env, task, confirmed, None).await;
        }

        let mut ticker = tokio::time::interval(env.runtime.config.progress_tick);
        // A slow poll must not trigger a burst of catch-up checks.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut failure: Option<TaskFailure> = None;
        let mut terminal = false;
        loop {
            tokio::select! {
                confirmed = dialog.wait_closed() => {
                    return Self::finish(env, task, confirmed, failure).await;
                }
                _ = ticker.tick() => {
                    if terminal {
                        continue;
                    }
                    dialog.update(DialogUpdate::elapsed(format_elapsed(
                        started,
                        env.runtime.time_provider.now_millis(),
                    )));

                    match Self::check_execution_result(env, session_id).await {
                        Ok(TaskPoll::Running) => {}
                        Ok(TaskPoll::Done) => {
                            terminal = true;
                            dialog.update(DialogUpdate {
                                title: Some("Reload task executed".to_string()),
                                message: Some(format!(
                                    "The reload task named '{}' was successfully executed.",
                                    task.name
                                )),
                                hide_ok_button: Some(false),
                                ..Default::default()
                            });
                            if item.task_auto_resolve {
                                dialog.close(true);
                            }
                        }
                        Err(error) => {
                            terminal = true;
                            dialog.update(DialogUpdate {
                                title: Some("Reload task failed".to_string()),
                                message: Some(format!(
                                    "Execution of the reload task named '{}' failed with the following message: {}",
                                    task.name, error.message
                                )),
                                hide_ok_button: Some(false),
                                ..Default::default()
                            });
                            if error.has_details {
                                dialog.update(DialogUpdate {
                                    hide_cancel_button: Some(false),
                                    cancel_label: Some("Download log".to_string()),
                                    ..Default::default()
                                });
                            }
                            failure = Some(error);
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl ActionExecutor for StartReloadTaskExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        if item.task.is_empty() {
            return Ok(Self::task_not_found(env, None).await);
        }

        // The task might not be available for the user, or it was deleted.
        let task: ReloadTask = match env
            .rest
            .get_json(&format!("/qrs/reloadtask/{}", item.task), &[])
            .await
            .and_then(|v| serde_json::from_value(v).map_err(ActionError::from))
        {
            Ok(task) => task,
            Err(error) => {
                warn!(%error, task = %item.task, "reload task lookup failed");
                return Ok(Self::task_not_found(env, Some(&item.task)).await);
            }
        };

        let filter = format!("reloadTask.id eq {}", task.id);
        let sessions = match env
            .rest
            .get_json("/qrs/executionsession", &[("filter", &filter)])
            .await
        {
            Ok(sessions) => sessions,
            Err(error) => {
                warn!(%error, task = %task.name, "execution session lookup failed");
                let confirmed = Self::feedback(
                    env,
                    "Reload task error",
                    format!(
                        "Something went wrong when trying to start the reload task named '{}': {}",
                        task.name, error
                    ),
                )
                .await;
                return Ok(ActionOutcome::from_flag(confirmed));
            }
        };
        if sessions.as_array().is_some_and(|list| !list.is_empty()) {
            let confirmed = Self::feedback(
                env,
                "Reload task",
                format!("The reload task named '{}' is currently running.", task.name),
            )
            .await;
            return Ok(ActionOutcome::from_flag(confirmed));
        }

        if !item.task_skip_confirmation {
            let mut options = DialogOptions::feedback(
                "Reload task",
                format!("You are going to start the reload task named '{}'.", task.name),
            );
            options.ok_label = Some("Start task".to_string());
            options.hide_cancel_button = false;
            if !env.dialogs.confirm(options).await {
                return Ok(ActionOutcome::Stop);
            }
        }

        let session_id = match env
            .rest
            .post_json(&format!("/qrs/task/{}/start/synchronous", task.id))
            .await
        {
            Ok(response) => response
                .get("value")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            Err(error) => {
                warn!(%error, task = %task.name, "reload task did not start");
                let confirmed = Self::feedback(
                    env,
                    "Reload task error",
                    format!(
                        "Something went wrong when trying to start the reload task named '{}': {}",
                        task.name, error
                    ),
                )
                .await;
                return Ok(ActionOutcome::from_flag(confirmed));
            }
        };

        Ok(Self::track_task(env, item, &task, &session_id).await)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::StartReloadTask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_result_parsing() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "status": 8,
            "details": [
                { "message": "Opening app" },
                { "message": "Script error on line 4" }
            ],
            "fileReferenceID": "f-123"
        }))
        .unwrap();
        assert_eq!(result.status, STATUS_FAILURE);

        let failure = TaskFailure::from(result);
        assert_eq!(failure.message, "Script error on line 4");
        assert_eq!(failure.file_reference_id.as_deref(), Some("f-123"));
        assert!(failure.has_details);
    }

    #[test]
    fn test_execution_result_minimal() {
        let result: ExecutionResult = serde_json::from_value(json!({ "status": 7 })).unwrap();
        assert_eq!(result.status, STATUS_SUCCESS);
        assert!(result.details.is_empty());
        assert_eq!(result.file_reference_id, None);
    }
}
