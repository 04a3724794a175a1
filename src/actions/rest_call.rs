//! REST call action.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ActionEnv, ActionExecutor, ActionOutcome};
use crate::config::{ActionItem, ActionKind, HttpMethod, RestCallSettings};
use crate::core::dialog::DialogOptions;
use crate::core::context::RunContext;
use crate::error::ActionError;

/// Extract the value a response assignment refers to.
///
/// An empty pointer assigns the raw body. Otherwise the body must be JSON and
/// the pointer is resolved per RFC 6901 (`~1` unescapes to `/`, `~0` to `~`);
/// a missing leading slash is tolerated. String values are assigned bare,
/// anything else in its JSON text form.
fn extract_assignment(body_text: &str, body_json: Option<&Value>, pointer: &str) -> Option<String> {
    if pointer.is_empty() {
        return Some(body_text.to_string());
    }
    let normalized = if pointer.starts_with('/') {
        pointer.to_string()
    } else {
        format!("/{}", pointer)
    };
    let value = body_json?.pointer(&normalized)?;
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Performs an HTTP call and distributes the response into variables.
///
/// A failed call is reported through a feedback dialog and stops the chain;
/// it is not an error. After the variables are written the executor waits a
/// short settle delay so the next step reads propagated values.
pub struct CallRestApiExecutor;

impl CallRestApiExecutor {
    async fn perform(
        env: &ActionEnv,
        settings: &RestCallSettings,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = match settings.method {
            HttpMethod::Get => env.http.get(&settings.url),
            HttpMethod::Post => env.http.post(&settings.url),
            HttpMethod::Put => env.http.put(&settings.url),
            HttpMethod::Delete => env.http.delete(&settings.url),
            HttpMethod::Patch => env.http.patch(&settings.url),
        };
        for (key, value) in &settings.headers {
            request = request.header(key, value);
        }
        if !settings.body.is_empty() {
            request = request.body(settings.body.clone());
        }
        request.send().await?.error_for_status()
    }
}

#[async_trait]
impl ActionExecutor for CallRestApiExecutor {
    async fn execute(
        &self,
        item: &ActionItem,
        _ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<ActionOutcome, ActionError> {
        let Some(settings) = &item.rest else {
            return Ok(ActionOutcome::Continue);
        };

        if settings.clear_variables {
            for assignment in &settings.assignments {
                if assignment.variable.is_empty() {
                    continue;
                }
                env.session
                    .set_string_variable(&assignment.variable, "")
                    .await
                    .map_err(|e| ActionError::VariableSet {
                        variable: assignment.variable.clone(),
                        message: e.to_string(),
                    })?;
            }
        }

        let response = match Self::perform(env, settings).await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %settings.url, %error, "REST call failed");
                env.dialogs
                    .confirm(DialogOptions::feedback(
                        "REST call error",
                        format!("The call to '{}' failed: {}", settings.url, error),
                    ))
                    .await;
                return Ok(ActionOutcome::Stop);
            }
        };

        let body_text = response.text().await.unwrap_or_default();
        let body_json = serde_json::from_str::<Value>(&body_text).ok();

        for assignment in &settings.assignments {
            if assignment.variable.is_empty() {
                continue;
            }
            match extract_assignment(&body_text, body_json.as_ref(), &assignment.pointer) {
                Some(value) => {
                    env.session
                        .set_string_variable(&assignment.variable, &value)
                        .await
                        .map_err(|e| ActionError::VariableSet {
                            variable: assignment.variable.clone(),
                            message: e.to_string(),
                        })?;
                }
                None => {
                    debug!(
                        pointer = %assignment.pointer,
                        variable = %assignment.variable,
                        "response pointer did not resolve"
                    );
                }
            }
        }

        // Let variable propagation complete before the next step reads it.
        tokio::time::sleep(env.runtime.config.variable_settle_delay).await;

        Ok(ActionOutcome::Continue)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::CallRestApi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_pointer_assigns_whole_body() {
        let body = r#"{"a":1}"#;
        let json = serde_json::from_str(body).ok();
        assert_eq!(
            extract_assignment(body, json.as_ref(), ""),
            Some(body.to_string())
        );
    }

    #[test]
    fn test_pointer_lookup() {
        let json = json!({"data": {"items": [{"name": "first"}, {"name": "second"}]}});
        let body = json.to_string();
        assert_eq!(
            extract_assignment(&body, Some(&json), "/data/items/1/name"),
            Some("second".to_string())
        );
        // Non-string values are assigned in JSON text form.
        assert_eq!(
            extract_assignment(&body, Some(&json), "/data/items"),
            Some(json!([{"name": "first"}, {"name": "second"}]).to_string())
        );
    }

    #[test]
    fn test_pointer_unescaping() {
        let json = json!({"a/b": {"c~d": 7}});
        let body = json.to_string();
        assert_eq!(
            extract_assignment(&body, Some(&json), "/a~1b/c~0d"),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_missing_leading_slash_is_tolerated() {
        let json = json!({"status": "ok"});
        let body = json.to_string();
        assert_eq!(
            extract_assignment(&body, Some(&json), "status"),
            Some("ok".to_string())
        );
    }

    #[test]
    fn test_unresolvable_pointer() {
        let json = json!({"a": 1});
        let body = json.to_string();
        assert_eq!(extract_assignment(&body, Some(&json), "/b"), None);
        assert_eq!(extract_assignment("not json", None, "/a"), None);
    }
}
