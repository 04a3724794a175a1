//! Delayed field resolution.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::dialog::{DialogOptions, DialogService};
use crate::session::{AnalyticsSession, FieldHandle};

/// Confirms existence of a named field before an action may proceed.
///
/// A field handle can be returned before the remote session has confirmed
/// validity, so the resolver waits a fixed settling delay before evaluating
/// existence. A missing field is a reported outcome, not a fault: the user
/// sees a feedback dialog and the resolver returns `None`.
#[derive(Clone)]
pub struct FieldResolver {
    dialogs: Arc<dyn DialogService>,
    settle_delay: Duration,
}

impl FieldResolver {
    pub fn new(dialogs: Arc<dyn DialogService>, settle_delay: Duration) -> Self {
        Self {
            dialogs,
            settle_delay,
        }
    }

    pub async fn resolve(
        &self,
        session: &dyn AnalyticsSession,
        name: &str,
        state: &str,
    ) -> Option<Arc<dyn FieldHandle>> {
        let field = session.field(name, state);

        tokio::time::sleep(self.settle_delay).await;

        if field.exists() {
            Some(field)
        } else {
            debug!(field = name, state, "field did not resolve");
            self.dialogs
                .confirm(DialogOptions::feedback(
                    "Invalid field",
                    format!(
                        "The field named '{}' does not exist. Please make sure the relevant expression generates an existing field name.",
                        name
                    ),
                ))
                .await;
            None
        }
    }
}
