//! Post-chain navigation dispatch.

use std::sync::Arc;

use tracing::warn;

use crate::config::{NavigationItem, NavigationKind};
use crate::core::chain::ChainOutcome;
use crate::core::context::RunContext;
use crate::core::dialog::{DialogOptions, DialogService};
use crate::error::ActionError;
use crate::session::{AnalyticsSession, ConnectionOptions, NavigationSurface, SheetInfo};

/// Build the fully qualified URL of a sheet in another app.
pub(crate) fn build_app_sheet_url(
    connection: &ConnectionOptions,
    app: &str,
    sheet: &str,
) -> Result<String, ActionError> {
    let scheme = if connection.secure { "https" } else { "http" };
    let mut base = format!("{}://{}", scheme, connection.host);
    if let Some(port) = connection.port {
        base.push_str(&format!(":{}", port));
    }
    let mut url = url::Url::parse(&base).map_err(|e| ActionError::Config(e.to_string()))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ActionError::Config("cannot-be-a-base connection URL".to_string()))?;
        if let Some(prefix) = &connection.prefix {
            let prefix = prefix.trim_matches('/');
            if !prefix.is_empty() {
                segments.push(prefix);
            }
        }
        segments.extend(["sense", "app", app]);
        if !sheet.is_empty() {
            segments.extend(["sheet", sheet, "state", "analysis"]);
        }
    }

    Ok(url.into())
}

/// Pick a sheet by index from a rank-ordered sheet list. Negative indices
/// count from the end; anything out of range falls back to the first sheet.
fn sheet_by_index(mut sheets: Vec<SheetInfo>, index: i64) -> Option<SheetInfo> {
    if sheets.is_empty() {
        return None;
    }
    sheets.sort_by(|a, b| a.rank.total_cmp(&b.rank));

    let len = sheets.len() as i64;
    let index = if index < 0 { len + index } else { index };
    let index = if (0..len).contains(&index) { index } else { 0 };
    Some(sheets.swap_remove(index as usize))
}

/// Runs at most one navigation action after a chain completes.
///
/// Navigation is best-effort UI sugar: a stopped chain, disabled interaction,
/// a disabled descriptor or an unknown kind all make this a silent no-op, and
/// failures are logged rather than surfaced.
pub struct NavigationDispatcher {
    session: Arc<dyn AnalyticsSession>,
    surface: Arc<dyn NavigationSurface>,
    dialogs: Arc<dyn DialogService>,
}

impl NavigationDispatcher {
    pub fn new(
        session: Arc<dyn AnalyticsSession>,
        surface: Arc<dyn NavigationSurface>,
        dialogs: Arc<dyn DialogService>,
    ) -> Self {
        Self {
            session,
            surface,
            dialogs,
        }
    }

    pub async fn dispatch(&self, nav: &NavigationItem, outcome: ChainOutcome, ctx: &RunContext) {
        if !outcome.is_completed() || ctx.no_interaction || !nav.enabled {
            return;
        }
        let Some(kind) = nav.action else {
            return;
        };

        match kind {
            NavigationKind::GoToSheet => {
                if !nav.sheet.is_empty() {
                    self.surface.goto_sheet(&nav.sheet);
                }
            }
            NavigationKind::GoToFirstSheet => self.goto_sheet_by_index(0).await,
            NavigationKind::GoToLastSheet => self.goto_sheet_by_index(-1).await,
            NavigationKind::GoToPrevSheet => self.surface.prev_sheet(),
            NavigationKind::GoToNextSheet => self.surface.next_sheet(),
            NavigationKind::GoToAppSheet => {
                if nav.app.is_empty() {
                    return;
                }
                match build_app_sheet_url(&self.session.connection(), &nav.app, &nav.sheet) {
                    Ok(url) => self.surface.open_url(&url, nav.new_tab),
                    Err(error) => warn!(%error, app = %nav.app, "app sheet URL build failed"),
                }
            }
            NavigationKind::StartStory => {
                if !nav.story.is_empty() {
                    self.surface.goto_story(&nav.story);
                }
            }
            NavigationKind::GoToUri => {
                if !nav.value.is_empty() {
                    self.surface.open_url(&nav.value, nav.new_tab);
                }
            }
            NavigationKind::SwitchToEdit => {
                if self.surface.can_edit() {
                    self.surface.enter_edit_mode();
                } else {
                    self.dialogs
                        .confirm(DialogOptions::feedback(
                            "Edit Mode",
                            "You are not allowed to edit this sheet.",
                        ))
                        .await;
                }
            }
        }
    }

    async fn goto_sheet_by_index(&self, index: i64) {
        match self.session.sheets().await {
            Ok(sheets) => {
                if let Some(sheet) = sheet_by_index(sheets, index) {
                    self.surface.goto_sheet(&sheet.id);
                }
            }
            Err(error) => warn!(%error, "sheet list fetch failed"),
        }
    }
}
