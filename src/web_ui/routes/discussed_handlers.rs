//! Export and bulk removal of discussed themes.

use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::utils::{page_context, render_template};
use crate::error::Result;
use crate::links;
use crate::state::AppState;
use crate::web_ui::forms::ClearDiscussedForm;

/// Links mentioned in discussed themes, oldest first. Read-only for both
/// GET and POST.
pub async fn export_links(State(state): State<Arc<AppState>>) -> Result<Response> {
    let descriptions = state.themes().discussed_descriptions().await?;
    let urls = links::extract_all_links(&descriptions);

    let mut context = page_context("themes");
    context.insert("urls", &urls);
    render_template("export.html", &context)
}

/// Delete all discussed themes if the confirmation box was ticked
pub async fn clear_discussed(
    State(state): State<Arc<AppState>>,
    submission: std::result::Result<Form<ClearDiscussedForm>, FormRejection>,
) -> Result<Response> {
    if ClearDiscussedForm::confirmed(submission) {
        let removed = state.themes().clear_discussed().await?;
        tracing::info!("Cleared {} discussed themes", removed);
    } else {
        tracing::debug!("Clear of discussed themes not confirmed");
    }

    Ok(Redirect::to("/themes").into_response())
}
