//! Theme list, submission, editing and lifecycle handlers.

use axum::{
    extract::{rejection::FormRejection, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::utils::{page_context, parse_theme_id, render_template, ThemeView};
use crate::error::{Result, ServerError};
use crate::state::AppState;
use crate::theme::{PriorityAction, ThemeStatus};
use crate::web_ui::forms::DescriptionForm;

const THEMES_PATH: &str = "/themes";

/// Dashboard with current, queued and discussed themes
pub async fn list_themes(State(state): State<Arc<AppState>>) -> Result<Response> {
    let store = state.themes();
    let mut context = page_context("themes");

    for status in ThemeStatus::ALL {
        let views = store
            .list_by_status(status)
            .await?
            .into_iter()
            .map(ThemeView::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        context.insert(status.name(), &views);
    }

    render_template("themes.html", &context)
}

/// New theme page (GET)
pub async fn submit_page() -> Result<Response> {
    render_submit(&DescriptionForm::default())
}

/// Create a theme (POST)
pub async fn create_theme(
    State(state): State<Arc<AppState>>,
    submission: std::result::Result<Form<DescriptionForm>, FormRejection>,
) -> Result<Response> {
    let form = match DescriptionForm::validate(submission) {
        Ok(form) => form,
        Err(form) => return render_submit(&form),
    };

    let store = state.themes();
    let creator = store
        .user_id_by_login(&state.admin_login)
        .await?
        .ok_or_else(|| ServerError::UserNotFound(state.admin_login.clone()))?;
    let theme = store.create(&form.description, creator).await?;
    tracing::info!("Created theme {}", theme.id);

    Ok(Redirect::to(THEMES_PATH).into_response())
}

fn render_submit(form: &DescriptionForm) -> Result<Response> {
    let mut context = page_context("submit");
    context.insert("form", form);
    render_template("submit.html", &context)
}

/// Edit page pre-filled with the stored description (GET)
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    Path(theme_id): Path<String>,
) -> Result<Response> {
    let id = parse_theme_id(&theme_id)?;
    let description = state
        .themes()
        .description(id)
        .await?
        .ok_or(ServerError::NotFound)?;

    render_edit(id, &DescriptionForm { description })
}

/// Save an edited description (POST)
pub async fn update_theme(
    State(state): State<Arc<AppState>>,
    Path(theme_id): Path<String>,
    submission: std::result::Result<Form<DescriptionForm>, FormRejection>,
) -> Result<Response> {
    let id = parse_theme_id(&theme_id)?;
    let form = match DescriptionForm::validate(submission) {
        Ok(form) => form,
        Err(form) => return render_edit(id, &form),
    };

    if state.themes().update_description(id, &form.description).await? {
        tracing::info!("Updated description of theme {}", id);
    } else {
        tracing::debug!("Theme {} not found for edit", id);
    }

    Ok(Redirect::to(THEMES_PATH).into_response())
}

fn render_edit(id: i32, form: &DescriptionForm) -> Result<Response> {
    let mut context = page_context("submit");
    context.insert("theme_id", &id);
    context.insert("form", form);
    render_template("edit.html", &context)
}

/// Move a theme to another status
pub async fn mark_theme(
    State(state): State<Arc<AppState>>,
    Path((theme_id, status)): Path<(String, String)>,
) -> Result<Response> {
    let id = parse_theme_id(&theme_id)?;
    let target: ThemeStatus = status.parse().map_err(|_| ServerError::NotFound)?;

    if state.themes().transition(id, target).await? {
        tracing::info!("Theme {} marked {}", id, target);
    } else {
        tracing::debug!("Theme {} not moved to {}", id, target);
    }

    Ok(Redirect::to(THEMES_PATH).into_response())
}

/// Raise or lower a theme's priority by one step
pub async fn adjust_priority(
    State(state): State<Arc<AppState>>,
    Path((theme_id, action)): Path<(String, String)>,
) -> Result<Response> {
    let id = parse_theme_id(&theme_id)?;
    let Some(action) = PriorityAction::parse(&action) else {
        return Ok(Redirect::to(THEMES_PATH).into_response());
    };

    if state.themes().adjust_priority(id, action).await? {
        tracing::info!("Theme {} priority {:?}", id, action);
    }

    Ok(Redirect::to(THEMES_PATH).into_response())
}
