//! Shared utilities and helper functions for web UI.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::Context;

use crate::db::ThemeRow;
use crate::error::{Result, ServerError};
use crate::theme::{PriorityAction, ThemeStatus, UnknownStatus};
use crate::web_ui::templates;

/// Context with the navigation section every page needs
pub fn page_context(section: &str) -> Context {
    let mut context = Context::new();
    context.insert("section", section);
    context
}

/// Helper to render a template
pub fn render_template(name: &str, context: &Context) -> Result<Response> {
    let html = templates::render(name, context)?;
    Ok(Html(html).into_response())
}

/// Generic error page carrying only the status code
pub fn error_page(status: StatusCode) -> Response {
    let message = format!("Error code {}", status.as_u16());
    let mut context = page_context("");
    context.insert("message", &message);

    match templates::render("error.html", &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (status, message).into_response()
        }
    }
}

/// Parse a theme id path segment. Only plain decimal digits are accepted.
pub fn parse_theme_id(raw: &str) -> Result<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServerError::NotFound);
    }
    raw.parse().map_err(|_| ServerError::NotFound)
}

/// Theme info for templates
#[derive(Debug, serde::Serialize)]
pub struct ThemeView {
    pub id: i32,
    pub description: String,
    pub rev: i32,
    pub priority: i32,
    pub status: &'static str,
    pub creator: String,
    /// Statuses this theme can be marked as
    pub transitions: Vec<&'static str>,
    pub can_raise: bool,
    pub can_lower: bool,
}

impl TryFrom<ThemeRow> for ThemeView {
    type Error = UnknownStatus;

    fn try_from((theme, creator): ThemeRow) -> std::result::Result<Self, Self::Error> {
        let status = ThemeStatus::from_code(&theme.status)?;
        Ok(Self {
            id: theme.id,
            description: theme.description,
            rev: theme.rev,
            priority: theme.priority,
            status: status.name(),
            creator: creator
                .map(|u| u.login)
                .unwrap_or_else(|| "unknown".to_string()),
            transitions: ThemeStatus::ALL
                .into_iter()
                .filter(|&target| ThemeStatus::can_transition(status, target))
                .map(ThemeStatus::name)
                .collect(),
            can_raise: PriorityAction::Up.apply(theme.priority) != theme.priority,
            can_lower: PriorityAction::Down.apply(theme.priority) != theme.priority,
        })
    }
}
