//! Web UI route handlers.

mod discussed_handlers;
mod theme_handlers;
mod utils;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{Redirect, Response},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::error::{Result, ServerError};
use crate::state::AppState;
use discussed_handlers::{clear_discussed, export_links};
use theme_handlers::{
    adjust_priority, create_theme, edit_page, list_themes, mark_theme, submit_page, update_theme,
};
use utils::{page_context, render_template};

pub use utils::error_page;

/// Create the web UI router, serving static assets from `static_dir`
pub fn create_router(static_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/recording", get(recording))
        .route("/themes", get(list_themes))
        .route("/submit", get(submit_page).post(create_theme))
        .route("/themes/:theme_id/edit", get(edit_page).post(update_theme))
        .route("/themes/:theme_id/mark/:status", get(mark_theme))
        .route("/themes/:theme_id/priority/:action", get(adjust_priority))
        .route("/themes/discussed/export", get(export_links).post(export_links))
        .route("/themes/discussed/clear", post(clear_discussed))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(middleware::map_response(render_status_page))
}

async fn index() -> Redirect {
    Redirect::to("/themes")
}

/// Static page with recording notes
async fn recording() -> Result<Response> {
    render_template("recording.html", &page_context("recording"))
}

async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// Replace bare 400/404/405 responses produced by the router, extractors or
/// the static file service with the HTML error page.
async fn render_status_page(response: Response) -> Response {
    let status = response.status();
    if !matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
    ) {
        return response;
    }

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));
    if is_html {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut page = error_page(status);
    if let Some(allow) = allow {
        page.headers_mut().insert(header::ALLOW, allow);
    }
    page
}
