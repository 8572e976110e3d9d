//! Web UI Module
//!
//! Server-rendered pages for listing, submitting and managing themes.

mod forms;
mod routes;
mod templates;

use axum::Router;
use std::path::Path;
use std::sync::Arc;

use crate::state::AppState;

pub use routes::error_page;

/// Create the web UI router.
/// Mount this with `.merge(web_ui::router(..))` in main.rs
pub fn router(static_dir: &Path) -> Router<Arc<AppState>> {
    routes::create_router(static_dir)
}
