use sea_orm::DatabaseConnection;

use crate::db::ThemeStore;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    /// Login that submitted themes are attributed to
    pub admin_login: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, admin_login: impl Into<String>) -> Self {
        Self {
            db,
            admin_login: admin_login.into(),
        }
    }

    /// Store handle for the duration of one request
    pub fn themes(&self) -> ThemeStore<'_> {
        ThemeStore::new(&self.db)
    }
}
