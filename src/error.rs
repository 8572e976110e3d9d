use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::theme::UnknownStatus;
use crate::web_ui;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not found")]
    NotFound,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Corrupt theme record: {0}")]
    CorruptStatus(#[from] UnknownStatus),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::UserNotFound(_)
            | ServerError::CorruptStatus(_)
            | ServerError::Database(_)
            | ServerError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        web_ui::error_page(status)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
