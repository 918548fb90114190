//! HTTP error mapping.
//!
//! Guard and validation failures keep their own message; store and internal
//! failures are logged and answered with a generic 500.

use crate::views;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::error;
use quillpost_core::db::DbError;
use quillpost_core::{AccountError, RepoError, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Db(#[from] DbError),
    /// Path segment that cannot name any post.
    #[error("Post id {0} doesn't exist.")]
    UnknownPostPath(String),
    /// Form body that could not be decoded. Only reported to logged in callers.
    #[error(transparent)]
    Form(#[from] FormRejection),
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
    #[error("session store failure: {0}")]
    Session(String),
    #[error("{0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(value: tower_sessions::session::Error) -> Self {
        Self::Session(value.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Repo(err) => repo_status(err),
            },
            Self::Account(err) => match err {
                AccountError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AccountError::UsernameTaken(_) => StatusCode::CONFLICT,
                AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AccountError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AccountError::Repo(err) => repo_status(err),
            },
            Self::Repo(err) => repo_status(err),
            Self::UnknownPostPath(_) => StatusCode::NOT_FOUND,
            Self::Form(rejection) => rejection.status(),
            Self::Db(_) | Self::Render(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn repo_status(err: &RepoError) -> StatusCode {
    match err {
        RepoError::NotFound(_) => StatusCode::NOT_FOUND,
        RepoError::UniqueConstraintViolation { .. } | RepoError::ReferentialIntegrity(_) => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(
                "event=request_failed module=server status=error http_status={} error={}",
                status.as_u16(),
                self
            );
            "Internal server error.".to_string()
        } else {
            self.to_string()
        };

        match views::error_page(status.as_u16(), &message) {
            Ok(page) => (status, Html(page)).into_response(),
            Err(err) => {
                error!(
                    "event=render_error_page module=server status=error http_status={} error={}",
                    status.as_u16(),
                    err
                );
                (status, message).into_response()
            }
        }
    }
}
