//! HTTP routes.

pub mod auth;
pub mod blog;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// `302 Found` redirect, the status every successful form POST answers with.
pub(crate) fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
