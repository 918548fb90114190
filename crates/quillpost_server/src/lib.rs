//! HTTP surface of the quillpost blog.
//!
//! # Responsibility
//! - Map browser forms onto the post and account services.
//! - Keep the logged in identity in a cookie-backed session.
//!
//! # Invariants
//! - Handlers never touch SQL directly; all store work goes through
//!   [`AppState::with_conn`].

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use config::Settings;
pub use error::AppError;
pub use state::AppState;

use axum::Router;
use tower_sessions::{MemoryStore, SessionManagerLayer};

/// Builds the full router: blog routes, account routes and the session layer.
pub fn app(state: AppState, secure_cookies: bool) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default()).with_secure(secure_cookies);

    Router::new()
        .merge(routes::blog::routes())
        .merge(routes::auth::routes())
        .with_state(state)
        .layer(sessions)
}
