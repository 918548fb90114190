//! Registration, login and logout.

use crate::error::AppError;
use crate::routes::found;
use crate::session;
use crate::state::AppState;
use crate::views;
use axum::extract::State;
use axum::response::{Html, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use quillpost_core::{AccountService, SqliteUserRepository};
use serde::Deserialize;
use tower_sessions::Session;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", get(register_page).post(register))
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn register_page() -> Result<Html<String>, AppError> {
    Ok(Html(views::register_form()?))
}

async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    state
        .with_conn(move |conn| {
            AccountService::new(SqliteUserRepository::try_new(conn)?)
                .register(form.username.trim(), &form.password)
        })
        .await?;
    Ok(found("/auth/login"))
}

async fn login_page() -> Result<Html<String>, AppError> {
    Ok(Html(views::login_form()?))
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let identity = state
        .with_conn(move |conn| {
            AccountService::new(SqliteUserRepository::try_new(conn)?)
                .login(form.username.trim(), &form.password)
        })
        .await?;
    session::log_in(&session, &identity).await?;
    Ok(found("/"))
}

async fn logout(session: Session) -> Result<Response, AppError> {
    session::log_out(&session).await?;
    Ok(found("/"))
}
