//! Post feed and ownership-checked post mutations.
//!
//! Every write handler is a linear chain: require a session identity, decode
//! the request, call the post service (validation and the ownership guard),
//! then render or redirect to the index. The identity check comes first so
//! an anonymous caller always gets 401, whatever the body looks like.

use crate::error::AppError;
use crate::routes::found;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::views;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use quillpost_core::{
    require_login, PostId, PostService, ServiceError, SessionIdentity, SqlitePostRepository,
};
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/create", get(create_page).post(create_post))
        .route("/:id/update", get(update_page).post(update_post))
        .route("/:id/delete", post(delete_post))
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    offset: u32,
    limit: Option<u32>,
}

/// Post form body. `title` is optional here so that a missing field and a
/// blank one fail the same validation.
#[derive(Debug, Deserialize)]
pub struct PostForm {
    title: Option<String>,
    body: Option<String>,
}

type PostFormResult = Result<Form<PostForm>, FormRejection>;

/// Show all the posts, most recent first. A malformed query string falls
/// back to the first page.
async fn index(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Option<Query<FeedQuery>>,
) -> Result<Html<String>, AppError> {
    let FeedQuery { offset, limit } = query.map(|Query(query)| query).unwrap_or_default();
    let posts = state
        .with_conn(move |conn| {
            PostService::new(SqlitePostRepository::try_new(conn)?).list_posts(offset, limit)
        })
        .await?;
    Ok(Html(views::index(&posts, user.identity())?))
}

async fn create_page(user: CurrentUser) -> Result<Html<String>, AppError> {
    logged_in(&user)?;
    Ok(Html(views::create_form()?))
}

async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    form: PostFormResult,
) -> Result<Response, AppError> {
    let identity = logged_in(&user)?;
    let Form(form) = form?;
    state
        .with_conn(move |conn| {
            PostService::new(SqlitePostRepository::try_new(conn)?).create_post(
                Some(&identity),
                form.title.unwrap_or_default(),
                form.body,
            )
        })
        .await?;
    Ok(found("/"))
}

async fn update_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let identity = logged_in(&user)?;
    let id = parse_post_id(&raw_id)?;
    let post = state
        .with_conn(move |conn| {
            PostService::new(SqlitePostRepository::try_new(conn)?)
                .post_for_edit(Some(&identity), id)
        })
        .await?;
    Ok(Html(views::update_form(&post)?))
}

async fn update_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
    form: PostFormResult,
) -> Result<Response, AppError> {
    let identity = logged_in(&user)?;
    let id = parse_post_id(&raw_id)?;
    let Form(form) = form?;
    state
        .with_conn(move |conn| {
            PostService::new(SqlitePostRepository::try_new(conn)?).update_post(
                Some(&identity),
                id,
                form.title.unwrap_or_default(),
                form.body,
            )
        })
        .await?;
    Ok(found("/"))
}

async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let identity = logged_in(&user)?;
    let id = parse_post_id(&raw_id)?;
    state
        .with_conn(move |conn| {
            PostService::new(SqlitePostRepository::try_new(conn)?)
                .delete_post(Some(&identity), id)
        })
        .await?;
    Ok(found("/"))
}

fn logged_in(user: &CurrentUser) -> Result<SessionIdentity, AppError> {
    Ok(require_login(user.identity())
        .map_err(ServiceError::from)?
        .clone())
}

/// A segment that is not an integer cannot name a post, so it is a 404.
fn parse_post_id(raw: &str) -> Result<PostId, AppError> {
    raw.parse::<i64>()
        .map(PostId)
        .map_err(|_| AppError::UnknownPostPath(raw.to_string()))
}
