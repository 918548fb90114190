//! Page rendering. Markup lives in `templates/`; askama escapes every
//! interpolated value.

use askama::Template;
use quillpost_core::{Post, PostId, SessionIdentity};

struct FeedEntry<'a> {
    post: &'a Post,
    editable: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    username: Option<&'a str>,
    entries: Vec<FeedEntry<'a>>,
}

#[derive(Template)]
#[template(path = "create.html")]
struct CreatePage<'a> {
    post_title: &'a str,
    post_body: &'a str,
}

#[derive(Template)]
#[template(path = "update.html")]
struct UpdatePage<'a> {
    post_id: PostId,
    post_title: &'a str,
    post_body: &'a str,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterPage;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage;

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    status: u16,
    message: &'a str,
}

/// The feed. Edit links are shown only on the viewer's own posts.
pub fn index(posts: &[Post], identity: Option<&SessionIdentity>) -> askama::Result<String> {
    let entries = posts
        .iter()
        .map(|post| FeedEntry {
            post,
            editable: identity.is_some_and(|identity| post.is_authored_by(identity.id)),
        })
        .collect();
    IndexPage {
        username: identity.map(|identity| identity.username.as_str()),
        entries,
    }
    .render()
}

pub fn create_form() -> askama::Result<String> {
    CreatePage {
        post_title: "",
        post_body: "",
    }
    .render()
}

pub fn update_form(post: &Post) -> askama::Result<String> {
    UpdatePage {
        post_id: post.id,
        post_title: &post.title,
        post_body: &post.body,
    }
    .render()
}

pub fn register_form() -> askama::Result<String> {
    RegisterPage.render()
}

pub fn login_form() -> askama::Result<String> {
    LoginPage.render()
}

pub fn error_page(status: u16, message: &str) -> askama::Result<String> {
    ErrorPage { status, message }.render()
}
