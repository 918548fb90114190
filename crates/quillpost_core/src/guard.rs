//! Authorization guard for post mutations.
//!
//! # Responsibility
//! - Turn an absent session identity into a hard `Unauthenticated` stop.
//! - Load a post and enforce that the caller is its author.
//!
//! # Invariants
//! - Every update/delete path goes through [`load_and_authorize_post`] first.
//! - Ownership is `post.author_id == identity.id`, nothing else.

use crate::model::identity::SessionIdentity;
use crate::model::post::{Post, PostId};
use crate::repo::post_repo::PostRepository;
use crate::repo::RepoError;
use log::warn;

/// Authorization failure kinds.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("login required")]
    Unauthenticated,
    #[error("Post id {0} doesn't exist.")]
    NotFound(PostId),
    #[error("Post {post_id} was posted by `{author_username}`, not by the currently logged in user ({username}).")]
    Forbidden {
        post_id: PostId,
        author_username: String,
        username: String,
    },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Returns the caller identity, or `Unauthenticated` for anonymous requests.
pub fn require_login(identity: Option<&SessionIdentity>) -> Result<&SessionIdentity, GuardError> {
    identity.ok_or(GuardError::Unauthenticated)
}

/// Loads post `id` and, when `check_author` is set, requires `identity` to
/// be its author.
///
/// # Errors
/// - `NotFound` when no post has this id.
/// - `Forbidden` when `check_author` is set and the caller is not the author.
pub fn load_and_authorize_post<R: PostRepository + ?Sized>(
    repo: &R,
    id: PostId,
    identity: &SessionIdentity,
    check_author: bool,
) -> Result<Post, GuardError> {
    let post = repo.get_post(id)?.ok_or(GuardError::NotFound(id))?;

    if check_author && !post.is_authored_by(identity.id) {
        warn!(
            "event=post_authorize module=guard status=denied post_id={} author_id={} user_id={}",
            id, post.author_id, identity.id
        );
        return Err(GuardError::Forbidden {
            post_id: id,
            author_username: post.author_username,
            username: identity.username.clone(),
        });
    }

    Ok(post)
}
