//! Post use-case service.
//!
//! # Responsibility
//! - Run the login -> validate -> authorize -> mutate chain for post writes.
//! - Expose the public feed and point lookups unchanged.
//!
//! # Invariants
//! - No mutation reaches the repository without passing the guard.
//! - The author of a new post is always the session identity.

use crate::guard::{load_and_authorize_post, require_login, GuardError};
use crate::model::identity::SessionIdentity;
use crate::model::post::{NewPost, Post, PostChanges, PostId};
use crate::model::ValidationError;
use crate::repo::post_repo::{PostListQuery, PostRepository};
use crate::repo::RepoError;
use log::info;

/// Service error for post use-cases.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
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
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<GuardError> for ServiceError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::Unauthenticated => Self::Unauthenticated,
            GuardError::NotFound(id) => Self::NotFound(id),
            GuardError::Forbidden {
                post_id,
                author_username,
                username,
            } => Self::Forbidden {
                post_id,
                author_username,
                username,
            },
            GuardError::Repo(err) => err.into(),
        }
    }
}

/// Post service facade over repository implementations.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the public feed, newest first. Needs no identity.
    pub fn list_posts(&self, offset: u32, limit: Option<u32>) -> Result<Vec<Post>, ServiceError> {
        Ok(self.repo.list_posts(&PostListQuery { offset, limit })?)
    }

    /// Gets one post without any authorization check.
    pub fn get_post(&self, id: PostId) -> Result<Option<Post>, ServiceError> {
        Ok(self.repo.get_post(id)?)
    }

    /// Creates a post authored by the logged in caller.
    pub fn create_post(
        &self,
        identity: Option<&SessionIdentity>,
        title: impl Into<String>,
        body: Option<String>,
    ) -> Result<Post, ServiceError> {
        let identity = require_login(identity)?;
        let input = NewPost::new(title, body)?;
        let post = self.repo.create_post(&input, identity.id)?;
        info!(
            "event=post_create module=service status=ok post_id={} author_id={}",
            post.id, post.author_id
        );
        Ok(post)
    }

    /// Loads a post for its edit form; only the author may open it.
    pub fn post_for_edit(
        &self,
        identity: Option<&SessionIdentity>,
        id: PostId,
    ) -> Result<Post, ServiceError> {
        let identity = require_login(identity)?;
        Ok(load_and_authorize_post(&self.repo, id, identity, true)?)
    }

    /// Replaces title/body of a post owned by the caller.
    pub fn update_post(
        &self,
        identity: Option<&SessionIdentity>,
        id: PostId,
        title: impl Into<String>,
        body: Option<String>,
    ) -> Result<Post, ServiceError> {
        let identity = require_login(identity)?;
        let changes = PostChanges::new(title, body)?;
        load_and_authorize_post(&self.repo, id, identity, true)?;
        let post = self.repo.update_post(id, &changes)?;
        info!(
            "event=post_update module=service status=ok post_id={} author_id={}",
            post.id, post.author_id
        );
        Ok(post)
    }

    /// Deletes a post owned by the caller.
    pub fn delete_post(
        &self,
        identity: Option<&SessionIdentity>,
        id: PostId,
    ) -> Result<(), ServiceError> {
        let identity = require_login(identity)?;
        load_and_authorize_post(&self.repo, id, identity, true)?;
        self.repo.delete_post(id)?;
        info!(
            "event=post_delete module=service status=ok post_id={} user_id={}",
            id, identity.id
        );
        Ok(())
    }
}
