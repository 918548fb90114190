//! Core domain logic for Quillpost.
//! This crate is the single source of truth for post ownership and
//! persistence invariants.

pub mod db;
pub mod guard;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use guard::{load_and_authorize_post, require_login, GuardError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::identity::SessionIdentity;
pub use model::post::{NewPost, Post, PostChanges, PostId};
pub use model::user::{User, UserId};
pub use model::ValidationError;
pub use repo::post_repo::{PostListQuery, PostRepository, SqlitePostRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{AccountError, AccountService};
pub use service::post_service::{PostService, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
