//! Domain model for users, posts and request identity.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Validate write inputs before they reach persistence.
//!
//! # Invariants
//! - A post always references exactly one author.
//! - Session identity is never persisted.

pub mod identity;
pub mod post;
pub mod user;

/// Input validation failure for write models.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("username `{0}` must be 1-64 characters of letters, digits, `_`, `.` or `-`")]
    InvalidUsername(String),
    #[error("password must not be empty")]
    EmptyPassword,
}
