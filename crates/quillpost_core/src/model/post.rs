//! Blog post model.
//!
//! # Responsibility
//! - Define the post read model shown in feeds and edit forms.
//! - Define validated write inputs for create/update use-cases.
//!
//! # Invariants
//! - `title` is non-empty after trimming on every write path.
//! - `created` is fixed at insert and never rewritten.
//! - `author_id` is fixed at insert and never rewritten.

use crate::model::user::UserId;
use crate::model::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Generated primary key of a post row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    /// Username of `author_id`, resolved at read time.
    pub author_username: String,
    pub created: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Direct ownership comparison used by the authorization guard.
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

impl NewPost {
    /// Builds a create input; a missing body becomes the empty string.
    pub fn new(title: impl Into<String>, body: Option<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            title,
            body: body.unwrap_or_default(),
        })
    }
}

/// Validated replacement values for an existing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub body: String,
}

impl PostChanges {
    pub fn new(title: impl Into<String>, body: Option<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            title,
            body: body.unwrap_or_default(),
        })
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}
