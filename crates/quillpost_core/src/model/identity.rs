//! Per-request caller identity.

use crate::model::user::{User, UserId};
use serde::{Deserialize, Serialize};

/// Authenticated caller attached to one request after login.
///
/// Stored in the session cookie store by the HTTP layer; `None` at call
/// sites means the request is anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: UserId,
    pub username: String,
}

impl SessionIdentity {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

impl From<&User> for SessionIdentity {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone())
    }
}
