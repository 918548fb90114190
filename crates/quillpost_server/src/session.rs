//! Session identity extraction.
//!
//! The logged in user is stored under [`SESSION_USER_KEY`] in a
//! `tower-sessions` session. Handlers receive it as an explicit
//! [`CurrentUser`] argument; `CurrentUser(None)` is an anonymous request.

use crate::error::AppError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use log::warn;
use quillpost_core::{AccountService, SessionIdentity, SqliteUserRepository};
use tower_sessions::Session;

/// Session key holding the serialized [`SessionIdentity`].
pub const SESSION_USER_KEY: &str = "user";

/// Identity of the caller, if logged in.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionIdentity>);

impl CurrentUser {
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Session(format!("{rejection:?}")))?;

        let Some(identity) = session.get::<SessionIdentity>(SESSION_USER_KEY).await? else {
            return Ok(Self(None));
        };

        // Sessions outlive store resets; drop identities whose user is gone.
        let user_id = identity.id;
        let user = AppState::from_ref(state)
            .with_conn(move |conn| {
                AccountService::new(SqliteUserRepository::try_new(conn)?).find_user(user_id)
            })
            .await?;
        if user.is_none() {
            warn!(
                "event=session_resolve module=server status=stale user_id={}",
                user_id
            );
            session.flush().await?;
            return Ok(Self(None));
        }

        Ok(Self(Some(identity)))
    }
}

/// Stores `identity` in the session and rotates the session id.
pub async fn log_in(session: &Session, identity: &SessionIdentity) -> Result<(), AppError> {
    session.insert(SESSION_USER_KEY, identity).await?;
    session.cycle_id().await?;
    Ok(())
}

/// Clears every value in the session and deletes it from the store.
pub async fn log_out(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}
