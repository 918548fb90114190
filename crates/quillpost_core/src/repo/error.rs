//! Repository error taxonomy and SQLite constraint classification.

use crate::db::DbError;
use crate::model::post::PostId;
use crate::model::user::UserId;
use rusqlite::ffi;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure surfaced by repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("post not found: {0}")]
    NotFound(PostId),
    #[error("{field} `{value}` already exists")]
    UniqueConstraintViolation { field: &'static str, value: String },
    #[error("referenced user {0} does not exist")]
    ReferentialIntegrity(UserId),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error(
        "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Constraint family reported by SQLite for a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// Returns which constraint, if any, rejected a write.
pub(crate) fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Some(ConstraintKind::Unique)
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
                _ => None,
            }
        }
        _ => None,
    }
}
