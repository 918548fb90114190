//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `username` uniqueness is enforced by the `ix_user_username` index, not
//!   by a prior read.
//! - A rejected duplicate leaves the existing row untouched.

use crate::model::user::{User, UserId};
use crate::repo::error::{constraint_kind, ConstraintKind};
use crate::repo::schema_check::ensure_connection_ready;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, hashed_password FROM user";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a new account. Duplicate usernames fail with
    /// `UniqueConstraintViolation`.
    fn create_user(&self, username: &str, hashed_password: &str) -> RepoResult<User>;
    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["user"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, username: &str, hashed_password: &str) -> RepoResult<User> {
        let inserted = self.conn.execute(
            "INSERT INTO user (username, hashed_password) VALUES (?1, ?2);",
            params![username, hashed_password],
        );
        if let Err(err) = inserted {
            return Err(match constraint_kind(&err) {
                Some(ConstraintKind::Unique) => RepoError::UniqueConstraintViolation {
                    field: "username",
                    value: username.to_string(),
                },
                _ => err.into(),
            });
        }

        Ok(User {
            id: UserId(self.conn.last_insert_rowid()),
            username: username.to_string(),
            hashed_password: hashed_password.to_string(),
        })
    }

    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE username = ?1;"),
                [username],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id.0],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get("id")?),
        username: row.get("username")?,
        hashed_password: row.get("hashed_password")?,
    })
}
