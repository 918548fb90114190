//! Post repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `post` table.
//! - Own feed query shape: author join, ordering and pagination.
//!
//! # Invariants
//! - Feed order is `created DESC, id DESC`.
//! - Updates touch `title`/`body` only; `author_id` and `created` are
//!   write-once.
//! - Update/delete re-check existence inside the same immediate transaction.

use crate::model::post::{NewPost, Post, PostChanges, PostId};
use crate::model::user::UserId;
use crate::repo::error::{constraint_kind, ConstraintKind};
use crate::repo::schema_check::ensure_connection_ready;
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const POSTS_DEFAULT_LIMIT: u32 = 100;
const POSTS_LIMIT_MAX: u32 = 100;

const POST_SELECT_SQL: &str = "SELECT
    p.id,
    p.author_id,
    u.username AS author_username,
    p.created,
    p.title,
    p.body
FROM post p
INNER JOIN user u ON u.id = p.author_id";

/// Pagination options for the post feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Number of rows to skip.
    pub offset: u32,
    /// Maximum rows to return. Defaults to 100 and clamps to 100.
    pub limit: Option<u32>,
}

/// Repository interface for post operations.
pub trait PostRepository {
    /// Lists posts newest first, joined with author usernames.
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Point lookup; `None` when no row matches.
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Inserts a post stamped with the current time and returns the stored row.
    fn create_post(&self, input: &NewPost, author_id: UserId) -> RepoResult<Post>;
    /// Replaces title and body of an existing post.
    fn update_post(&self, id: PostId, changes: &PostChanges) -> RepoResult<Post>;
    /// Removes a post. A second delete of the same id fails with `NotFound`.
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["user", "post"])?;
        Ok(Self { conn })
    }

    fn begin_immediate(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let limit = normalize_post_limit(query.limit);
        let mut stmt = self.conn.prepare(&format!(
            "{POST_SELECT_SQL}
             ORDER BY p.created DESC, p.id DESC
             LIMIT ?1 OFFSET ?2;"
        ))?;

        let mut rows = stmt.query(params![i64::from(limit), i64::from(query.offset)])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        select_post(self.conn, id)
    }

    fn create_post(&self, input: &NewPost, author_id: UserId) -> RepoResult<Post> {
        let created = Utc::now().timestamp_millis();
        let tx = self.begin_immediate()?;

        let inserted = tx.execute(
            "INSERT INTO post (author_id, created, title, body)
             VALUES (?1, ?2, ?3, ?4);",
            params![author_id.0, created, input.title.as_str(), input.body.as_str()],
        );
        if let Err(err) = inserted {
            return Err(match constraint_kind(&err) {
                Some(ConstraintKind::ForeignKey) => RepoError::ReferentialIntegrity(author_id),
                _ => err.into(),
            });
        }

        let id = PostId(tx.last_insert_rowid());
        let post = select_post(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("post {id} missing right after insert"))
        })?;
        tx.commit()?;
        Ok(post)
    }

    fn update_post(&self, id: PostId, changes: &PostChanges) -> RepoResult<Post> {
        let tx = self.begin_immediate()?;
        if !post_exists_in_tx(&tx, id)? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "UPDATE post
             SET
                title = ?2,
                body = ?3
             WHERE id = ?1;",
            params![id.0, changes.title.as_str(), changes.body.as_str()],
        )?;

        let post = select_post(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        tx.commit()?;
        Ok(post)
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let tx = self.begin_immediate()?;
        if !post_exists_in_tx(&tx, id)? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute("DELETE FROM post WHERE id = ?1;", [id.0])?;
        tx.commit()?;
        Ok(())
    }
}

/// Normalizes feed page size according to the listing contract.
pub fn normalize_post_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => POSTS_DEFAULT_LIMIT,
        Some(value) if value > POSTS_LIMIT_MAX => POSTS_LIMIT_MAX,
        Some(value) => value,
    }
}

fn select_post(conn: &Connection, id: PostId) -> RepoResult<Option<Post>> {
    let mut stmt = conn.prepare(&format!("{POST_SELECT_SQL} WHERE p.id = ?1;"))?;
    let mut rows = stmt.query([id.0])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_post_row(row)?));
    }
    Ok(None)
}

fn post_exists_in_tx(tx: &Transaction<'_>, id: PostId) -> RepoResult<bool> {
    let found = tx
        .query_row("SELECT 1 FROM post WHERE id = ?1;", [id.0], |row| {
            row.get::<_, i64>(0)
        })
        .optional()?;
    Ok(found.is_some())
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id = PostId(row.get("id")?);
    let created_ms: i64 = row.get("created")?;
    let created = DateTime::<Utc>::from_timestamp_millis(created_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid created value `{created_ms}` in post {id}"
        ))
    })?;

    Ok(Post {
        id,
        author_id: UserId(row.get("author_id")?),
        author_username: row.get("author_username")?,
        created,
        title: row.get("title")?,
        body: row.get("body")?,
    })
}
