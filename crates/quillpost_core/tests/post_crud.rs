use chrono::Utc;
use quillpost_core::db::migrations::latest_version;
use quillpost_core::db::open_db_in_memory;
use quillpost_core::{
    NewPost, PostChanges, PostId, PostListQuery, PostRepository, RepoError, SqlitePostRepository,
    SqliteUserRepository, User, UserId, UserRepository,
};
use rusqlite::{params, Connection};

fn seed_user(conn: &Connection, username: &str) -> User {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(username, "hash")
        .unwrap()
}

fn new_post(title: &str, body: &str) -> NewPost {
    NewPost::new(title, Some(body.to_string())).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "alice");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let before = Utc::now();
    let created = repo
        .create_post(&new_post("First", "hello world"), author.id)
        .unwrap();

    let loaded = repo.get_post(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.title, "First");
    assert_eq!(loaded.body, "hello world");
    assert_eq!(loaded.author_id, author.id);
    assert_eq!(loaded.author_username, "alice");
    assert!(loaded.created <= Utc::now());
    assert!(loaded.created.timestamp_millis() >= before.timestamp_millis());
}

#[test]
fn create_defaults_body_to_empty_string() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "alice");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let input = NewPost::new("No body", None).unwrap();
    let created = repo.create_post(&input, author.id).unwrap();
    assert_eq!(created.body, "");
}

#[test]
fn create_with_unknown_author_fails_referential_integrity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let err = repo
        .create_post(&new_post("Orphan", ""), UserId(4242))
        .unwrap_err();
    assert!(matches!(err, RepoError::ReferentialIntegrity(UserId(4242))));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM post;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn get_missing_post_is_absent_not_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    assert!(repo.get_post(PostId(1)).unwrap().is_none());
}

#[test]
fn list_is_newest_first_with_author_usernames() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let oldest = repo.create_post(&new_post("oldest", ""), alice.id).unwrap();
    let middle = repo.create_post(&new_post("middle", ""), bob.id).unwrap();
    let newest = repo.create_post(&new_post("newest", ""), alice.id).unwrap();

    set_created(&conn, oldest.id, 1_000);
    set_created(&conn, middle.id, 2_000);
    set_created(&conn, newest.id, 3_000);

    let posts = repo.list_posts(&PostListQuery::default()).unwrap();
    let ids: Vec<_> = posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
    assert_eq!(posts[1].author_username, "bob");
    for pair in posts.windows(2) {
        assert!(pair[0].created >= pair[1].created);
    }
}

#[test]
fn list_breaks_created_ties_by_newest_id() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let first = repo.create_post(&new_post("a", ""), alice.id).unwrap();
    let second = repo.create_post(&new_post("b", ""), alice.id).unwrap();
    conn.execute("UPDATE post SET created = 1234567890000;", [])
        .unwrap();

    let posts = repo.list_posts(&PostListQuery::default()).unwrap();
    assert_eq!(posts[0].id, second.id);
    assert_eq!(posts[1].id, first.id);
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    assert!(repo.list_posts(&PostListQuery::default()).unwrap().is_empty());
}

#[test]
fn list_pagination_with_limit_and_offset() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let mut ids = Vec::new();
    for (index, title) in ["p1", "p2", "p3", "p4"].iter().enumerate() {
        let post = repo.create_post(&new_post(title, ""), alice.id).unwrap();
        set_created(&conn, post.id, 1_000 * (index as i64 + 1));
        ids.push(post.id);
    }

    let page = repo
        .list_posts(&PostListQuery {
            offset: 1,
            limit: Some(2),
        })
        .unwrap();
    let page_ids: Vec<_> = page.iter().map(|post| post.id).collect();
    assert_eq!(page_ids, vec![ids[2], ids[1]]);

    let tail = repo
        .list_posts(&PostListQuery {
            offset: 3,
            limit: None,
        })
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, ids[0]);
}

#[test]
fn update_changes_title_and_body_only() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let created = repo.create_post(&new_post("draft", "v1"), alice.id).unwrap();
    let changes = PostChanges::new("final", Some("v2".to_string())).unwrap();
    let updated = repo.update_post(created.id, &changes).unwrap();

    let loaded = repo.get_post(created.id).unwrap().unwrap();
    assert_eq!(loaded, updated);
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.body, "v2");
    assert_eq!(loaded.author_id, created.author_id);
    assert_eq!(loaded.created, created.created);
}

#[test]
fn update_missing_post_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let changes = PostChanges::new("title", None).unwrap();
    let err = repo.update_post(PostId(77), &changes).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(PostId(77))));
}

#[test]
fn delete_removes_row_and_is_not_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let created = repo.create_post(&new_post("bye", ""), alice.id).unwrap();
    repo.delete_post(created.id).unwrap();

    assert!(repo.get_post(created.id).unwrap().is_none());
    let err = repo.delete_post(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn deleted_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let first = repo.create_post(&new_post("one", ""), alice.id).unwrap();
    repo.delete_post(first.id).unwrap();
    let second = repo.create_post(&new_post("two", ""), alice.id).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn store_rejects_blank_titles_written_around_validation() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");

    let result = conn.execute(
        "INSERT INTO post (author_id, created, title, body) VALUES (?1, 0, '  ', '');",
        params![alice.id.0],
    );
    assert!(result.is_err());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqlitePostRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePostRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("user"))));
}

fn set_created(conn: &Connection, id: PostId, created_ms: i64) {
    conn.execute(
        "UPDATE post SET created = ?2 WHERE id = ?1;",
        params![id.0, created_ms],
    )
    .unwrap();
}
