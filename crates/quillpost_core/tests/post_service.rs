use quillpost_core::db::open_db_in_memory;
use quillpost_core::{
    PostId, PostService, ServiceError, SessionIdentity, SqlitePostRepository,
    SqliteUserRepository, UserRepository, ValidationError,
};
use rusqlite::Connection;

fn identities(conn: &Connection) -> (SessionIdentity, SessionIdentity) {
    let users = SqliteUserRepository::try_new(conn).unwrap();
    let alice = SessionIdentity::from(&users.create_user("alice", "hash").unwrap());
    let bob = SessionIdentity::from(&users.create_user("bob", "hash").unwrap());
    (alice, bob)
}

#[test]
fn create_uses_session_identity_as_author() {
    let conn = open_db_in_memory().unwrap();
    let (alice, _) = identities(&conn);
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());

    let post = service
        .create_post(Some(&alice), "Hello", Some("world".to_string()))
        .unwrap();
    assert_eq!(post.author_id, alice.id);
    assert_eq!(post.author_username, "alice");

    let feed = service.list_posts(0, None).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, post.id);
}

#[test]
fn anonymous_writes_are_unauthenticated() {
    let conn = open_db_in_memory().unwrap();
    let (alice, _) = identities(&conn);
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let post = service.create_post(Some(&alice), "Hello", None).unwrap();

    assert!(matches!(
        service.create_post(None, "Hi", None),
        Err(ServiceError::Unauthenticated)
    ));
    assert!(matches!(
        service.update_post(None, post.id, "Hi", None),
        Err(ServiceError::Unauthenticated)
    ));
    assert!(matches!(
        service.delete_post(None, post.id),
        Err(ServiceError::Unauthenticated)
    ));
    assert!(service.get_post(post.id).unwrap().is_some());
}

#[test]
fn blank_title_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let (alice, _) = identities(&conn);
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());

    let err = service.create_post(Some(&alice), "  ", None).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptyTitle)
    ));
    assert!(service.list_posts(0, None).unwrap().is_empty());
}

#[test]
fn only_the_author_can_update_or_delete() {
    let conn = open_db_in_memory().unwrap();
    let (alice, bob) = identities(&conn);
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let post = service
        .create_post(Some(&alice), "original", Some("body".to_string()))
        .unwrap();

    let forbidden_edit = service.post_for_edit(Some(&bob), post.id).unwrap_err();
    assert!(matches!(forbidden_edit, ServiceError::Forbidden { .. }));

    let forbidden_update = service
        .update_post(Some(&bob), post.id, "hijacked", None)
        .unwrap_err();
    assert!(matches!(forbidden_update, ServiceError::Forbidden { .. }));

    let forbidden_delete = service.delete_post(Some(&bob), post.id).unwrap_err();
    assert!(matches!(forbidden_delete, ServiceError::Forbidden { .. }));

    let unchanged = service.get_post(post.id).unwrap().unwrap();
    assert_eq!(unchanged.title, "original");

    let updated = service
        .update_post(Some(&alice), post.id, "edited", Some("new body".to_string()))
        .unwrap();
    assert_eq!(updated.title, "edited");
    assert_eq!(updated.body, "new body");
    assert_eq!(updated.created, post.created);
    assert_eq!(updated.author_id, alice.id);

    service.delete_post(Some(&alice), post.id).unwrap();
    assert!(service.get_post(post.id).unwrap().is_none());
}

#[test]
fn missing_posts_are_not_found_for_every_mutation() {
    let conn = open_db_in_memory().unwrap();
    let (alice, _) = identities(&conn);
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let missing = PostId(12345);

    assert!(matches!(
        service.post_for_edit(Some(&alice), missing),
        Err(ServiceError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.update_post(Some(&alice), missing, "title", None),
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_post(Some(&alice), missing),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn second_delete_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let (alice, _) = identities(&conn);
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let post = service.create_post(Some(&alice), "once", None).unwrap();

    service.delete_post(Some(&alice), post.id).unwrap();
    let err = service.delete_post(Some(&alice), post.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == post.id));
}
