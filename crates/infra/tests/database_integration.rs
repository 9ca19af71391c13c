//! Integration tests for the SQLite repositories.

mod support;

use chrono::{Duration, Utc};
use openslot_core::{GroupRepository, TokenRepository, UserRepository};
use openslot_domain::{OpenSlotError, TokenSet};
use openslot_infra::{SqliteGroupRepository, SqliteTokenRepository, SqliteUserRepository};
use support::TestDatabase;

fn token_set(access_token: &str, refresh_token: Option<&str>) -> TokenSet {
    TokenSet {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
        expires_at: Utc::now() + Duration::hours(1),
        id_token: None,
    }
}

#[tokio::test]
async fn token_roundtrip_registers_the_user() {
    let db = TestDatabase::new();
    let tokens = SqliteTokenRepository::new(db.manager.clone());
    let users = SqliteUserRepository::new(db.manager.clone());

    tokens.put("ada@example.com", &token_set("access-1", Some("refresh-1"))).await.unwrap();

    let stored = tokens.get("ada@example.com").await.unwrap();
    assert_eq!(stored.access_token, "access-1");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));

    // Authorizing registers the user as a side effect.
    assert_eq!(users.list_users().await.unwrap(), ["ada@example.com"]);
}

#[tokio::test]
async fn missing_token_is_not_found() {
    let db = TestDatabase::new();
    let tokens = SqliteTokenRepository::new(db.manager.clone());

    let err = tokens.get("ghost@example.com").await.unwrap_err();
    assert!(matches!(err, OpenSlotError::NotFound(_)));
}

#[tokio::test]
async fn token_upsert_keeps_previous_refresh_token() {
    let db = TestDatabase::new();
    let tokens = SqliteTokenRepository::new(db.manager.clone());

    tokens.put("ada@example.com", &token_set("access-1", Some("refresh-1"))).await.unwrap();
    // Refresh responses omit the refresh token.
    tokens.put("ada@example.com", &token_set("access-2", None)).await.unwrap();

    let stored = tokens.get("ada@example.com").await.unwrap();
    assert_eq!(stored.access_token, "access-2");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn group_membership_is_idempotent() {
    let db = TestDatabase::new();
    let users = SqliteUserRepository::new(db.manager.clone());
    let groups = SqliteGroupRepository::new(db.manager.clone());

    users.add_user("ada@example.com").await.unwrap();
    groups.add_user_to_group("ada@example.com", "compilers").await.unwrap();
    groups.add_user_to_group("ada@example.com", "compilers").await.unwrap();

    assert_eq!(groups.list_groups().await.unwrap(), ["compilers"]);

    let conn = db.manager.get_connection().unwrap();
    let memberships: i64 = conn
        .query_row("SELECT COUNT(*) FROM user_groups", [], |row| row.get(0))
        .unwrap();
    assert_eq!(memberships, 1);
}

#[tokio::test]
async fn membership_requires_a_registered_user() {
    let db = TestDatabase::new();
    let groups = SqliteGroupRepository::new(db.manager.clone());

    let err = groups.add_user_to_group("ghost@example.com", "compilers").await.unwrap_err();
    assert!(matches!(err, OpenSlotError::Database(_)));
}

#[tokio::test]
async fn users_and_groups_list_in_name_order() {
    let db = TestDatabase::new();
    let users = SqliteUserRepository::new(db.manager.clone());
    let groups = SqliteGroupRepository::new(db.manager.clone());

    users.add_user("zoe@example.com").await.unwrap();
    users.add_user("ada@example.com").await.unwrap();
    groups.add_user_to_group("zoe@example.com", "ops").await.unwrap();
    groups.add_user_to_group("ada@example.com", "compilers").await.unwrap();

    assert_eq!(users.list_users().await.unwrap(), ["ada@example.com", "zoe@example.com"]);
    assert_eq!(groups.list_groups().await.unwrap(), ["compilers", "ops"]);
}

#[tokio::test]
async fn health_check_succeeds_on_migrated_database() {
    let db = TestDatabase::new();
    db.manager.health_check().unwrap();
}
