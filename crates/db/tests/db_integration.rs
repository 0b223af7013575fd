//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `assembly_test`)
//!   `TEST_DB_PASSWORD` (default: `assembly_test`)
//!   `TEST_DB_NAME` (default: `assembly_test`)

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use assembly_common::AppError;
use assembly_db::{
    TransactionCoordinator,
    repositories::{MotionVoteRepository, NewMotionVote},
    test_utils::{TestDatabase, TestDbConfig},
};
use sea_orm::ConnectionTrait;

async fn seeded() -> TestDatabase {
    let db = TestDatabase::create_unique().await.expect("Failed to create test database");
    db.execute(
        "INSERT INTO \"user\" (id, source, first_name, membership_type) \
         VALUES ('u1', 'account', 'Ada', 'individual')",
    )
    .await
    .unwrap();
    db.execute(
        "INSERT INTO event (id, name, starts_at, ends_at) \
         VALUES ('agm', 'AGM', now(), now() + interval '1 day')",
    )
    .await
    .unwrap();
    db.execute(
        "INSERT INTO motion (id, event_id, title, status, vote_definition) \
         VALUES ('42', 'agm', 'Accounts', 'open', '{\"roles\":[],\"responses\":[]}')",
    )
    .await
    .unwrap();
    db
}

fn vote(code: &str) -> NewMotionVote {
    NewMotionVote {
        motion_id: "42".to_string(),
        on_behalf_of_user_id: "u1".to_string(),
        submitted_by_user_id: "u1".to_string(),
        response_code: code.to_string(),
        votes: 1,
        proxy: false,
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply() {
    let db = TestDatabase::create_unique().await.expect("Failed to create test database");

    let result = db
        .connection()
        .execute(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT count(*) FROM motion_vote_audit".to_string(),
        ))
        .await;
    assert!(result.is_ok(), "Query failed: {:?}", result.err());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_unique_live_vote_per_code() {
    let db = seeded().await;
    let repo = MotionVoteRepository::new();
    let allowed: BTreeSet<String> = ["Y".to_string()].into();

    repo.create(db.connection(), &allowed, vote("Y")).await.unwrap();
    let second = repo.create(db.connection(), &allowed, vote("Y")).await;
    assert!(matches!(second, Err(AppError::Validation(_))));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_rolled_back_unit_leaves_no_rows() {
    let db = seeded().await;
    let coordinator = TransactionCoordinator::new(db.shared_connection().await.unwrap());
    let repo = MotionVoteRepository::new();
    let allowed: BTreeSet<String> = ["Y".to_string()].into();

    let result: Result<(), AppError> = coordinator
        .run(move |txn| {
            Box::pin(async move {
                repo.create(txn, &allowed, vote("Y")).await?;
                Err(AppError::BadRequest("abandon".to_string()))
            })
        })
        .await;
    assert!(result.is_err());

    let live = MotionVoteRepository::new()
        .find_by_on_behalf_user(db.connection(), "42", "u1")
        .await
        .unwrap();
    assert!(live.is_empty());

    drop(coordinator);
    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.ends_with("/postgres"));
}
