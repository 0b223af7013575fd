//! API integration tests.
//!
//! These drive the router with a mock database behind the services.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use assembly_api::{AppState, auth_middleware, router as api_router};
use assembly_core::{IdentityService, MotionVoteService};
use assembly_db::{
    TransactionCoordinator,
    entities::{
        motion::{self, MotionStatus},
        motion_vote, motion_vote_audit,
        user::{self, LinkType, MembershipType, UserSource},
    },
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
    response::Response,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt;

fn member_row() -> user::Model {
    user::Model {
        id: "u1".to_string(),
        source: UserSource::Account,
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        token: Some("member-token".to_string()),
        membership_type: Some(MembershipType::Individual),
        is_admin: false,
        link_type: None,
        link_event_id: None,
        link_account_user_id: None,
        created_at: Utc::now().into(),
    }
}

fn tellor_row() -> user::Model {
    user::Model {
        id: "t1".to_string(),
        source: UserSource::Link,
        first_name: Some("Tom".to_string()),
        last_name: None,
        token: Some("tellor-token".to_string()),
        membership_type: None,
        is_admin: false,
        link_type: Some(LinkType::Tellor),
        link_event_id: Some("agm".to_string()),
        link_account_user_id: None,
        created_at: Utc::now().into(),
    }
}

fn open_motion() -> motion::Model {
    motion::Model {
        id: "42".to_string(),
        event_id: "agm".to_string(),
        title: "Adopt the accounts".to_string(),
        description: None,
        status: MotionStatus::Open,
        vote_definition: json!({
            "roles": [{ "role": "INDIVIDUAL_VOTER", "voteWeight": 1 }],
            "responses": [
                { "code": "Y", "label": "Yes", "sequence": 1 },
                { "code": "N", "label": "No", "sequence": 2 }
            ],
        }),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn live_vote() -> motion_vote::Model {
    motion_vote::Model {
        id: "v1".to_string(),
        motion_id: "42".to_string(),
        on_behalf_of_user_id: "u1".to_string(),
        submitted_by_user_id: "u1".to_string(),
        response_code: "Y".to_string(),
        votes: 1,
        proxy: false,
        created_at: Utc::now().into(),
    }
}

fn audit_row() -> motion_vote_audit::Model {
    motion_vote_audit::Model {
        id: "a1".to_string(),
        submission_id: "s1".to_string(),
        motion_id: "42".to_string(),
        submitted_by_user_id: "u1".to_string(),
        submitted_by_source: UserSource::Account,
        submitted_by_name: "Ada Lovelace".to_string(),
        on_behalf_of_user_id: "u1".to_string(),
        on_behalf_of_name: "Ada Lovelace".to_string(),
        response_code: "Y".to_string(),
        votes: 1,
        proxy: false,
        superseded: false,
        supersedes: json!([]),
        created_at: Utc::now().into(),
    }
}

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

/// Create the test router over `db`.
fn create_test_router(db: DatabaseConnection) -> Router {
    let db = Arc::new(db);
    let state = AppState {
        motion_vote_service: MotionVoteService::new(TransactionCoordinator::new(Arc::clone(&db))),
        identity_service: IdentityService::new(db),
    };
    api_router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(request("GET", "/motions/42/votes/own", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/i/permissions", Some("stale"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_permissions_endpoint_lists_capabilities() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[tellor_row()]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/i/permissions", Some("tellor-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["userId"], "t1");
    let permissions = body["data"]["permissions"].as_array().unwrap();
    assert!(permissions.contains(&json!("motion-vote:read-all")));
    assert!(!permissions.contains(&json!("motion-vote:write-own")));
    let roles = body["data"]["roles"].as_array().unwrap();
    assert!(roles.contains(&json!("TELLOR_DELEGATE")));
}

#[tokio::test]
async fn test_submit_votes() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[member_row()]])
        .append_query_results([[open_motion()]])
        .append_query_results([Vec::<motion_vote::Model>::new()])
        .append_query_results([Vec::<motion_vote_audit::Model>::new()])
        .append_query_results([Vec::<motion_vote::Model>::new()])
        .append_query_results([[live_vote()]])
        .append_query_results([[audit_row()]])
        .append_exec_results([exec(1), exec(0)])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "PUT",
            "/motions/42/votes/own",
            Some("member-token"),
            Some(r#"{"votes":[{"code":"Y","count":1}]}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let votes = body["data"].as_array().unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0]["responseCode"], "Y");
    assert_eq!(votes[0]["onBehalfOfUserId"], "u1");
    assert_eq!(votes[0]["votes"], 1);
}

#[tokio::test]
async fn test_submit_negative_count_fails_validation() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[member_row()]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "PUT",
            "/motions/42/votes/own",
            Some("member-token"),
            Some(r#"{"votes":[{"code":"Y","count":-3}]}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_submit_unknown_code_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[member_row()]])
        .append_query_results([[open_motion()]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "PUT",
            "/motions/42/votes/own",
            Some("member-token"),
            Some(r#"{"votes":[{"code":"Z","count":1}]}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_missing_motion_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[member_row()]])
        .append_query_results([Vec::<motion::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/motions/404/votes/own", Some("member-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "MOTION_NOT_FOUND");
}

#[tokio::test]
async fn test_member_cannot_read_full_audit() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[member_row()]])
        .append_query_results([[open_motion()]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/motions/42/audit", Some("member-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_reads_own_audit() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[member_row()]])
        .append_query_results([[open_motion()]])
        .append_query_results([[audit_row()]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/motions/42/audit/own", Some("member-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"][0]["submissionId"], "s1");
    assert_eq!(body["data"][0]["submittedBySource"], "account");
    assert_eq!(body["data"][0]["supersedes"], json!([]));
}

#[tokio::test]
async fn test_storage_failure_hides_detail() {
    // The live vote query has no queued result and fails.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[member_row()]])
        .append_query_results([[open_motion()]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/motions/42/votes/own", Some("member-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "STORAGE_ERROR");
    assert_eq!(body["error"]["message"], "Request failed");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(request("GET", "/nonexistent/endpoint", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
