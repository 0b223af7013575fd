//! Motion vote endpoints.

use assembly_common::AppResult;
use assembly_core::{Tally, VoteCount};
use assembly_db::entities::{motion_vote, motion_vote_audit, user::UserSource};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// One response code and its count.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoteInput {
    #[validate(length(min = 1, max = 32))]
    pub code: String,

    #[validate(range(min = 0, max = 1_000_000))]
    pub count: i32,
}

/// Submit votes request. The list replaces every live vote of the caller.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVotesRequest {
    #[validate(length(max = 100), nested)]
    pub votes: Vec<VoteInput>,
}

/// Live vote response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: String,
    pub motion_id: String,
    pub on_behalf_of_user_id: String,
    pub submitted_by_user_id: String,
    pub response_code: String,
    pub votes: i32,
    pub proxy: bool,
    pub created_at: String,
}

impl From<motion_vote::Model> for VoteResponse {
    fn from(vote: motion_vote::Model) -> Self {
        Self {
            id: vote.id,
            motion_id: vote.motion_id,
            on_behalf_of_user_id: vote.on_behalf_of_user_id,
            submitted_by_user_id: vote.submitted_by_user_id,
            response_code: vote.response_code,
            votes: vote.votes,
            proxy: vote.proxy,
            created_at: vote.created_at.to_rfc3339(),
        }
    }
}

/// Audit row response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub id: String,
    pub submission_id: String,
    pub motion_id: String,
    pub submitted_by_user_id: String,
    pub submitted_by_source: UserSource,
    pub submitted_by_name: String,
    pub on_behalf_of_user_id: String,
    pub on_behalf_of_name: String,
    pub response_code: String,
    pub votes: i32,
    pub proxy: bool,
    pub superseded: bool,
    pub supersedes: Vec<String>,
    pub created_at: String,
}

impl From<motion_vote_audit::Model> for AuditResponse {
    fn from(row: motion_vote_audit::Model) -> Self {
        let supersedes = row.supersedes_ids();
        Self {
            id: row.id,
            submission_id: row.submission_id,
            motion_id: row.motion_id,
            submitted_by_user_id: row.submitted_by_user_id,
            submitted_by_source: row.submitted_by_source,
            submitted_by_name: row.submitted_by_name,
            on_behalf_of_user_id: row.on_behalf_of_user_id,
            on_behalf_of_name: row.on_behalf_of_name,
            response_code: row.response_code,
            votes: row.votes,
            proxy: row.proxy,
            superseded: row.superseded,
            supersedes,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

fn votes_response(votes: Vec<motion_vote::Model>) -> ApiResponse<Vec<VoteResponse>> {
    ApiResponse::ok(votes.into_iter().map(VoteResponse::from).collect())
}

fn audit_response(rows: Vec<motion_vote_audit::Model>) -> ApiResponse<Vec<AuditResponse>> {
    ApiResponse::ok(rows.into_iter().map(AuditResponse::from).collect())
}

/// Get the caller's live votes.
async fn get_own_votes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(motion_id): Path<String>,
) -> AppResult<ApiResponse<Vec<VoteResponse>>> {
    let votes = state
        .motion_vote_service
        .get_own_votes(&user, &motion_id)
        .await?;
    Ok(votes_response(votes))
}

/// Replace the caller's votes.
async fn submit_own_votes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(motion_id): Path<String>,
    Json(req): Json<SubmitVotesRequest>,
) -> AppResult<ApiResponse<Vec<VoteResponse>>> {
    req.validate()?;

    let raw_votes = req
        .votes
        .into_iter()
        .map(|vote| VoteCount::new(vote.code, vote.count))
        .collect();

    let votes = state
        .motion_vote_service
        .submit_own_votes(&user, &motion_id, raw_votes)
        .await?;
    Ok(votes_response(votes))
}

/// Get every live vote on a motion.
async fn get_votes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(motion_id): Path<String>,
) -> AppResult<ApiResponse<Vec<VoteResponse>>> {
    let votes = state
        .motion_vote_service
        .get_votes_for_motion(&user, &motion_id)
        .await?;
    Ok(votes_response(votes))
}

async fn get_tally(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(motion_id): Path<String>,
) -> AppResult<ApiResponse<Tally>> {
    let tally = state.motion_vote_service.tally(&user, &motion_id).await?;
    Ok(ApiResponse::ok(tally))
}

/// Get the audit history of a motion.
async fn get_audit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(motion_id): Path<String>,
) -> AppResult<ApiResponse<Vec<AuditResponse>>> {
    let rows = state
        .motion_vote_service
        .get_audit_for_motion(&user, &motion_id)
        .await?;
    Ok(audit_response(rows))
}

/// Get the audit history of the caller's votes.
async fn get_own_audit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(motion_id): Path<String>,
) -> AppResult<ApiResponse<Vec<AuditResponse>>> {
    let rows = state
        .motion_vote_service
        .get_own_audit(&user, &motion_id)
        .await?;
    Ok(audit_response(rows))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{motion_id}/votes/own",
            get(get_own_votes).put(submit_own_votes),
        )
        .route("/{motion_id}/votes", get(get_votes))
        .route("/{motion_id}/votes/tally", get(get_tally))
        .route("/{motion_id}/audit", get(get_audit))
        .route("/{motion_id}/audit/own", get(get_own_audit))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_accepts_empty_list() {
        let req: SubmitVotesRequest = serde_json::from_str(r#"{"votes":[]}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_submit_request_rejects_negative_count() {
        let req: SubmitVotesRequest =
            serde_json::from_str(r#"{"votes":[{"code":"Y","count":-1}]}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_submit_request_rejects_empty_code() {
        let req: SubmitVotesRequest =
            serde_json::from_str(r#"{"votes":[{"code":"","count":1}]}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_submit_request_reports_nested_vote_errors() {
        let req: SubmitVotesRequest = serde_json::from_str(
            r#"{"votes":[{"code":"Y","count":1},{"code":"N","count":2000000}]}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("votes"));
    }

    #[test]
    fn test_submit_request_rejects_too_many_entries() {
        let votes: Vec<String> = (0..101)
            .map(|i| format!(r#"{{"code":"C{i}","count":1}}"#))
            .collect();
        let body = format!(r#"{{"votes":[{}]}}"#, votes.join(","));
        let req: SubmitVotesRequest = serde_json::from_str(&body).unwrap();
        assert!(req.validate().is_err());
    }
}
