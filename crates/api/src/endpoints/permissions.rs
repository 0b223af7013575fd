//! Caller permission endpoints.

use assembly_common::AppResult;
use assembly_core::Capabilities;
use axum::{Router, extract::State, routing::get};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Roles and permissions of the authenticated user.
async fn my_permissions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Capabilities>> {
    Ok(ApiResponse::ok(state.identity_service.capabilities(&user)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/permissions", get(my_permissions))
}
