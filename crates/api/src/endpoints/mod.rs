//! API endpoints.

mod motion_votes;
mod permissions;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/motions", motion_votes::router())
        .nest("/i", permissions::router())
}
