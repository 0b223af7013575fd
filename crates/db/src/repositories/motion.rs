//! Motion repository.

use crate::entities::{Motion, motion};
use assembly_common::{AppError, AppResult};
use sea_orm::{ConnectionTrait, EntityTrait};

/// Motion repository for database operations.
#[derive(Clone, Default)]
pub struct MotionRepository;

impl MotionRepository {
    /// Create a new motion repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a motion by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<motion::Model>> {
        Motion::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a motion by ID, returning error if not found.
    pub async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<motion::Model> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::MotionNotFound(id.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::motion::MotionStatus;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    fn create_test_motion(id: &str, event_id: &str) -> motion::Model {
        motion::Model {
            id: id.to_string(),
            event_id: event_id.to_string(),
            title: "Adopt the annual report".to_string(),
            description: None,
            status: MotionStatus::Open,
            vote_definition: json!({
                "roles": [{ "role": "INDIVIDUAL_VOTER", "voteWeight": 1 }],
                "responses": [{ "code": "Y", "label": "Yes", "sequence": 1 }]
            }),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let motion = create_test_motion("42", "agm");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[motion.clone()]])
            .into_connection();

        let repo = MotionRepository::new();
        let result = repo.get_by_id(&db, "42").await.unwrap();

        assert_eq!(result.event_id, "agm");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<motion::Model>::new()])
            .into_connection();

        let repo = MotionRepository::new();
        let result = repo.get_by_id(&db, "404").await;

        match result {
            Err(AppError::MotionNotFound(id)) => assert_eq!(id, "404"),
            other => panic!("Expected MotionNotFound, got {other:?}"),
        }
    }
}
