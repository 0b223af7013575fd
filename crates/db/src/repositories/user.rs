//! User repository.

use crate::entities::{User, user};
use assembly_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// User repository for database operations.
#[derive(Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a user by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by ID, returning error if not found.
    pub async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<user::Model> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {id}")))
    }

    /// Find a user by access token.
    pub async fn find_by_token<C: ConnectionTrait>(
        &self,
        conn: &C,
        token: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find several users by ID.
    pub async fn find_by_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[String],
    ) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        User::find()
            .filter(user::Column::Id.is_in(ids.iter().cloned()))
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
