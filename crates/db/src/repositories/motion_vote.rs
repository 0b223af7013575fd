//! Motion vote repository (live votes).

use std::collections::BTreeSet;

use crate::entities::{MotionVote, motion_vote};
use assembly_common::{AppError, AppResult, IdGenerator};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement,
};

/// A live vote ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMotionVote {
    pub motion_id: String,
    pub on_behalf_of_user_id: String,
    pub submitted_by_user_id: String,
    pub response_code: String,
    pub votes: i32,
    pub proxy: bool,
}

/// Motion vote repository for database operations.
#[derive(Clone, Default)]
pub struct MotionVoteRepository {
    id_gen: IdGenerator,
}

impl MotionVoteRepository {
    /// Create a new motion vote repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
        }
    }

    /// All live votes for a motion.
    pub async fn find_by_motion<C: ConnectionTrait>(
        &self,
        conn: &C,
        motion_id: &str,
    ) -> AppResult<Vec<motion_vote::Model>> {
        MotionVote::find()
            .filter(motion_vote::Column::MotionId.eq(motion_id))
            .order_by_asc(motion_vote::Column::OnBehalfOfUserId)
            .order_by_asc(motion_vote::Column::ResponseCode)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Live votes cast on behalf of one user.
    pub async fn find_by_on_behalf_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        motion_id: &str,
        on_behalf_of_user_id: &str,
    ) -> AppResult<Vec<motion_vote::Model>> {
        MotionVote::find()
            .filter(motion_vote::Column::MotionId.eq(motion_id))
            .filter(motion_vote::Column::OnBehalfOfUserId.eq(on_behalf_of_user_id))
            .order_by_asc(motion_vote::Column::ResponseCode)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a live vote.
    ///
    /// Fails with a validation error when the response code is not one of
    /// `allowed_codes`, or when a live row already exists for the same
    /// (motion, on-behalf-of user, response code).
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        allowed_codes: &BTreeSet<String>,
        vote: NewMotionVote,
    ) -> AppResult<motion_vote::Model> {
        if !allowed_codes.contains(&vote.response_code) {
            return Err(AppError::Validation(format!(
                "Unknown response code for motion {}: {}",
                vote.motion_id, vote.response_code
            )));
        }

        let existing = MotionVote::find()
            .filter(motion_vote::Column::MotionId.eq(&vote.motion_id))
            .filter(motion_vote::Column::OnBehalfOfUserId.eq(&vote.on_behalf_of_user_id))
            .filter(motion_vote::Column::ResponseCode.eq(&vote.response_code))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(AppError::Validation(format!(
                "A live vote already exists for response code {}",
                vote.response_code
            )));
        }

        let model = motion_vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            motion_id: Set(vote.motion_id),
            on_behalf_of_user_id: Set(vote.on_behalf_of_user_id),
            submitted_by_user_id: Set(vote.submitted_by_user_id),
            response_code: Set(vote.response_code),
            votes: Set(vote.votes),
            proxy: Set(vote.proxy),
            created_at: Set(Utc::now().into()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove every live vote cast on behalf of a user for a motion.
    pub async fn delete_by_on_behalf_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        motion_id: &str,
        on_behalf_of_user_id: &str,
    ) -> AppResult<u64> {
        let result = MotionVote::delete_many()
            .filter(motion_vote::Column::MotionId.eq(motion_id))
            .filter(motion_vote::Column::OnBehalfOfUserId.eq(on_behalf_of_user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Serialize replacements for one (motion, on-behalf-of user) pair.
    ///
    /// Takes a transaction-scoped advisory lock, released on commit or
    /// rollback. Other pairs never contend. Only meaningful inside a
    /// transaction on Postgres; a no-op on other backends.
    pub async fn lock_on_behalf_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        motion_id: &str,
        on_behalf_of_user_id: &str,
    ) -> AppResult<()> {
        if conn.get_database_backend() != DatabaseBackend::Postgres {
            return Ok(());
        }

        let key = format!("motion-vote:{motion_id}:{on_behalf_of_user_id}");
        conn.execute(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_advisory_xact_lock(hashtext($1))",
            [key.into()],
        ))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
