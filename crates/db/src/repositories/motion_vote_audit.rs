//! Motion vote audit repository.
//!
//! Insert-only history of submitted votes. The one permitted update is
//! [`MotionVoteAuditRepository::supersede`]; nothing here deletes.

use crate::entities::{MotionVoteAudit, motion_vote_audit, user::UserSource};
use assembly_common::{AppError, AppResult, IdGenerator};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde_json::json;

/// One audit row to record, snapshotting identities at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub motion_id: String,
    pub submitted_by_user_id: String,
    pub submitted_by_source: UserSource,
    pub submitted_by_name: String,
    pub on_behalf_of_user_id: String,
    pub on_behalf_of_name: String,
    pub response_code: String,
    pub votes: i32,
    pub proxy: bool,
    /// Ids of the audit rows this submission replaces.
    pub supersedes: Vec<String>,
}

/// Motion vote audit repository for database operations.
#[derive(Clone, Default)]
pub struct MotionVoteAuditRepository {
    id_gen: IdGenerator,
}

impl MotionVoteAuditRepository {
    /// Create a new audit repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
        }
    }

    /// Full audit history of a motion, oldest first.
    pub async fn find_by_motion<C: ConnectionTrait>(
        &self,
        conn: &C,
        motion_id: &str,
    ) -> AppResult<Vec<motion_vote_audit::Model>> {
        MotionVoteAudit::find()
            .filter(motion_vote_audit::Column::MotionId.eq(motion_id))
            .order_by_asc(motion_vote_audit::Column::CreatedAt)
            .order_by_asc(motion_vote_audit::Column::Id)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Audit history of one on-behalf-of user for a motion, oldest first.
    pub async fn find_by_on_behalf_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        motion_id: &str,
        on_behalf_of_user_id: &str,
    ) -> AppResult<Vec<motion_vote_audit::Model>> {
        MotionVoteAudit::find()
            .filter(motion_vote_audit::Column::MotionId.eq(motion_id))
            .filter(motion_vote_audit::Column::OnBehalfOfUserId.eq(on_behalf_of_user_id))
            .order_by_asc(motion_vote_audit::Column::CreatedAt)
            .order_by_asc(motion_vote_audit::Column::Id)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Audit rows of one on-behalf-of user that are not yet superseded.
    pub async fn find_active_by_on_behalf_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        motion_id: &str,
        on_behalf_of_user_id: &str,
    ) -> AppResult<Vec<motion_vote_audit::Model>> {
        MotionVoteAudit::find()
            .filter(motion_vote_audit::Column::MotionId.eq(motion_id))
            .filter(motion_vote_audit::Column::OnBehalfOfUserId.eq(on_behalf_of_user_id))
            .filter(motion_vote_audit::Column::Superseded.eq(false))
            .order_by_asc(motion_vote_audit::Column::Id)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert one audit row per entry, all sharing `submission_id`.
    pub async fn record<C: ConnectionTrait>(
        &self,
        conn: &C,
        entries: Vec<AuditEntry>,
        submission_id: &str,
    ) -> AppResult<Vec<motion_vote_audit::Model>> {
        let mut recorded = Vec::with_capacity(entries.len());
        let now = Utc::now();

        for entry in entries {
            let model = motion_vote_audit::ActiveModel {
                id: Set(self.id_gen.generate()),
                submission_id: Set(submission_id.to_string()),
                motion_id: Set(entry.motion_id),
                submitted_by_user_id: Set(entry.submitted_by_user_id),
                submitted_by_source: Set(entry.submitted_by_source),
                submitted_by_name: Set(entry.submitted_by_name),
                on_behalf_of_user_id: Set(entry.on_behalf_of_user_id),
                on_behalf_of_name: Set(entry.on_behalf_of_name),
                response_code: Set(entry.response_code),
                votes: Set(entry.votes),
                proxy: Set(entry.proxy),
                superseded: Set(false),
                supersedes: Set(json!(entry.supersedes)),
                created_at: Set(now.into()),
            };

            let row = model
                .insert(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            recorded.push(row);
        }

        Ok(recorded)
    }

    /// Mark audit rows as superseded.
    ///
    /// Rows already superseded are left untouched, so repeating the call is
    /// a no-op. Returns the number of rows that flipped.
    pub async fn supersede<C: ConnectionTrait>(
        &self,
        conn: &C,
        audit_ids: &[String],
    ) -> AppResult<u64> {
        if audit_ids.is_empty() {
            return Ok(0);
        }

        let result = MotionVoteAudit::update_many()
            .col_expr(motion_vote_audit::Column::Superseded, Expr::value(true))
            .filter(motion_vote_audit::Column::Id.is_in(audit_ids.iter().cloned()))
            .filter(motion_vote_audit::Column::Superseded.eq(false))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
