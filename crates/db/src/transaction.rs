//! Transaction coordinator.
//!
//! Every multi-step mutation runs as a unit of work inside
//! [`TransactionCoordinator::run`]: the unit either commits as a whole or
//! rolls back as a whole, and exactly one of the two is attempted.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use assembly_common::{AppError, AppResult};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, Statement,
    TransactionTrait,
};

/// Future returned by a unit of work, borrowing the transaction handle.
pub type UnitFuture<'c, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'c>>;

/// Runs units of work inside a storage transaction.
#[derive(Clone)]
pub struct TransactionCoordinator {
    db: Arc<DatabaseConnection>,
    lock_timeout: Option<Duration>,
}

impl TransactionCoordinator {
    /// Create a new transaction coordinator.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            lock_timeout: None,
        }
    }

    /// Bound how long statements inside a unit may wait for row or advisory
    /// locks. A zero duration leaves the server default in place.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Run `unit` inside a new transaction.
    ///
    /// On success the transaction is committed; a commit failure replaces
    /// the unit's result. On failure the transaction is rolled back and the
    /// unit's own error is returned, even if the rollback fails too.
    ///
    /// If the returned future is dropped before completion the open
    /// transaction is dropped with it, which rolls it back.
    ///
    /// ```ignore
    /// let votes = coordinator
    ///     .run(move |txn| Box::pin(async move { repo.find_by_motion(txn, &motion_id).await }))
    ///     .await?;
    /// ```
    pub async fn run<T, F>(&self, unit: F) -> AppResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> UnitFuture<'c, T> + Send,
    {
        let txn = self.db.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin transaction");
            AppError::Database(e.to_string())
        })?;

        let result = match self.apply_lock_timeout(&txn).await {
            Ok(()) => unit(&txn).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => {
                txn.commit().await.map_err(|e| {
                    tracing::error!(error = %e, "Transaction commit failed");
                    AppError::Database(e.to_string())
                })?;
                tracing::debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                match txn.rollback().await {
                    Ok(()) => tracing::debug!(cause = %err, "Transaction rolled back"),
                    Err(rollback_err) => tracing::error!(
                        error = %rollback_err,
                        cause = %err,
                        "Transaction rollback failed"
                    ),
                }
                Err(err)
            }
        }
    }

    async fn apply_lock_timeout(&self, txn: &DatabaseTransaction) -> AppResult<()> {
        let Some(timeout) = self.lock_timeout else {
            return Ok(());
        };
        if txn.get_database_backend() != DatabaseBackend::Postgres {
            return Ok(());
        }

        let sql = format!("SET LOCAL lock_timeout = '{}ms'", timeout.as_millis());
        txn.execute(Statement::from_string(DatabaseBackend::Postgres, sql))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, MockExecResult};

    fn transaction_log(db: Arc<DatabaseConnection>) -> String {
        let conn = Arc::try_unwrap(db).ok().unwrap();
        format!("{:?}", conn.into_transaction_log())
    }

    #[tokio::test]
    async fn test_run_commits_on_success() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let coordinator = TransactionCoordinator::new(Arc::clone(&db));

        let result = coordinator
            .run(|_txn| Box::pin(async move { Ok(7) }))
            .await
            .unwrap();
        assert_eq!(result, 7);

        drop(coordinator);
        let log = transaction_log(db);
        assert!(log.contains("BEGIN"));
        assert!(log.contains("COMMIT"));
        assert!(!log.contains("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_run_rolls_back_and_propagates_unit_error() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let coordinator = TransactionCoordinator::new(Arc::clone(&db));

        let result: AppResult<()> = coordinator
            .run(|_txn| {
                Box::pin(async move { Err(AppError::BadRequest("Unknown response code".into())) })
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Unknown response code"),
            other => panic!("Expected BadRequest, got {other:?}"),
        }

        drop(coordinator);
        let log = transaction_log(db);
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_storage_failure_inside_unit_rolls_back() {
        // No exec results queued: the statement fails like a lost connection would.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let coordinator = TransactionCoordinator::new(Arc::clone(&db));

        let result: AppResult<u64> = coordinator
            .run(|txn| {
                Box::pin(async move {
                    let res = txn
                        .execute(Statement::from_string(
                            DatabaseBackend::Postgres,
                            "DELETE FROM motion_vote".to_string(),
                        ))
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                    Ok(res.rows_affected())
                })
            })
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));

        drop(coordinator);
        assert!(transaction_log(db).contains("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_lock_timeout_is_applied_per_transaction() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let coordinator = TransactionCoordinator::new(Arc::clone(&db))
            .with_lock_timeout(Duration::from_millis(1500));

        coordinator
            .run(|_txn| Box::pin(async move { Ok(()) }))
            .await
            .unwrap();

        drop(coordinator);
        let log = transaction_log(db);
        assert!(log.contains("SET LOCAL lock_timeout = '1500ms'"));
        assert!(log.contains("COMMIT"));
    }
}
