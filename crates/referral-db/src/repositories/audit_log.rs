//! SQLite implementation of AuditLogRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use referral_core::entities::AuditEvent;
use referral_core::traits::{AuditLogRepository, RepoResult};

use crate::models::AuditLogModel;

use super::error::map_db_error;

/// SQLite implementation of AuditLogRepository
#[derive(Clone)]
pub struct SqliteAuditLogRepository {
    pool: SqlitePool,
}

impl SqliteAuditLogRepository {
    /// Create a new SqliteAuditLogRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for SqliteAuditLogRepository {
    #[instrument(skip(self, event))]
    async fn append(&self, event: &AuditEvent) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (event_type, payload, severity, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&event.event_type)
        .bind(&event.payload)
        .bind(event.severity.as_str())
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: i64) -> RepoResult<Vec<AuditEvent>> {
        let results = sqlx::query_as::<_, AuditLogModel>(
            r#"
            SELECT id, event_type, payload, severity, created_at
            FROM audit_log
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AuditEvent::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
