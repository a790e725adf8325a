//! SQLite implementation of MemberHistoryRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use referral_core::entities::MemberHistoryEntry;
use referral_core::traits::{MemberHistoryRepository, RepoResult};
use referral_core::value_objects::Snowflake;

use crate::models::MemberHistoryModel;

use super::error::map_db_error;

/// SQLite implementation of MemberHistoryRepository
#[derive(Clone)]
pub struct SqliteMemberHistoryRepository {
    pool: SqlitePool,
}

impl SqliteMemberHistoryRepository {
    /// Create a new SqliteMemberHistoryRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberHistoryRepository for SqliteMemberHistoryRepository {
    #[instrument(skip(self, entry))]
    async fn append(&self, entry: &MemberHistoryEntry) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO member_history (member_id, action, recorded_at, had_required_role)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(entry.member_id.into_inner())
        .bind(entry.action.as_str())
        .bind(entry.recorded_at)
        .bind(entry.had_required_role)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, member_id: Snowflake) -> RepoResult<Vec<MemberHistoryEntry>> {
        let results = sqlx::query_as::<_, MemberHistoryModel>(
            r#"
            SELECT id, member_id, action, recorded_at, had_required_role
            FROM member_history
            WHERE member_id = ?
            ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(MemberHistoryEntry::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn held_role_before(&self, member_id: Snowflake) -> RepoResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM member_history WHERE member_id = ? AND had_required_role = 1",
        )
        .bind(member_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM member_history")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM member_history")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
