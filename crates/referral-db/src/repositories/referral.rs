//! SQLite implementation of ReferralRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use referral_core::entities::{Referral, ReferralState};
use referral_core::error::DomainError;
use referral_core::traits::{ReferralRepository, ReferralStats, RepoResult, StandingRow};
use referral_core::value_objects::Snowflake;

use crate::models::{ReferralModel, StandingModel, StatsModel};

use super::error::{map_db_error, map_unique_violation, referral_not_found};

const REFERRAL_COLUMNS: &str = "inviter_id, inviter_name, invitee_id, invitee_name, \
     invite_code, joined_at, is_validated, is_member_active, was_previous_resident";

/// SQLite implementation of ReferralRepository
#[derive(Clone)]
pub struct SqliteReferralRepository {
    pool: SqlitePool,
}

impl SqliteReferralRepository {
    /// Create a new SqliteReferralRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferralRepository for SqliteReferralRepository {
    #[instrument(skip(self))]
    async fn find_by_invitee(&self, invitee_id: Snowflake) -> RepoResult<Option<Referral>> {
        let result = sqlx::query_as::<_, ReferralModel>(&format!(
            "SELECT {REFERRAL_COLUMNS} FROM referrals WHERE invitee_id = ?"
        ))
        .bind(invitee_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Referral::from))
    }

    #[instrument(skip(self))]
    async fn find_by_inviter(&self, inviter_id: Snowflake) -> RepoResult<Vec<Referral>> {
        let results = sqlx::query_as::<_, ReferralModel>(&format!(
            "SELECT {REFERRAL_COLUMNS} FROM referrals WHERE inviter_id = ? \
             ORDER BY joined_at DESC"
        ))
        .bind(inviter_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Referral::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> RepoResult<Vec<Referral>> {
        let results = sqlx::query_as::<_, ReferralModel>(&format!(
            "SELECT {REFERRAL_COLUMNS} FROM referrals WHERE is_member_active = 1"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Referral::from).collect())
    }

    #[instrument(skip(self, referral))]
    async fn create(&self, referral: &Referral) -> RepoResult<()> {
        let (is_member_active, is_validated) = referral.state.flags();

        sqlx::query(
            r#"
            INSERT INTO referrals (inviter_id, inviter_name, invitee_id, invitee_name,
                                   invite_code, joined_at, is_validated, is_member_active,
                                   was_previous_resident)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(referral.inviter_id.into_inner())
        .bind(&referral.inviter_name)
        .bind(referral.invitee_id.into_inner())
        .bind(&referral.invitee_name)
        .bind(&referral.invite_code)
        .bind(referral.joined_at)
        .bind(is_validated)
        .bind(is_member_active)
        .bind(referral.was_previous_resident)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReferralExists(referral.invitee_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_state(&self, invitee_id: Snowflake, state: ReferralState) -> RepoResult<()> {
        let (is_member_active, is_validated) = state.flags();

        let result = sqlx::query(
            "UPDATE referrals SET is_member_active = ?, is_validated = ? WHERE invitee_id = ?",
        )
        .bind(is_member_active)
        .bind(is_validated)
        .bind(invitee_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(referral_not_found(invitee_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn reactivate_invitee(
        &self,
        invitee_id: Snowflake,
        was_previous_resident: bool,
    ) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE referrals
            SET is_member_active = 1,
                is_validated = 0,
                was_previous_resident = ?
            WHERE invitee_id = ?
            "#,
        )
        .bind(was_previous_resident)
        .bind(invitee_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn reactivate_inviter(&self, inviter_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE referrals SET is_member_active = 1 WHERE inviter_id = ?",
        )
        .bind(inviter_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn deactivate_member(&self, member_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE referrals
            SET is_member_active = 0,
                is_validated = 0
            WHERE inviter_id = ? OR invitee_id = ?
            "#,
        )
        .bind(member_id.into_inner())
        .bind(member_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self, excluded))]
    async fn standings(&self, excluded: &[Snowflake], limit: i64) -> RepoResult<Vec<StandingRow>> {
        // The denylist is tiny and configuration-driven, so filtering happens
        // here after grouping rather than in a dynamically built NOT IN.
        let results = sqlx::query_as::<_, StandingModel>(
            r#"
            SELECT
                inviter_id,
                inviter_name,
                SUM(CASE WHEN is_validated = 1 AND is_member_active = 1 THEN 1 ELSE 0 END) AS validated,
                SUM(CASE WHEN is_validated = 0 AND is_member_active = 1 THEN 1 ELSE 0 END) AS pending,
                SUM(CASE WHEN is_member_active = 1 THEN 1 ELSE 0 END) AS total
            FROM referrals
            GROUP BY inviter_id, inviter_name
            HAVING total > 0
            ORDER BY validated DESC, total DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(StandingRow::from)
            .filter(|row| !excluded.contains(&row.inviter_id))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> RepoResult<ReferralStats> {
        let model = sqlx::query_as::<_, StatsModel>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN is_member_active = 1 THEN 1 ELSE 0 END), 0) AS active,
                COALESCE(SUM(CASE WHEN is_validated = 1 AND is_member_active = 1 THEN 1 ELSE 0 END), 0) AS validated,
                COUNT(DISTINCT inviter_id) AS distinct_inviters
            FROM referrals
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ReferralStats {
            total: model.total,
            active: model.active,
            validated: model.validated,
            distinct_inviters: model.distinct_inviters,
        })
    }
}
