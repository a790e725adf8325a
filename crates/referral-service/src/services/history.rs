//! Member history service
//!
//! Appends join/leave/role-snapshot entries to the append-only log and
//! answers the `was_previous_resident` question on rejoin.

use serde_json::json;
use tracing::{instrument, warn};

use referral_core::entities::{AuditEvent, MemberAction, MemberHistoryEntry, RosterMember};
use referral_core::traits::{ChatGateway, MemberHistoryRepository};
use referral_core::value_objects::Snowflake;

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Member history service
pub struct HistoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HistoryService<'a> {
    /// Create a new HistoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether the member currently holds the required role. A missing role
    /// is expected-absent: logged, treated as "not held".
    pub async fn holds_required_role(&self, member: &RosterMember) -> ServiceResult<bool> {
        let config = self.ctx.config();
        let role_id = self
            .ctx
            .gateway()
            .role_id(config.guild_id, &config.required_role)
            .await?;

        match role_id {
            Some(role_id) => Ok(member.has_role(role_id)),
            None => {
                warn!(role = %config.required_role, "Required role not found in guild");
                Ok(false)
            }
        }
    }

    /// Record a join observation. Returns whether the member already held
    /// the required role at join time.
    #[instrument(skip(self, member), fields(member_id = %member.id))]
    pub async fn record_join(&self, member: &RosterMember) -> ServiceResult<bool> {
        let had_role = self.holds_required_role(member).await?;
        self.ctx
            .history_repo()
            .append(&MemberHistoryEntry::new(
                member.id,
                MemberAction::Join,
                had_role,
            ))
            .await?;
        Ok(had_role)
    }

    /// Record a leave observation. The member is already gone from the
    /// roster, so no role snapshot is possible.
    #[instrument(skip(self))]
    pub async fn record_leave(&self, member_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .history_repo()
            .append(&MemberHistoryEntry::new(
                member_id,
                MemberAction::Leave,
                false,
            ))
            .await?;
        Ok(())
    }

    /// Record a mid-membership role snapshot, used by the validation pass
    /// for members newly observed holding the role.
    #[instrument(skip(self))]
    pub async fn record_role_observed(&self, member_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .history_repo()
            .append(&MemberHistoryEntry::new(
                member_id,
                MemberAction::Current,
                true,
            ))
            .await?;
        Ok(())
    }

    /// Whether any historical entry shows the member holding the role.
    pub async fn held_role_before(&self, member_id: Snowflake) -> ServiceResult<bool> {
        Ok(self.ctx.history_repo().held_role_before(member_id).await?)
    }

    /// A member's full history, oldest first.
    pub async fn member_history(
        &self,
        member_id: Snowflake,
    ) -> ServiceResult<Vec<MemberHistoryEntry>> {
        Ok(self.ctx.history_repo().find_by_member(member_id).await?)
    }

    /// Drop the entire history log (admin reset). Referrals and the audit
    /// log are untouched.
    #[instrument(skip(self))]
    pub async fn reset(&self, requested_by: Snowflake) -> ServiceResult<u64> {
        let removed = self.ctx.history_repo().clear().await?;
        AuditService::new(self.ctx)
            .record(AuditEvent::warning(
                "history_reset",
                json!({ "requested_by": requested_by, "removed": removed }),
            ))
            .await;
        Ok(removed)
    }
}
