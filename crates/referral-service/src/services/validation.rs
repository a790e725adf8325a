//! Validation engine
//!
//! Recomputes validity for every active referral on each invocation: a row
//! is valid iff both parties are in the live roster and both carry the
//! required role. Rows move through explicit state transitions, so running
//! the pass twice with an unchanged roster is a no-op.

use std::collections::HashSet;

use serde_json::json;
use tracing::{info, instrument};

use referral_core::entities::AuditEvent;
use referral_core::error::DomainError;
use referral_core::traits::{ChatGateway, ReferralRepository};
use referral_core::value_objects::Snowflake;

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::history::HistoryService;

/// Counts produced by a full validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub validated: u64,
    pub invalid: u64,
}

/// Validation engine
pub struct ValidationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ValidationService<'a> {
    /// Create a new ValidationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run the full pass over every active referral row.
    ///
    /// Cost is O(active referral count) per trigger; the four triggers
    /// (join, leave, interval, admin command) all land here.
    #[instrument(skip(self))]
    pub async fn run_full_pass(&self) -> ServiceResult<ValidationReport> {
        let config = self.ctx.config();
        let role_id = self
            .ctx
            .gateway()
            .role_id(config.guild_id, &config.required_role)
            .await?
            .ok_or_else(|| DomainError::RoleNotFound(config.required_role.clone()))?;

        let rows = self.ctx.referral_repo().list_active().await?;
        let history = HistoryService::new(self.ctx);

        let mut report = ValidationReport::default();
        // Members confirmed role-carrying this pass, for the history side
        // effect; each looked up at most once.
        let mut role_holders: HashSet<Snowflake> = HashSet::new();

        for row in rows {
            let inviter_ok = self
                .member_holds_role(config.guild_id, row.inviter_id, role_id)
                .await?;
            let invitee_ok = self
                .member_holds_role(config.guild_id, row.invitee_id, role_id)
                .await?;

            if inviter_ok {
                role_holders.insert(row.inviter_id);
            }
            if invitee_ok {
                role_holders.insert(row.invitee_id);
            }

            let eligible = inviter_ok && invitee_ok;
            let next = row.state.revalidate(eligible);
            if next != row.state {
                self.ctx
                    .referral_repo()
                    .set_state(row.invitee_id, next)
                    .await?;
            }

            if eligible {
                report.validated += 1;
            } else {
                report.invalid += 1;
            }
        }

        // Append a role snapshot for members newly observed holding it.
        for member_id in role_holders {
            if !history.held_role_before(member_id).await? {
                history.record_role_observed(member_id).await?;
            }
        }

        info!(
            validated = report.validated,
            invalid = report.invalid,
            "Validation pass complete"
        );
        AuditService::new(self.ctx)
            .record(AuditEvent::info(
                "validation_pass",
                json!({ "validated": report.validated, "invalid": report.invalid }),
            ))
            .await;

        Ok(report)
    }

    async fn member_holds_role(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        role_id: Snowflake,
    ) -> ServiceResult<bool> {
        let member = self.ctx.gateway().member(guild_id, member_id).await?;
        Ok(member.is_some_and(|m| m.has_role(role_id)))
    }
}
