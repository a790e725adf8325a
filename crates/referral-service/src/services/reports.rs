//! Report builders
//!
//! Assemble the payloads behind the self-service and admin commands. All
//! rendering is data-shaping only; the platform turns payloads into embeds.

use tracing::instrument;

use referral_core::entities::{MemberAction, MessagePayload, Referral, RosterMember};
use referral_core::traits::{ChatGateway, MemberHistoryRepository, ReferralRepository};
use referral_core::value_objects::Snowflake;

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::history::HistoryService;
use super::leaderboard::LeaderboardService;
use super::validation::ValidationReport;

/// Entries per page in the paginated `invitehistory` report.
pub const HISTORY_PAGE_SIZE: usize = 10;

/// Report builder service
pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReportService<'a> {
    /// Create a new ReportService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's own referrals, newest join first.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn my_referrals(&self, user: &RosterMember) -> ServiceResult<MessagePayload> {
        let referrals = self.ctx.referral_repo().find_by_inviter(user.id).await?;

        if referrals.is_empty() {
            return Ok(MessagePayload::new("Your Referrals")
                .with_description("You haven't invited anyone yet!"));
        }

        let mut payload = MessagePayload::new("Your Referrals")
            .with_description(format!("Total referrals: {}", referrals.len()));

        for referral in &referrals {
            let name = self.display_name(referral.invitee_id, &referral.invitee_name).await?;
            payload = payload.with_field(
                name,
                format!(
                    "Status: {}\nJoined: {}\nInvite Used: {}",
                    referral_status(referral),
                    referral.joined_at.format("%Y-%m-%d"),
                    referral.invite_code
                ),
            );
        }

        Ok(payload)
    }

    /// A member's full history plus their referral record, paginated.
    #[instrument(skip(self))]
    pub async fn invite_history_pages(
        &self,
        member_id: Snowflake,
    ) -> ServiceResult<Vec<MessagePayload>> {
        let history = HistoryService::new(self.ctx)
            .member_history(member_id)
            .await?;
        let referral = self.ctx.referral_repo().find_by_invitee(member_id).await?;

        if history.is_empty() && referral.is_none() {
            return Ok(vec![MessagePayload::new("Invite History")
                .with_description(format!("No history recorded for member {member_id}."))]);
        }

        let referral_summary = match &referral {
            Some(r) => format!(
                "Invited by {} via `{}` on {} ({})",
                r.inviter_name,
                r.invite_code,
                r.joined_at.format("%Y-%m-%d"),
                referral_status(r)
            ),
            None => "No referral record.".to_string(),
        };

        let chunks: Vec<_> = history.chunks(HISTORY_PAGE_SIZE).collect();
        let page_count = chunks.len().max(1);

        let mut pages = Vec::with_capacity(page_count);
        for (index, chunk) in chunks.iter().enumerate() {
            let lines: Vec<String> = chunk
                .iter()
                .map(|entry| {
                    format!(
                        "{} - {} (role: {})",
                        entry.recorded_at.format("%Y-%m-%d %H:%M"),
                        action_label(entry.action),
                        if entry.had_required_role { "yes" } else { "no" }
                    )
                })
                .collect();

            pages.push(
                MessagePayload::new(format!("Invite History - {member_id}"))
                    .with_description(referral_summary.clone())
                    .with_field("Events", lines.join("\n"))
                    .with_footer(format!("Page {}/{page_count}", index + 1)),
            );
        }

        if pages.is_empty() {
            pages.push(
                MessagePayload::new(format!("Invite History - {member_id}"))
                    .with_description(referral_summary)
                    .with_footer("Page 1/1".to_string()),
            );
        }

        Ok(pages)
    }

    /// Aggregate counters: referrals, history, audit log.
    #[instrument(skip(self))]
    pub async fn invite_stats(&self) -> ServiceResult<MessagePayload> {
        let stats = self.ctx.referral_repo().stats().await?;
        let history_entries = self.ctx.history_repo().count().await?;
        let audit_events = AuditService::new(self.ctx).count().await?;

        Ok(MessagePayload::new("Invite Statistics")
            .with_field(
                "Referrals",
                format!(
                    "Total: {}\nActive: {}\nValidated: {}\nDistinct inviters: {}",
                    stats.total, stats.active, stats.validated, stats.distinct_inviters
                ),
            )
            .with_field(
                "Logs",
                format!("History entries: {history_entries}\nAudit events: {audit_events}"),
            ))
    }

    /// The most recent audit events, newest first.
    #[instrument(skip(self))]
    pub async fn audit_logs(&self, limit: i64) -> ServiceResult<MessagePayload> {
        let events = AuditService::new(self.ctx).recent(limit).await?;

        if events.is_empty() {
            return Ok(MessagePayload::new("Audit Log")
                .with_description("No audit events recorded yet."));
        }

        let lines: Vec<String> = events
            .iter()
            .map(|event| {
                format!(
                    "{} [{}] {}: {}",
                    event.created_at.format("%Y-%m-%d %H:%M"),
                    event.severity.as_str(),
                    event.event_type,
                    event.payload
                )
            })
            .collect();

        Ok(MessagePayload::new("Audit Log")
            .with_description(format!("Most recent {} events", events.len()))
            .with_field("Events", lines.join("\n")))
    }

    /// The post-pass report shown by the `validate` admin command: counts
    /// plus current standings.
    #[instrument(skip(self))]
    pub async fn validation_report(
        &self,
        report: ValidationReport,
    ) -> ServiceResult<MessagePayload> {
        let standings = LeaderboardService::new(self.ctx).standings().await?;

        let mut payload = MessagePayload::new("Final Validation Report").with_field(
            "Summary",
            format!(
                "Total Validated: {}\nTotal Invalid: {}",
                report.validated, report.invalid
            ),
        );

        if !standings.is_empty() {
            let lines: Vec<String> = standings
                .iter()
                .map(|row| format!("{}: {} validated referrals", row.inviter_name, row.validated))
                .collect();
            payload = payload.with_field("Final Standings", lines.join("\n"));
        }

        Ok(payload)
    }

    async fn display_name(&self, member_id: Snowflake, stored: &str) -> ServiceResult<String> {
        let guild_id = self.ctx.config().guild_id;
        Ok(match self.ctx.gateway().member(guild_id, member_id).await? {
            Some(member) => member.display_name,
            None if stored.is_empty() => format!("User {member_id}"),
            None => stored.to_string(),
        })
    }
}

fn referral_status(referral: &Referral) -> &'static str {
    if referral.state.is_active() {
        if referral.state.is_validated() {
            "Validated"
        } else {
            "Pending"
        }
    } else {
        "Left Server"
    }
}

fn action_label(action: MemberAction) -> &'static str {
    match action {
        MemberAction::Join => "joined",
        MemberAction::Leave => "left",
        MemberAction::Current => "role observed",
    }
}
