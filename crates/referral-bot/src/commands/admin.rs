//! Admin command handlers

use tracing::{info, instrument};

use referral_core::entities::MessagePayload;
use referral_core::value_objects::Snowflake;
use referral_service::{HistoryService, ReportService, ServiceContext, ValidationService};

use super::error::CommandError;
use super::CommandReply;
use crate::dispatch::RefreshHandle;

/// `!validate`: run the full pass, report counts and standings, then ask the
/// scheduler to republish the board.
#[instrument(skip(ctx, refresh))]
pub async fn run_validate(
    ctx: &ServiceContext,
    refresh: &RefreshHandle,
) -> Result<CommandReply, CommandError> {
    let report = ValidationService::new(ctx).run_full_pass().await?;
    let payload = ReportService::new(ctx).validation_report(report).await?;
    refresh.request();
    Ok(CommandReply::Single(payload))
}

/// `!refreshboard`: recompute validity and republish, replying with a short
/// confirmation instead of the full report.
#[instrument(skip(ctx, refresh))]
pub async fn run_refresh_board(
    ctx: &ServiceContext,
    refresh: &RefreshHandle,
) -> Result<CommandReply, CommandError> {
    let report = ValidationService::new(ctx).run_full_pass().await?;
    refresh.request();
    Ok(CommandReply::Single(
        MessagePayload::new("Leaderboard Refresh").with_description(format!(
            "Validation status has been updated ({} validated, {} invalid); the board is being \
             republished.",
            report.validated, report.invalid
        )),
    ))
}

/// `!invitehistory <member>`: the paginated membership history report.
#[instrument(skip(ctx))]
pub async fn run_invite_history(
    ctx: &ServiceContext,
    member: Snowflake,
) -> Result<CommandReply, CommandError> {
    let pages = ReportService::new(ctx).invite_history_pages(member).await?;
    Ok(CommandReply::Paginated(pages))
}

/// `!invitestats`: aggregate counters.
#[instrument(skip(ctx))]
pub async fn run_invite_stats(ctx: &ServiceContext) -> Result<CommandReply, CommandError> {
    let payload = ReportService::new(ctx).invite_stats().await?;
    Ok(CommandReply::Single(payload))
}

/// `!auditlogs [limit]`: the most recent audit events.
#[instrument(skip(ctx))]
pub async fn run_audit_logs(
    ctx: &ServiceContext,
    limit: i64,
) -> Result<CommandReply, CommandError> {
    let payload = ReportService::new(ctx).audit_logs(limit).await?;
    Ok(CommandReply::Single(payload))
}

/// `!resethistory`: clear the member history log.
#[instrument(skip(ctx))]
pub async fn run_reset_history(
    ctx: &ServiceContext,
    requested_by: Snowflake,
) -> Result<CommandReply, CommandError> {
    let removed = HistoryService::new(ctx).reset(requested_by).await?;
    info!(removed, requested_by = %requested_by, "Member history cleared");

    Ok(CommandReply::Single(
        MessagePayload::new("History Reset").with_description(format!(
            "Cleared {removed} member history entries. Referrals and the audit log are untouched."
        )),
    ))
}
