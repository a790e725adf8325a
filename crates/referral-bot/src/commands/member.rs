//! Self-service command handlers

use tracing::instrument;

use referral_core::entities::RosterMember;
use referral_service::{LeaderboardService, ReportService, ServiceContext};

use super::error::CommandError;
use super::CommandReply;

/// `!myreferrals`: the caller's own referral list.
#[instrument(skip(ctx, user), fields(user_id = %user.id))]
pub async fn run_my_referrals(
    ctx: &ServiceContext,
    user: &RosterMember,
) -> Result<CommandReply, CommandError> {
    let payload = ReportService::new(ctx).my_referrals(user).await?;
    Ok(CommandReply::Single(payload))
}

/// `!leaderboard`: current standings, sent to the caller rather than the
/// published board.
#[instrument(skip(ctx))]
pub async fn run_leaderboard(ctx: &ServiceContext) -> Result<CommandReply, CommandError> {
    let service = LeaderboardService::new(ctx);
    let rows = service.standings().await?;
    let payload = service.render(&rows).await?;
    Ok(CommandReply::Single(payload))
}
