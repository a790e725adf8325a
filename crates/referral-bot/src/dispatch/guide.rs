//! Pinned guide message
//!
//! Created once per channel; a scan of existing pins for the guide marker
//! makes repeated ready events idempotent.

use tracing::{info, instrument, warn};

use referral_core::entities::MessagePayload;
use referral_core::traits::ChatGateway;
use referral_core::value_objects::Snowflake;
use referral_service::{ServiceContext, ServiceResult};

/// Marker scanned for in pinned messages.
const GUIDE_TITLE: &str = "Referral Bot Guide";

/// The guide payload pinned in the commands channel.
fn guide_payload() -> MessagePayload {
    MessagePayload::new(GUIDE_TITLE)
        .with_description("Track who you bring to the community and climb the leaderboard.")
        .with_field(
            "Self-service (DM the bot)",
            "- `!myreferrals` - View your referral history\n\
             - `!leaderboard` - Show the referral rankings",
        )
        .with_field(
            "Admin",
            "- `!validate` - Re-run referral validation\n\
             - `!refreshboard` - Recompute and republish the leaderboard\n\
             - `!invitehistory <member>` - A member's join/leave history\n\
             - `!invitestats` - Aggregate referral statistics\n\
             - `!auditlogs [limit]` - Recent audit events\n\
             - `!resethistory` - Clear the member history log",
        )
        .with_footer("Referrals count once both parties hold the required role.")
}

/// Ensure the guide is pinned in `channel_id`, creating it only when no pin
/// carries the marker.
#[instrument(skip(ctx))]
pub async fn ensure_pinned_guide(ctx: &ServiceContext, channel_id: Snowflake) -> ServiceResult<()> {
    let pins = ctx.gateway().pinned_messages(channel_id).await?;
    if pins.iter().any(|pin| pin.content.contains(GUIDE_TITLE)) {
        return Ok(());
    }

    let payload = guide_payload();
    let message_id = ctx.gateway().send_message(channel_id, &payload).await?;
    if let Err(e) = ctx.gateway().pin_message(channel_id, message_id).await {
        // A missing pin is a cosmetic loss, not a startup failure.
        warn!(error = %e, "Failed to pin guide message");
        return Ok(());
    }

    info!(channel_id = %channel_id, message_id = %message_id, "Pinned guide message");
    Ok(())
}
