//! Leaderboard rendering and publication
//!
//! Standings come pre-ranked from the repository (validated desc, total
//! desc, denylist excluded). Publication edits the tracked message in place
//! and falls back to delete-then-recreate when the edit fails.

use serde_json::json;
use tracing::{info, instrument, warn};

use referral_core::entities::{AuditEvent, BoardMessage, MessagePayload};
use referral_core::traits::{BoardMessageRepository, ChatGateway, ReferralRepository, StandingRow};

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::ServiceResult;

const BOARD_TITLE: &str = "Referral Leaderboard";

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    /// Create a new LeaderboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current ranked standings, shaped by the leaderboard configuration.
    pub async fn standings(&self) -> ServiceResult<Vec<StandingRow>> {
        let config = &self.ctx.config().leaderboard;
        Ok(self
            .ctx
            .referral_repo()
            .standings(&config.excluded_inviters, config.size)
            .await?)
    }

    /// Build the leaderboard payload, preferring live display names over the
    /// denormalized snapshots.
    pub async fn render(&self, rows: &[StandingRow]) -> ServiceResult<MessagePayload> {
        if rows.is_empty() {
            return Ok(placeholder_payload());
        }

        let guild_id = self.ctx.config().guild_id;
        let mut named = Vec::with_capacity(rows.len());
        for row in rows {
            let name = match self.ctx.gateway().member(guild_id, row.inviter_id).await? {
                Some(member) => member.display_name,
                None if row.inviter_name.is_empty() => format!("User {}", row.inviter_id),
                None => row.inviter_name.clone(),
            };
            named.push((name, row.clone()));
        }

        Ok(MessagePayload::new(BOARD_TITLE)
            .with_description(
                "Reminder: the joinee needs to hold the required role for your \
                 invite to be verified!",
            )
            .with_field("\u{200b}", format_standings(&named)))
    }

    /// Publish the current standings: edit the tracked message in place, or
    /// delete-and-recreate when there is no tracked message or the edit
    /// fails. The new handle is persisted either way.
    #[instrument(skip(self))]
    pub async fn publish(&self) -> ServiceResult<BoardMessage> {
        let rows = self.standings().await?;
        let payload = self.render(&rows).await?;

        let guild_id = self.ctx.config().guild_id;
        let channel_id = self.ctx.config().channels.leaderboard;
        let previous = self.ctx.board_repo().find(guild_id).await?;

        if let Some(handle) = previous {
            match self
                .ctx
                .gateway()
                .edit_message(handle.channel_id, handle.message_id, &payload)
                .await
            {
                Ok(()) => {
                    let refreshed =
                        BoardMessage::new(guild_id, handle.channel_id, handle.message_id);
                    self.ctx.board_repo().upsert(&refreshed).await?;
                    info!(message_id = %handle.message_id, "Leaderboard edited in place");
                    return Ok(refreshed);
                }
                Err(e) => {
                    warn!(error = %e, "Leaderboard edit failed, recreating");
                }
            }

            // Best-effort removal of the stale message; "already deleted"
            // is not an error here.
            if let Err(e) = self
                .ctx
                .gateway()
                .delete_message(handle.channel_id, handle.message_id)
                .await
            {
                if e.is_expected_absent() {
                    info!(message_id = %handle.message_id, "Previous leaderboard already gone");
                } else {
                    warn!(error = %e, "Failed to delete previous leaderboard");
                }
            }
        }

        // Send failure propagates: no retry, the next trigger reconciles.
        let message_id = self
            .ctx
            .gateway()
            .send_message(channel_id, &payload)
            .await?;

        let handle = BoardMessage::new(guild_id, channel_id, message_id);
        self.ctx.board_repo().upsert(&handle).await?;

        info!(message_id = %message_id, entries = rows.len(), "Leaderboard published");
        AuditService::new(self.ctx)
            .record(AuditEvent::info(
                "leaderboard_published",
                json!({ "message_id": message_id, "entries": rows.len() }),
            ))
            .await;

        Ok(handle)
    }
}

/// Fixed-width standings table.
pub fn format_standings(rows: &[(String, StandingRow)]) -> String {
    let mut text = String::from("```\n");
    text.push_str("Inviter                 Verified   Pending     Total\n");
    text.push_str(&"-".repeat(53));
    text.push('\n');

    for (i, (name, row)) in rows.iter().enumerate() {
        let rank = i + 1;
        let name: String = name.chars().take(17).collect();
        text.push_str(&format!(
            "{:<21}{:>9}{:>10}{:>10}\n",
            format!("{rank}. {name}"),
            row.validated,
            row.pending,
            row.total
        ));
    }

    text.push_str("```");
    text
}

/// The zero-row placeholder, nudging members toward their first invite.
pub fn placeholder_payload() -> MessagePayload {
    MessagePayload::new(BOARD_TITLE)
        .with_description("No referrals tracked yet! Be the first one to invite someone!")
        .with_field(
            "How to Start?",
            "Create an invite link and share it with your friends!",
        )
        .with_field(
            "Available Commands",
            "- `!myreferrals` - View your referral history\n\
             - `!leaderboard` - Show the referral rankings",
        )
        .with_footer("Tip: your invites will appear here once someone joins using your link!")
}
