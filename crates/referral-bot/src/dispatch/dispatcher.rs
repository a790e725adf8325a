//! Event dispatcher
//!
//! Consumes platform events in strict arrival order and routes them to the
//! services. Every handler isolates its own failure: an error is logged,
//! possibly audited, and answered with a rejection payload, never allowed
//! to take the loop down.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use referral_core::entities::{AuditEvent, MessagePayload, RosterMember};
use referral_core::events::{GatewayEvent, IncomingMessage, NavDirection};
use referral_core::traits::{ChatGateway, ReferralRepository};
use referral_core::value_objects::Snowflake;
use referral_service::{AttributionService, AuditService, HistoryService, InviteCache,
    ServiceContext};

use crate::commands::{
    self, Command, CommandError, CommandReply, CommandSpec, Cooldowns, PaginationSessions,
    ParseOutcome, Session,
};

use super::guide::ensure_pinned_guide;
use super::refresh::{RefreshHandle, RefreshScheduler};

/// Event dispatcher: owns the invite cache, cooldown ledger, pagination
/// sessions, and the refresh scheduler.
pub struct Dispatcher {
    ctx: ServiceContext,
    invites: InviteCache,
    cooldowns: Cooldowns,
    sessions: PaginationSessions,
    refresh: RefreshHandle,
    scheduler: RefreshScheduler,
}

impl Dispatcher {
    /// Create a dispatcher and start its refresh scheduler.
    pub fn new(ctx: ServiceContext) -> Self {
        let config = ctx.config();
        let scheduler = RefreshScheduler::spawn(
            ctx.clone(),
            Duration::from_secs(config.refresh_interval_secs),
        );
        let cooldowns = Cooldowns::new(Duration::from_secs(config.command_cooldown_secs));

        Self {
            refresh: scheduler.handle(),
            invites: InviteCache::new(),
            sessions: PaginationSessions::new(),
            cooldowns,
            scheduler,
            ctx,
        }
    }

    /// Handle for requesting a validate-and-publish run.
    pub fn refresh_handle(&self) -> RefreshHandle {
        self.refresh.clone()
    }

    /// Stop the scheduler.
    pub fn shutdown(self) {
        self.scheduler.shutdown();
    }

    /// Route one inbound event.
    #[instrument(skip(self, event))]
    pub async fn handle_event(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Ready => self.handle_ready().await,
            GatewayEvent::MemberJoin { guild_id, member } => {
                if guild_id != self.ctx.config().guild_id {
                    debug!(%guild_id, "Ignoring join from untracked guild");
                    return;
                }
                self.handle_join(member).await;
            }
            GatewayEvent::MemberLeave {
                guild_id,
                user_id,
                display_name,
            } => {
                if guild_id != self.ctx.config().guild_id {
                    debug!(%guild_id, "Ignoring leave from untracked guild");
                    return;
                }
                self.handle_leave(user_id, &display_name).await;
            }
            GatewayEvent::MessageCreate(message) => self.handle_message(message).await,
            GatewayEvent::Navigation {
                message_id,
                user_id,
                direction,
            } => self.handle_navigation(message_id, user_id, direction).await,
        }
    }

    /// Client ready: rebuild the invite cache and ensure the pinned guide.
    async fn handle_ready(&self) {
        let guild_id = self.ctx.config().guild_id;

        match self.ctx.gateway().list_invites(guild_id).await {
            Ok(invites) => {
                self.invites.replace(guild_id, &invites);
                info!(count = invites.len(), "Cached existing invites");
            }
            Err(e) => error!(error = %e, "Failed to cache invites on ready"),
        }

        let commands_channel = self.ctx.config().channels.commands;
        if let Err(e) = ensure_pinned_guide(&self.ctx, commands_channel).await {
            warn!(error = %e, "Failed to ensure pinned guide");
        }

        // Startup publish; later runs come from the interval and from
        // event-triggered requests.
        self.refresh.request();
        info!("Dispatcher ready");
    }

    /// Member join: attribute or reactivate, then refresh the board.
    async fn handle_join(&self, member: RosterMember) {
        info!(member_id = %member.id, name = %member.display_name, "Member joined");

        match AttributionService::new(&self.ctx)
            .handle_join(&self.invites, &member)
            .await
        {
            Ok(outcome) => debug!(?outcome, "Join processed"),
            Err(e) => {
                error!(error = %e, member_id = %member.id, "Failed to process join");
                AuditService::new(&self.ctx)
                    .record(AuditEvent::error(
                        "join_failed",
                        json!({ "member_id": member.id, "error": e.to_string() }),
                    ))
                    .await;
                self.notify_ops(&format!("Failed to process join of {}", member.id))
                    .await;
            }
        }

        self.refresh.request();
    }

    /// Member leave: deactivate every row naming them, log the departure.
    async fn handle_leave(&self, user_id: Snowflake, display_name: &str) {
        info!(member_id = %user_id, name = %display_name, "Member left");

        match self.ctx.referral_repo().deactivate_member(user_id).await {
            Ok(rows) => {
                if let Err(e) = HistoryService::new(&self.ctx).record_leave(user_id).await {
                    warn!(error = %e, "Failed to record leave in history");
                }
                AuditService::new(&self.ctx)
                    .record(AuditEvent::info(
                        "member_left",
                        json!({ "member_id": user_id, "deactivated_rows": rows }),
                    ))
                    .await;
            }
            Err(e) => {
                error!(error = %e, member_id = %user_id, "Failed to deactivate referrals");
                AuditService::new(&self.ctx)
                    .record(AuditEvent::error(
                        "leave_failed",
                        json!({ "member_id": user_id, "error": e.to_string() }),
                    ))
                    .await;
                self.notify_ops(&format!("Failed to process departure of {user_id}"))
                    .await;
            }
        }

        self.refresh.request();
    }

    /// Message: parse, guard, execute, reply.
    async fn handle_message(&self, message: IncomingMessage) {
        let command = match commands::parse_message(&message.content) {
            Ok(ParseOutcome::NotACommand) => return,
            Ok(ParseOutcome::Unknown(name)) => {
                self.reply(&message, CommandError::Unknown(name).rejection_payload())
                    .await;
                return;
            }
            Ok(ParseOutcome::Command(command)) => command,
            Err(e) => {
                self.reply(&message, e.rejection_payload()).await;
                return;
            }
        };

        let spec = CommandSpec::for_command(&command);
        if let Err(e) = spec.check(self.ctx.config(), &message) {
            debug!(command = command.name(), user_id = %message.author.id, "Check failed");
            self.reply(&message, e.rejection_payload()).await;
            return;
        }
        if spec.cooldown_gated() {
            if let Err(e) = self.cooldowns.check(message.author.id, command.name()) {
                self.reply(&message, e.rejection_payload()).await;
                return;
            }
        }

        info!(command = command.name(), user_id = %message.author.id, "Command invoked");
        match self.execute(&command, &message).await {
            Ok(CommandReply::Single(payload)) => self.reply(&message, payload).await,
            Ok(CommandReply::Paginated(pages)) => self.reply_paginated(&message, pages).await,
            Err(e) => {
                if e.is_unexpected() {
                    error!(error = %e, command = command.name(), "Command failed");
                    AuditService::new(&self.ctx)
                        .record(AuditEvent::error(
                            "command_failed",
                            json!({
                                "command": command.name(),
                                "user_id": message.author.id,
                                "error": e.to_string(),
                            }),
                        ))
                        .await;
                } else {
                    info!(error = %e, command = command.name(), "Command rejected");
                }
                self.reply(&message, e.rejection_payload()).await;
            }
        }
    }

    async fn execute(
        &self,
        command: &Command,
        message: &IncomingMessage,
    ) -> Result<CommandReply, CommandError> {
        match command {
            Command::Validate => commands::run_validate(&self.ctx, &self.refresh).await,
            Command::RefreshBoard => commands::run_refresh_board(&self.ctx, &self.refresh).await,
            Command::MyReferrals => commands::run_my_referrals(&self.ctx, &message.author).await,
            Command::Leaderboard => commands::run_leaderboard(&self.ctx).await,
            Command::InviteHistory { member } => {
                commands::run_invite_history(&self.ctx, *member).await
            }
            Command::InviteStats => commands::run_invite_stats(&self.ctx).await,
            Command::AuditLogs { limit } => commands::run_audit_logs(&self.ctx, *limit).await,
            Command::ResetHistory => {
                commands::run_reset_history(&self.ctx, message.author.id).await
            }
        }
    }

    /// Pagination navigation: step the session and edit the message.
    async fn handle_navigation(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        direction: NavDirection,
    ) {
        let Some((channel_id, page)) = self.sessions.navigate(message_id, user_id, direction)
        else {
            return;
        };

        if let Err(e) = self
            .ctx
            .gateway()
            .edit_message(channel_id, message_id, &page)
            .await
        {
            if e.is_expected_absent() {
                info!(message_id = %message_id, "Paginated message gone, navigation dropped");
            } else {
                warn!(error = %e, "Failed to edit paginated message");
            }
        }
    }

    /// Best-effort notice to the operations log channel.
    async fn notify_ops(&self, text: &str) {
        let payload = MessagePayload::new("Bot Notice").with_description(text.to_string());
        if let Err(e) = self
            .ctx
            .gateway()
            .send_message(self.ctx.config().channels.logs, &payload)
            .await
        {
            warn!(error = %e, "Failed to send ops notice");
        }
    }

    /// Reply where the command came from: the DM channel or the guild
    /// channel.
    async fn reply(&self, message: &IncomingMessage, payload: MessagePayload) {
        let result = if message.is_dm() {
            self.ctx
                .gateway()
                .send_dm(message.author.id, &payload)
                .await
        } else {
            self.ctx
                .gateway()
                .send_message(message.channel_id, &payload)
                .await
        };

        if let Err(e) = result {
            warn!(error = %e, "Failed to send reply");
        }
    }

    /// Send the first page and track a session for the rest.
    async fn reply_paginated(&self, message: &IncomingMessage, pages: Vec<MessagePayload>) {
        if pages.is_empty() {
            return;
        }
        let session = Session::new(message.channel_id, message.author.id, pages);
        let first = session.current().clone();

        let result = if message.is_dm() {
            self.ctx.gateway().send_dm(message.author.id, &first).await
        } else {
            self.ctx
                .gateway()
                .send_message(message.channel_id, &first)
                .await
        };

        match result {
            Ok(message_id) => self.sessions.register(message_id, session),
            Err(e) => warn!(error = %e, "Failed to send paginated reply"),
        }
    }
}
