//! Command guards
//!
//! Admin commands are restricted to the configured channels; self-service
//! commands are DM-only and cooldown-gated. A violated guard produces a
//! rejection, never a queued retry.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use referral_common::BotConfig;
use referral_core::events::IncomingMessage;
use referral_core::value_objects::Snowflake;

use super::error::CommandError;
use super::parse::Command;

/// Where a command may be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Admin only, in the configured command channels.
    AdminChannels,
    /// Anyone, but only in a direct message, and rate-limited per user.
    DmOnly,
}

/// Static routing facts about a command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub access: Access,
}

impl CommandSpec {
    /// Look up the spec for a parsed command.
    pub fn for_command(command: &Command) -> Self {
        match command {
            Command::Validate
            | Command::RefreshBoard
            | Command::InviteHistory { .. }
            | Command::InviteStats
            | Command::AuditLogs { .. }
            | Command::ResetHistory => Self {
                access: Access::AdminChannels,
            },
            Command::MyReferrals | Command::Leaderboard => Self {
                access: Access::DmOnly,
            },
        }
    }

    /// Apply every guard except the cooldown (checked separately so a
    /// rejected channel does not consume the user's window).
    pub fn check(&self, config: &BotConfig, message: &IncomingMessage) -> Result<(), CommandError> {
        match self.access {
            Access::AdminChannels => {
                if !message.author.is_admin {
                    return Err(CommandError::CheckFailed {
                        reason: "This command requires administrator permissions.".to_string(),
                    });
                }
                if message.is_dm() || !config.channels.allows_commands(message.channel_id) {
                    return Err(CommandError::CheckFailed {
                        reason: "Use this command in the designated command channels.".to_string(),
                    });
                }
                Ok(())
            }
            Access::DmOnly => {
                if !message.is_dm() {
                    return Err(CommandError::CheckFailed {
                        reason: "Send this command to me in a direct message.".to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    #[inline]
    pub fn cooldown_gated(&self) -> bool {
        matches!(self.access, Access::DmOnly)
    }
}

/// Per-user, per-command invocation windows: one call per window.
pub struct Cooldowns {
    window: Duration,
    last_used: DashMap<(Snowflake, &'static str), Instant>,
}

impl Cooldowns {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_used: DashMap::new(),
        }
    }

    /// Admit or reject an invocation. Admission stamps the window whether or
    /// not the command later succeeds.
    pub fn check(&self, user_id: Snowflake, command: &'static str) -> Result<(), CommandError> {
        let key = (user_id, command);
        let now = Instant::now();

        if let Some(last) = self.last_used.get(&key) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.window {
                let retry_after_secs = (self.window - elapsed).as_secs().max(1);
                return Err(CommandError::Cooldown { retry_after_secs });
            }
        }

        self.last_used.insert(key, now);
        Ok(())
    }
}
