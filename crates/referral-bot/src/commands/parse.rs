//! Command parsing

use referral_core::value_objects::Snowflake;

use super::error::CommandError;

/// Default and maximum row counts for `auditlogs`.
const AUDIT_LOGS_DEFAULT: i64 = 20;
const AUDIT_LOGS_MAX: i64 = 100;

/// A parsed, argument-validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Validate,
    RefreshBoard,
    MyReferrals,
    Leaderboard,
    InviteHistory { member: Snowflake },
    InviteStats,
    AuditLogs { limit: i64 },
    ResetHistory,
}

impl Command {
    /// Stable command name, used for cooldown bookkeeping and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::RefreshBoard => "refreshboard",
            Self::MyReferrals => "myreferrals",
            Self::Leaderboard => "leaderboard",
            Self::InviteHistory { .. } => "invitehistory",
            Self::InviteStats => "invitestats",
            Self::AuditLogs { .. } => "auditlogs",
            Self::ResetHistory => "resethistory",
        }
    }
}

/// What a message turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A well-formed command.
    Command(Command),
    /// `!something` the bot does not know.
    Unknown(String),
    /// Ordinary chatter, not for the bot.
    NotACommand,
}

/// Parse a raw message into a command, if it is one.
pub fn parse_message(content: &str) -> Result<ParseOutcome, CommandError> {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix('!') else {
        return Ok(ParseOutcome::NotACommand);
    };

    let mut words = rest.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(ParseOutcome::NotACommand);
    };
    let name = name.to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match name.as_str() {
        "validate" => Command::Validate,
        "refreshboard" => Command::RefreshBoard,
        "myreferrals" => Command::MyReferrals,
        "leaderboard" => Command::Leaderboard,
        "invitehistory" => {
            let raw = args.first().ok_or_else(|| {
                CommandError::InvalidArgument("Usage: `!invitehistory <member>`".to_string())
            })?;
            Command::InviteHistory {
                member: parse_member_ref(raw)?,
            }
        }
        "invitestats" => Command::InviteStats,
        "auditlogs" => {
            let limit = match args.first() {
                Some(raw) => raw.parse::<i64>().ok().filter(|n| *n > 0).ok_or_else(|| {
                    CommandError::InvalidArgument(
                        "Usage: `!auditlogs [limit]` with a positive limit".to_string(),
                    )
                })?,
                None => AUDIT_LOGS_DEFAULT,
            };
            Command::AuditLogs {
                limit: limit.min(AUDIT_LOGS_MAX),
            }
        }
        "resethistory" => Command::ResetHistory,
        _ => return Ok(ParseOutcome::Unknown(name)),
    };

    Ok(ParseOutcome::Command(command))
}

/// Accept a raw id or a `<@id>` / `<@!id>` mention.
fn parse_member_ref(raw: &str) -> Result<Snowflake, CommandError> {
    let digits = raw
        .trim_start_matches("<@!")
        .trim_start_matches("<@")
        .trim_end_matches('>');

    Snowflake::parse(digits).map_err(|_| {
        CommandError::InvalidArgument(format!("`{raw}` is not a member id or mention"))
    })
}
