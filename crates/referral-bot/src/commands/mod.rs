//! Command surface
//!
//! `!`-prefixed text commands, their guards, and their handlers.

mod admin;
mod checks;
mod error;
mod member;
mod pagination;
mod parse;

pub use admin::{
    run_audit_logs, run_invite_history, run_invite_stats, run_refresh_board, run_reset_history,
    run_validate,
};
pub use checks::{Access, CommandSpec, Cooldowns};
pub use error::CommandError;
pub use member::{run_leaderboard, run_my_referrals};
pub use pagination::{PaginationSessions, Session};
pub use parse::{parse_message, Command, ParseOutcome};

use referral_core::entities::MessagePayload;

/// What a handler wants sent back to the invoker.
#[derive(Debug, Clone)]
pub enum CommandReply {
    /// One payload.
    Single(MessagePayload),
    /// A multi-page report; the dispatcher sends the first page and tracks
    /// a pagination session for the rest.
    Paginated(Vec<MessagePayload>),
}
