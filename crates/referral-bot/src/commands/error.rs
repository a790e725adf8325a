//! Command error handling
//!
//! Maps every failure class to a user-facing rejection payload. Nothing
//! here retries, queues, or kills the process.

use thiserror::Error;

use referral_core::entities::MessagePayload;
use referral_service::ServiceError;

/// Errors raised while routing or executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Check failed: {reason}")]
    CheckFailed { reason: String },

    #[error("On cooldown for {retry_after_secs}s")]
    Cooldown { retry_after_secs: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CommandError {
    /// The payload shown to the invoking user.
    pub fn rejection_payload(&self) -> MessagePayload {
        match self {
            Self::Unknown(_) => MessagePayload::new("Command Not Found")
                .with_description("That command doesn't exist. Here are the available commands:")
                .with_field(
                    "Available Commands",
                    "- `!myreferrals` - View your referral history\n\
                     - `!leaderboard` - Show the referral rankings",
                )
                .with_footer("Tip: use these commands in a direct message to the bot"),

            Self::CheckFailed { reason } => MessagePayload::new("Permission Error")
                .with_description(
                    "You don't have permission to use this command or you're using it in the \
                     wrong place.",
                )
                .with_field("What happened?", reason.clone()),

            Self::Cooldown { retry_after_secs } => MessagePayload::new("Slow Down")
                .with_description(format!(
                    "You can use this command again in {retry_after_secs} seconds."
                )),

            Self::InvalidArgument(reason) => {
                MessagePayload::new("Invalid Argument").with_description(reason.clone())
            }

            Self::Service(e) if e.is_expected_absent() => {
                MessagePayload::new("Not Found").with_description(format!("Error: {e}"))
            }

            Self::Service(e) if e.is_storage() => MessagePayload::new("Error Occurred")
                .with_description(
                    "Something went wrong saving your request. Please try again later.",
                ),

            Self::Service(_) => MessagePayload::new("Error Occurred")
                .with_description("An unexpected error occurred.")
                .with_field(
                    "What to do?",
                    "Please try again later or contact an administrator if the problem persists.",
                ),
        }
    }

    /// Whether the failure deserves an error-level log line (as opposed to
    /// routine user mistakes).
    pub fn is_unexpected(&self) -> bool {
        match self {
            Self::Service(e) => !e.is_expected_absent(),
            _ => false,
        }
    }
}
