//! Board message - the persisted handle of the published leaderboard

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Identity of the most recently published leaderboard message.
///
/// At most one per guild; superseded handles are overwritten, not appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardMessage {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub updated_at: DateTime<Utc>,
}

impl BoardMessage {
    pub fn new(guild_id: Snowflake, channel_id: Snowflake, message_id: Snowflake) -> Self {
        Self {
            guild_id,
            channel_id,
            message_id,
            updated_at: Utc::now(),
        }
    }
}
