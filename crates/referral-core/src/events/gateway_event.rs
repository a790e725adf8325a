//! Gateway events - everything the platform delivers to the bot
//!
//! The (out-of-scope) platform adapter translates its wire protocol into
//! these and feeds them to the dispatcher in arrival order.

use crate::entities::RosterMember;
use crate::value_objects::Snowflake;

/// A command or chat message as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// `None` for direct messages.
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    pub author: RosterMember,
    pub content: String,
}

impl IncomingMessage {
    #[inline]
    pub fn is_dm(&self) -> bool {
        self.guild_id.is_none()
    }
}

/// Direction of a pagination navigation interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

/// All inbound events the dispatcher reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// Connection established; caches are cold and must be rebuilt.
    Ready,

    /// A member joined a guild.
    MemberJoin {
        guild_id: Snowflake,
        member: RosterMember,
    },

    /// A member left a guild. Only the identity survives the departure.
    MemberLeave {
        guild_id: Snowflake,
        user_id: Snowflake,
        display_name: String,
    },

    /// A message was posted where the bot can see it.
    MessageCreate(IncomingMessage),

    /// Reaction-add or button press on a paginated message.
    Navigation {
        message_id: Snowflake,
        user_id: Snowflake,
        direction: NavDirection,
    },
}
