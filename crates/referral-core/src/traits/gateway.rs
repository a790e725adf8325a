//! Chat gateway port - the bot's one window onto the platform
//!
//! Everything the bot needs from the chat platform goes through this trait:
//! invite listings, roster lookups, and message delivery. The real adapter
//! lives outside this workspace; tests use an in-memory fake.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{InviteSnapshot, MessagePayload, RosterMember};
use crate::value_objects::Snowflake;

/// Errors surfaced by the platform boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Missing platform permission: {0}")]
    PermissionDenied(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

impl GatewayError {
    /// Expected-absent conditions: logged and worked around, never fatal.
    pub fn is_expected_absent(&self) -> bool {
        matches!(
            self,
            Self::MessageNotFound(_)
                | Self::ChannelNotFound(_)
                | Self::RoleNotFound(_)
                | Self::MemberNotFound(_)
        )
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A pinned message's identity and searchable text, for the guide scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedMessage {
    pub message_id: Snowflake,
    pub content: String,
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Current active invite listing for a guild, in platform order
    async fn list_invites(&self, guild_id: Snowflake) -> GatewayResult<Vec<InviteSnapshot>>;

    /// Look up a current member; `None` when they are not in the roster
    async fn member(&self, guild_id: Snowflake, user_id: Snowflake)
        -> GatewayResult<Option<RosterMember>>;

    /// Resolve a role by name; `None` when no such role exists
    async fn role_id(&self, guild_id: Snowflake, name: &str) -> GatewayResult<Option<Snowflake>>;

    /// Send a payload to a channel; returns the new message id
    async fn send_message(
        &self,
        channel_id: Snowflake,
        payload: &MessagePayload,
    ) -> GatewayResult<Snowflake>;

    /// Replace an existing message's payload in place
    async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        payload: &MessagePayload,
    ) -> GatewayResult<()>;

    /// Delete a message
    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> GatewayResult<()>;

    /// Send a payload to a user's direct-message channel; returns the message id
    async fn send_dm(&self, user_id: Snowflake, payload: &MessagePayload)
        -> GatewayResult<Snowflake>;

    /// List a channel's pinned messages
    async fn pinned_messages(&self, channel_id: Snowflake) -> GatewayResult<Vec<PinnedMessage>>;

    /// Pin a message in a channel
    async fn pin_message(&self, channel_id: Snowflake, message_id: Snowflake)
        -> GatewayResult<()>;
}
