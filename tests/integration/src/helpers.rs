//! In-memory `ChatGateway` fake
//!
//! Scripted roster, roles, and invite listings; every outbound message is
//! recorded so tests can assert on what the bot said and where.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use referral_core::entities::{InviteSnapshot, MessagePayload, RosterMember};
use referral_core::traits::{ChatGateway, GatewayError, GatewayResult, PinnedMessage};
use referral_core::value_objects::Snowflake;

/// One recorded outbound message.
#[derive(Debug, Clone)]
pub struct FakeMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub payload: MessagePayload,
    pub deleted: bool,
    /// Set when the message was delivered as a DM.
    pub dm_to: Option<Snowflake>,
}

#[derive(Default)]
struct GatewayState {
    invites: Vec<InviteSnapshot>,
    members: HashMap<Snowflake, RosterMember>,
    roles: HashMap<String, Snowflake>,
    messages: Vec<FakeMessage>,
    pins: HashMap<Snowflake, Vec<PinnedMessage>>,
    next_message_id: i64,
    fail_edits: bool,
}

/// Scripted in-memory platform.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<GatewayState>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    // === scripting ===

    pub fn set_invites(&self, invites: Vec<InviteSnapshot>) {
        self.state.lock().invites = invites;
    }

    /// Bump an existing invite's use count, as the platform would after a
    /// join.
    pub fn set_invite_uses(&self, code: &str, uses: i32) {
        let mut state = self.state.lock();
        if let Some(invite) = state.invites.iter_mut().find(|i| i.code == code) {
            invite.uses = uses;
        }
    }

    pub fn add_member(&self, member: RosterMember) {
        self.state.lock().members.insert(member.id, member);
    }

    pub fn remove_member(&self, member_id: Snowflake) {
        self.state.lock().members.remove(&member_id);
    }

    /// Register a role by name; ids are handed out sequentially from 9000.
    pub fn add_role(&self, name: &str) -> Snowflake {
        let mut state = self.state.lock();
        let id = Snowflake::new(9000 + state.roles.len() as i64);
        state.roles.insert(name.to_string(), id);
        id
    }

    pub fn grant_role(&self, member_id: Snowflake, role_id: Snowflake) {
        let mut state = self.state.lock();
        if let Some(member) = state.members.get_mut(&member_id) {
            if !member.has_role(role_id) {
                member.role_ids.push(role_id);
            }
        }
    }

    pub fn revoke_role(&self, member_id: Snowflake, role_id: Snowflake) {
        let mut state = self.state.lock();
        if let Some(member) = state.members.get_mut(&member_id) {
            member.role_ids.retain(|id| *id != role_id);
        }
    }

    /// Make every edit fail, to exercise the delete-and-recreate fallback.
    pub fn fail_edits(&self, fail: bool) {
        self.state.lock().fail_edits = fail;
    }

    // === inspection ===

    pub fn messages(&self) -> Vec<FakeMessage> {
        self.state.lock().messages.clone()
    }

    /// Non-deleted messages in a channel.
    pub fn live_messages(&self, channel_id: Snowflake) -> Vec<FakeMessage> {
        self.state
            .lock()
            .messages
            .iter()
            .filter(|m| m.channel_id == channel_id && !m.deleted)
            .cloned()
            .collect()
    }

    /// DMs delivered to a user.
    pub fn dms_to(&self, user_id: Snowflake) -> Vec<FakeMessage> {
        self.state
            .lock()
            .messages
            .iter()
            .filter(|m| m.dm_to == Some(user_id))
            .cloned()
            .collect()
    }

    pub fn find_message(&self, message_id: Snowflake) -> Option<FakeMessage> {
        self.state
            .lock()
            .messages
            .iter()
            .find(|m| m.id == message_id)
            .cloned()
    }

    fn record_message(
        &self,
        channel_id: Snowflake,
        payload: &MessagePayload,
        dm_to: Option<Snowflake>,
    ) -> Snowflake {
        let mut state = self.state.lock();
        state.next_message_id += 1;
        let id = Snowflake::new(state.next_message_id);
        state.messages.push(FakeMessage {
            id,
            channel_id,
            payload: payload.clone(),
            deleted: false,
            dm_to,
        });
        id
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn list_invites(&self, _guild_id: Snowflake) -> GatewayResult<Vec<InviteSnapshot>> {
        Ok(self.state.lock().invites.clone())
    }

    async fn member(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
    ) -> GatewayResult<Option<RosterMember>> {
        Ok(self.state.lock().members.get(&user_id).cloned())
    }

    async fn role_id(&self, _guild_id: Snowflake, name: &str) -> GatewayResult<Option<Snowflake>> {
        Ok(self.state.lock().roles.get(name).copied())
    }

    async fn send_message(
        &self,
        channel_id: Snowflake,
        payload: &MessagePayload,
    ) -> GatewayResult<Snowflake> {
        Ok(self.record_message(channel_id, payload, None))
    }

    async fn edit_message(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        payload: &MessagePayload,
    ) -> GatewayResult<()> {
        let mut state = self.state.lock();
        if state.fail_edits {
            return Err(GatewayError::Platform("edit rejected".to_string()));
        }
        match state
            .messages
            .iter_mut()
            .find(|m| m.id == message_id && !m.deleted)
        {
            Some(message) => {
                message.payload = payload.clone();
                Ok(())
            }
            None => Err(GatewayError::MessageNotFound(message_id)),
        }
    }

    async fn delete_message(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
    ) -> GatewayResult<()> {
        let mut state = self.state.lock();
        match state
            .messages
            .iter_mut()
            .find(|m| m.id == message_id && !m.deleted)
        {
            Some(message) => {
                message.deleted = true;
                Ok(())
            }
            None => Err(GatewayError::MessageNotFound(message_id)),
        }
    }

    async fn send_dm(
        &self,
        user_id: Snowflake,
        payload: &MessagePayload,
    ) -> GatewayResult<Snowflake> {
        // DM channels share the user's id in this fake.
        Ok(self.record_message(user_id, payload, Some(user_id)))
    }

    async fn pinned_messages(&self, channel_id: Snowflake) -> GatewayResult<Vec<PinnedMessage>> {
        Ok(self
            .state
            .lock()
            .pins
            .get(&channel_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn pin_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> GatewayResult<()> {
        let mut state = self.state.lock();
        let content = state
            .messages
            .iter()
            .find(|m| m.id == message_id && !m.deleted)
            .map(|m| m.payload.content_text())
            .ok_or(GatewayError::MessageNotFound(message_id))?;
        state
            .pins
            .entry(channel_id)
            .or_default()
            .push(PinnedMessage {
                message_id,
                content,
            });
        Ok(())
    }
}
