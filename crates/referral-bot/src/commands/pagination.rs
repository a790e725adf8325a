//! Pagination sessions
//!
//! Multi-page reports keep their pages in memory keyed by the message id;
//! navigation events (reaction-add or button press) move the index and hand
//! back the payload to edit in.

use dashmap::DashMap;

use referral_core::entities::MessagePayload;
use referral_core::events::NavDirection;
use referral_core::value_objects::Snowflake;

/// One live paginated message.
#[derive(Debug, Clone)]
pub struct Session {
    pub channel_id: Snowflake,
    /// Only the user who ran the command may page through it.
    pub owner_id: Snowflake,
    pages: Vec<MessagePayload>,
    index: usize,
}

impl Session {
    pub fn new(channel_id: Snowflake, owner_id: Snowflake, pages: Vec<MessagePayload>) -> Self {
        Self {
            channel_id,
            owner_id,
            pages,
            index: 0,
        }
    }

    pub fn current(&self) -> &MessagePayload {
        &self.pages[self.index]
    }

    /// Move within bounds; `None` when already at the edge.
    fn step(&mut self, direction: NavDirection) -> Option<&MessagePayload> {
        let next = match direction {
            NavDirection::Previous => self.index.checked_sub(1)?,
            NavDirection::Next => {
                let next = self.index + 1;
                (next < self.pages.len()).then_some(next)?
            }
        };
        self.index = next;
        Some(&self.pages[self.index])
    }
}

/// Live sessions keyed by message id.
#[derive(Debug, Default)]
pub struct PaginationSessions {
    sessions: DashMap<Snowflake, Session>,
}

impl PaginationSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly sent multi-page message. Single-page reports are not
    /// worth a session.
    pub fn register(&self, message_id: Snowflake, session: Session) {
        if session.pages.len() > 1 {
            self.sessions.insert(message_id, session);
        }
    }

    /// Apply a navigation event. Returns the channel and the new page when
    /// the event targets a live session, belongs to its owner, and actually
    /// moves the index.
    pub fn navigate(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        direction: NavDirection,
    ) -> Option<(Snowflake, MessagePayload)> {
        let mut entry = self.sessions.get_mut(&message_id)?;
        if entry.owner_id != user_id {
            return None;
        }
        let channel_id = entry.channel_id;
        let page = entry.step(direction)?.clone();
        Some((channel_id, page))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
