//! Board message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the board_messages table
#[derive(Debug, Clone, Copy, FromRow)]
pub struct BoardMessageModel {
    pub guild_id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub updated_at: DateTime<Utc>,
}
