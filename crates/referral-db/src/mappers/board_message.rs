//! Board message entity <-> model mappers

use referral_core::entities::BoardMessage;
use referral_core::value_objects::Snowflake;

use crate::models::BoardMessageModel;

/// Convert BoardMessageModel to BoardMessage entity
impl From<BoardMessageModel> for BoardMessage {
    fn from(model: BoardMessageModel) -> Self {
        BoardMessage {
            guild_id: Snowflake::new(model.guild_id),
            channel_id: Snowflake::new(model.channel_id),
            message_id: Snowflake::new(model.message_id),
            updated_at: model.updated_at,
        }
    }
}
