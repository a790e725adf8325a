//! SQLite implementation of BoardMessageRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use referral_core::entities::BoardMessage;
use referral_core::traits::{BoardMessageRepository, RepoResult};
use referral_core::value_objects::Snowflake;

use crate::models::BoardMessageModel;

use super::error::map_db_error;

/// SQLite implementation of BoardMessageRepository
#[derive(Clone)]
pub struct SqliteBoardMessageRepository {
    pool: SqlitePool,
}

impl SqliteBoardMessageRepository {
    /// Create a new SqliteBoardMessageRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardMessageRepository for SqliteBoardMessageRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<BoardMessage>> {
        let result = sqlx::query_as::<_, BoardMessageModel>(
            r#"
            SELECT guild_id, channel_id, message_id, updated_at
            FROM board_messages
            WHERE guild_id = ?
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(BoardMessage::from))
    }

    #[instrument(skip(self, handle))]
    async fn upsert(&self, handle: &BoardMessage) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO board_messages (guild_id, channel_id, message_id, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (guild_id) DO UPDATE SET
                channel_id = excluded.channel_id,
                message_id = excluded.message_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(handle.guild_id.into_inner())
        .bind(handle.channel_id.into_inner())
        .bind(handle.message_id.into_inner())
        .bind(handle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self, guild_id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM board_messages WHERE guild_id = ?")
            .bind(guild_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
