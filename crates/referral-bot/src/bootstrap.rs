//! Bot assembly
//!
//! Builds the pool, schema, repositories, service context, and dispatcher
//! from configuration plus a platform gateway.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use referral_common::{AppError, BotConfig};
use referral_core::{ChatGateway, GatewayEvent};
use referral_db::{
    ensure_schema, SqliteAuditLogRepository, SqliteBoardMessageRepository,
    SqliteMemberHistoryRepository, SqliteReferralRepository,
};
use referral_service::ServiceContext;

use crate::dispatch::Dispatcher;
use crate::event_channel;

/// A fully wired bot: the dispatcher plus its inbound event queue.
pub struct Bot {
    dispatcher: Dispatcher,
    events: mpsc::Receiver<GatewayEvent>,
}

impl Bot {
    /// Initialize all dependencies and return the bot together with the
    /// sender half of its event queue (for the platform adapter).
    pub async fn from_config(
        config: BotConfig,
        gateway: Arc<dyn ChatGateway>,
    ) -> Result<(Self, mpsc::Sender<GatewayEvent>), AppError> {
        info!(url = %config.database.url, "Connecting to SQLite...");
        let db_config = referral_db::DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            ..Default::default()
        };
        let pool = referral_db::create_pool(&db_config)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        ensure_schema(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("SQLite connection established");

        let ctx = ServiceContext::new(
            Arc::new(config),
            Arc::new(SqliteReferralRepository::new(pool.clone())),
            Arc::new(SqliteMemberHistoryRepository::new(pool.clone())),
            Arc::new(SqliteAuditLogRepository::new(pool.clone())),
            Arc::new(SqliteBoardMessageRepository::new(pool)),
            gateway,
        );

        Ok(Self::from_context(ctx))
    }

    /// Wire a bot over an already-built service context (tests use this with
    /// in-memory repositories behind the same traits).
    pub fn from_context(ctx: ServiceContext) -> (Self, mpsc::Sender<GatewayEvent>) {
        let (tx, events) = event_channel();
        let dispatcher = Dispatcher::new(ctx);
        (Self { dispatcher, events }, tx)
    }

    /// Borrow the dispatcher (tests poke at cooldowns and sessions).
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Consume events until every sender is dropped, then shut down the
    /// scheduler.
    pub async fn run(mut self) {
        info!("Bot event loop starting");
        while let Some(event) = self.events.recv().await {
            self.dispatcher.handle_event(event).await;
        }
        self.dispatcher.shutdown();
        info!("Bot event loop stopped");
    }
}
