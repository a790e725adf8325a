//! # referral-bot
//!
//! Edge layer: wires platform events and `!`-prefixed commands to the
//! services. The chat platform itself stays behind the `ChatGateway` port;
//! an out-of-tree adapter owns credentials and the wire protocol, feeds
//! [`GatewayEvent`]s into [`Bot::run`], and renders the payloads the bot
//! sends back through the port.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use referral_bot::Bot;
//! use referral_common::BotConfig;
//!
//! async fn example(gateway: Arc<dyn referral_core::ChatGateway>) -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let (bot, events_tx) = Bot::from_config(config, gateway).await?;
//!     // hand events_tx to the platform adapter...
//!     bot.run().await;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod dispatch;

mod bootstrap;

pub use bootstrap::Bot;
pub use dispatch::Dispatcher;

use referral_core::GatewayEvent;

/// Buffer size for the inbound event queue. Events are processed in strict
/// arrival order by a single consumer.
pub const EVENT_QUEUE_SIZE: usize = 256;

/// Create the inbound event channel the platform adapter writes into.
pub fn event_channel() -> (
    tokio::sync::mpsc::Sender<GatewayEvent>,
    tokio::sync::mpsc::Receiver<GatewayEvent>,
) {
    tokio::sync::mpsc::channel(EVENT_QUEUE_SIZE)
}
