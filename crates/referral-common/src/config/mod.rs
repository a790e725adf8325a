//! Configuration loading

mod bot_config;

pub use bot_config::{
    BotConfig, ChannelConfig, ConfigError, DatabaseConfig, Environment, LeaderboardConfig,
};
