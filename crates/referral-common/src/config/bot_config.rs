//! Bot configuration structs
//!
//! Loads configuration from environment variables (with `.env` support).
//! Platform credentials stay with the out-of-process platform adapter and
//! are deliberately absent here.

use serde::Deserialize;
use std::env;

use referral_core::Snowflake;

/// Main bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub app_env: Environment,
    pub database: DatabaseConfig,
    pub guild_id: Snowflake,
    pub channels: ChannelConfig,
    /// Name of the role both referral parties must hold.
    pub required_role: String,
    /// Per-user window for self-service commands, in seconds.
    pub command_cooldown_secs: u64,
    pub leaderboard: LeaderboardConfig,
    /// Scheduled validate-and-publish interval, in seconds.
    pub refresh_interval_secs: u64,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://referrals.db`.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Channel wiring
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Channel where admin commands are accepted.
    pub commands: Snowflake,
    /// Channel the leaderboard is published to.
    pub leaderboard: Snowflake,
    /// Channel operational notices go to.
    pub logs: Snowflake,
}

impl ChannelConfig {
    /// Channels on the admin-command allow-list.
    pub fn allows_commands(&self, channel_id: Snowflake) -> bool {
        channel_id == self.commands || channel_id == self.leaderboard
    }
}

/// Leaderboard shaping: size and the denylist are policy knobs, not code.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_leaderboard_size")]
    pub size: i64,
    /// Inviter ids excluded from standings.
    #[serde(default)]
    pub excluded_inviters: Vec<Snowflake>,
}

// Default value functions
fn default_max_connections() -> u32 {
    5
}

fn default_leaderboard_size() -> i64 {
    10
}

fn default_cooldown_secs() -> u64 {
    900
}

fn default_refresh_interval_secs() -> u64 {
    86400
}

fn default_required_role() -> String {
    "Resident".to_string()
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app_env: env::var("APP_ENV")
                .ok()
                .and_then(|s| match s.to_lowercase().as_str() {
                    "production" => Some(Environment::Production),
                    "staging" => Some(Environment::Staging),
                    "development" => Some(Environment::Development),
                    _ => None,
                })
                .unwrap_or_default(),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
            },
            guild_id: require_snowflake("GUILD_ID")?,
            channels: ChannelConfig {
                commands: require_snowflake("COMMANDS_CHANNEL_ID")?,
                leaderboard: require_snowflake("LEADERBOARD_CHANNEL_ID")?,
                logs: require_snowflake("LOG_CHANNEL_ID")?,
            },
            required_role: env::var("REQUIRED_ROLE").unwrap_or_else(|_| default_required_role()),
            command_cooldown_secs: env::var("COMMAND_COOLDOWN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_cooldown_secs),
            leaderboard: LeaderboardConfig {
                size: env::var("LEADERBOARD_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_leaderboard_size),
                excluded_inviters: parse_id_list(
                    env::var("LEADERBOARD_EXCLUDED_IDS").ok().as_deref(),
                )?,
            },
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_refresh_interval_secs),
        })
    }
}

fn require_snowflake(var: &'static str) -> Result<Snowflake, ConfigError> {
    let raw = env::var(var).map_err(|_| ConfigError::MissingVar(var))?;
    Snowflake::parse(raw.trim()).map_err(|_| ConfigError::InvalidValue(var, raw))
}

fn parse_id_list(raw: Option<&str>) -> Result<Vec<Snowflake>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Snowflake::parse(s)
                .map_err(|_| ConfigError::InvalidValue("LEADERBOARD_EXCLUDED_IDS", s.to_string()))
        })
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
