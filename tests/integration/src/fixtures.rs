//! Test fixtures
//!
//! A harness wiring the real SQLite repositories (in-memory pool) and the
//! fake gateway into a service context.

use std::sync::Arc;

use referral_common::{
    BotConfig, ChannelConfig, DatabaseConfig, Environment, LeaderboardConfig,
};
use referral_core::entities::{InviteSnapshot, RosterMember};
use referral_core::value_objects::Snowflake;
use referral_db::{
    ensure_schema, SqliteAuditLogRepository, SqliteBoardMessageRepository,
    SqliteMemberHistoryRepository, SqliteReferralRepository,
};
use referral_service::ServiceContext;

/// The guild every test runs in.
pub const GUILD_ID: i64 = 1;
/// Admin command channel.
pub const COMMANDS_CHANNEL: i64 = 10;
/// Published leaderboard channel.
pub const LEADERBOARD_CHANNEL: i64 = 11;

/// Default test configuration
pub fn test_config() -> BotConfig {
    BotConfig {
        app_env: Environment::Development,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        guild_id: Snowflake::new(GUILD_ID),
        channels: ChannelConfig {
            commands: Snowflake::new(COMMANDS_CHANNEL),
            leaderboard: Snowflake::new(LEADERBOARD_CHANNEL),
            logs: Snowflake::new(12),
        },
        required_role: "Resident".to_string(),
        command_cooldown_secs: 900,
        leaderboard: LeaderboardConfig {
            size: 10,
            excluded_inviters: Vec::new(),
        },
        refresh_interval_secs: 86400,
    }
}

/// A fully wired test environment.
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub gateway: Arc<crate::helpers::FakeGateway>,
}

impl TestHarness {
    /// Build a harness with the default config and the "Resident" role
    /// already registered.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: BotConfig) -> Self {
        // Every connection to `sqlite::memory:` is its own database, so the
        // pool is pinned to one connection.
        let db_config = referral_db::DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: 1,
            ..Default::default()
        };
        let pool = referral_db::create_pool(&db_config)
            .await
            .expect("in-memory pool");
        ensure_schema(&pool).await.expect("schema");

        let gateway = Arc::new(crate::helpers::FakeGateway::new());
        gateway.add_role(&config.required_role);

        let chat_gateway: Arc<dyn referral_core::traits::ChatGateway> = gateway.clone();
        let ctx = ServiceContext::new(
            Arc::new(config),
            Arc::new(SqliteReferralRepository::new(pool.clone())),
            Arc::new(SqliteMemberHistoryRepository::new(pool.clone())),
            Arc::new(SqliteAuditLogRepository::new(pool.clone())),
            Arc::new(SqliteBoardMessageRepository::new(pool)),
            chat_gateway,
        );

        Self { ctx, gateway }
    }

    /// The id of the required role the harness registered.
    pub async fn required_role_id(&self) -> Snowflake {
        use referral_core::traits::ChatGateway;
        self.gateway
            .role_id(
                self.ctx.config().guild_id,
                &self.ctx.config().required_role,
            )
            .await
            .unwrap()
            .expect("required role registered by harness")
    }

    /// Put a member in the roster, optionally holding the required role.
    pub async fn join_roster(&self, mut member: RosterMember, with_role: bool) -> RosterMember {
        if with_role {
            let role_id = self.required_role_id().await;
            member.role_ids.push(role_id);
        }
        self.gateway.add_member(member.clone());
        member
    }
}

/// A roster member fixture
pub fn member(id: i64, name: &str) -> RosterMember {
    RosterMember::new(Snowflake::new(id), name)
}

/// An invite snapshot fixture
pub fn invite(code: &str, inviter_id: i64, inviter_name: &str, uses: i32) -> InviteSnapshot {
    InviteSnapshot::new(code, Snowflake::new(inviter_id), inviter_name, uses)
}
