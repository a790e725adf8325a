//! Service context - dependency container for services
//!
//! Holds the repositories, the gateway port, and configuration needed by
//! services.

use std::sync::Arc;

use referral_common::BotConfig;
use referral_core::traits::{
    AuditLogRepository, BoardMessageRepository, ChatGateway, MemberHistoryRepository,
    ReferralRepository,
};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The chat-platform gateway port
/// - Bot configuration
#[derive(Clone)]
pub struct ServiceContext {
    config: Arc<BotConfig>,

    // Repositories
    referral_repo: Arc<dyn ReferralRepository>,
    history_repo: Arc<dyn MemberHistoryRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,
    board_repo: Arc<dyn BoardMessageRepository>,

    // Platform boundary
    gateway: Arc<dyn ChatGateway>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        config: Arc<BotConfig>,
        referral_repo: Arc<dyn ReferralRepository>,
        history_repo: Arc<dyn MemberHistoryRepository>,
        audit_repo: Arc<dyn AuditLogRepository>,
        board_repo: Arc<dyn BoardMessageRepository>,
        gateway: Arc<dyn ChatGateway>,
    ) -> Self {
        Self {
            config,
            referral_repo,
            history_repo,
            audit_repo,
            board_repo,
            gateway,
        }
    }

    /// Get the bot configuration
    pub fn config(&self) -> &BotConfig {
        self.config.as_ref()
    }

    /// Get the referral repository
    pub fn referral_repo(&self) -> &dyn ReferralRepository {
        self.referral_repo.as_ref()
    }

    /// Get the member history repository
    pub fn history_repo(&self) -> &dyn MemberHistoryRepository {
        self.history_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_repo(&self) -> &dyn AuditLogRepository {
        self.audit_repo.as_ref()
    }

    /// Get the board message repository
    pub fn board_repo(&self) -> &dyn BoardMessageRepository {
        self.board_repo.as_ref()
    }

    /// Get the chat gateway port
    pub fn gateway(&self) -> &dyn ChatGateway {
        self.gateway.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("guild_id", &self.config.guild_id)
            .field("repositories", &"...")
            .field("gateway", &"...")
            .finish()
    }
}
