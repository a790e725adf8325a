//! Traits (ports) - interfaces the infrastructure layers implement

mod gateway;
mod repositories;

pub use gateway::{ChatGateway, GatewayError, GatewayResult, PinnedMessage};
pub use repositories::{
    AuditLogRepository, BoardMessageRepository, MemberHistoryRepository, ReferralRepository,
    ReferralStats, RepoResult, StandingRow,
};
