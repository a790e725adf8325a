//! Database models - `FromRow` structs mirroring the persisted schema

mod audit_log;
mod board_message;
mod member_history;
mod referral;

pub use audit_log::AuditLogModel;
pub use board_message::BoardMessageModel;
pub use member_history::MemberHistoryModel;
pub use referral::{ReferralModel, StandingModel, StatsModel};
