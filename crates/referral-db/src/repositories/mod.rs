//! Repository implementations over SQLite

mod audit_log;
mod board_message;
mod error;
mod member_history;
mod referral;

pub use audit_log::SqliteAuditLogRepository;
pub use board_message::SqliteBoardMessageRepository;
pub use member_history::SqliteMemberHistoryRepository;
pub use referral::SqliteReferralRepository;
