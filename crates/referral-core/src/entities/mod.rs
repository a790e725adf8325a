//! Domain entities - core business objects

mod audit;
mod board;
mod invite;
mod member_history;
mod payload;
mod referral;
mod roster;

pub use audit::{AuditEvent, AuditSeverity};
pub use board::BoardMessage;
pub use invite::InviteSnapshot;
pub use member_history::{MemberAction, MemberHistoryEntry};
pub use payload::{MessagePayload, PayloadField};
pub use referral::{Referral, ReferralState};
pub use roster::RosterMember;
