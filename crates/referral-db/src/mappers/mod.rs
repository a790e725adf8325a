//! Entity ↔ model mappers

mod audit_log;
mod board_message;
mod member_history;
mod referral;
