//! Member history database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the member_history table
#[derive(Debug, Clone, FromRow)]
pub struct MemberHistoryModel {
    pub id: i64,
    pub member_id: i64,
    /// Action kind stored as string: "join" | "leave" | "current"
    pub action: String,
    pub recorded_at: DateTime<Utc>,
    pub had_required_role: bool,
}
