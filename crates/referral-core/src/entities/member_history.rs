//! Member history entry - append-only membership log
//!
//! One row per observed join/leave/role-snapshot event. Rows are never
//! mutated after insert; `was_previous_resident` on rejoin is inferred from
//! this log.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// What kind of observation a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    /// Member joined the guild.
    Join,
    /// Member left the guild.
    Leave,
    /// Role snapshot taken mid-membership (validation pass observation).
    Current,
}

impl MemberAction {
    /// Stable string form used in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Current => "current",
        }
    }

    /// Parse the database string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "join" => Some(Self::Join),
            "leave" => Some(Self::Leave),
            "current" => Some(Self::Current),
            _ => None,
        }
    }
}

/// Append-only member history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHistoryEntry {
    /// Row id; zero until persisted.
    pub id: i64,
    pub member_id: Snowflake,
    pub action: MemberAction,
    pub recorded_at: DateTime<Utc>,
    /// Whether the member held the required role when this was recorded.
    pub had_required_role: bool,
}

impl MemberHistoryEntry {
    /// Create an entry stamped with the current time, not yet persisted.
    pub fn new(member_id: Snowflake, action: MemberAction, had_required_role: bool) -> Self {
        Self {
            id: 0,
            member_id,
            action,
            recorded_at: Utc::now(),
            had_required_role,
        }
    }
}
