//! Invite snapshot - one active invite link as reported by the platform

use crate::value_objects::Snowflake;

/// Point-in-time view of an invite link: its code, owner, and use count.
///
/// Attribution works purely by diffing two of these listings, so nothing
/// else (max age, max uses, channel) is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteSnapshot {
    pub code: String,
    pub inviter_id: Snowflake,
    /// Inviter display name at listing time; denormalized into new referrals.
    pub inviter_name: String,
    pub uses: i32,
}

impl InviteSnapshot {
    pub fn new(
        code: impl Into<String>,
        inviter_id: Snowflake,
        inviter_name: impl Into<String>,
        uses: i32,
    ) -> Self {
        Self {
            code: code.into(),
            inviter_id,
            inviter_name: inviter_name.into(),
            uses,
        }
    }
}
