//! Roster member - a current guild member as reported by the platform

use crate::value_objects::Snowflake;

/// Live view of a guild member: identity, display name, and roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterMember {
    pub id: Snowflake,
    pub display_name: String,
    pub role_ids: Vec<Snowflake>,
    /// Platform-side administrator permission; command guards key off this.
    pub is_admin: bool,
}

impl RosterMember {
    pub fn new(id: Snowflake, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role_ids: Vec::new(),
            is_admin: false,
        }
    }

    /// Check if the member carries a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    pub fn with_roles(mut self, role_ids: Vec<Snowflake>) -> Self {
        self.role_ids = role_ids;
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}
