//! Referral entity - one tracked (inviter, invitee) relationship
//!
//! At most one *active* referral exists per invitee; a rejoin reactivates the
//! historical row instead of inserting a second one.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Lifecycle of a referral, made explicit instead of being derived from the
/// `is_member_active` / `is_validated` flag pair.
///
/// `Unseen` is the absence of a row and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralState {
    /// No record exists for this invitee yet.
    Unseen,
    /// Invitee is a member; the pair has not passed the role check.
    ActivePending,
    /// Invitee is a member and both parties hold the required role.
    ActiveValidated,
    /// Invitee left the server; the row is retained for reactivation.
    Inactive,
}

impl ReferralState {
    /// Reconstruct a state from the persisted flag pair.
    ///
    /// An inactive row is never validated, whatever the stored flag says.
    pub fn from_flags(active: bool, validated: bool) -> Self {
        match (active, validated) {
            (true, true) => Self::ActiveValidated,
            (true, false) => Self::ActivePending,
            (false, _) => Self::Inactive,
        }
    }

    /// The `(is_member_active, is_validated)` pair this state persists as.
    pub fn flags(self) -> (bool, bool) {
        match self {
            Self::ActiveValidated => (true, true),
            Self::ActivePending => (true, false),
            Self::Unseen | Self::Inactive => (false, false),
        }
    }

    /// The member (re)joined. Validation is reset pending the next pass.
    pub fn join(self) -> Self {
        Self::ActivePending
    }

    /// The member left. Terminal until a rejoin.
    pub fn leave(self) -> Self {
        Self::Inactive
    }

    /// Apply the outcome of a validation pass. Inactive rows are untouched;
    /// active rows move between pending and validated.
    pub fn revalidate(self, eligible: bool) -> Self {
        match self {
            Self::ActivePending | Self::ActiveValidated => {
                if eligible {
                    Self::ActiveValidated
                } else {
                    Self::ActivePending
                }
            }
            other => other,
        }
    }

    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::ActivePending | Self::ActiveValidated)
    }

    #[inline]
    pub fn is_validated(self) -> bool {
        matches!(self, Self::ActiveValidated)
    }
}

/// Referral entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    pub inviter_id: Snowflake,
    /// Inviter display name at attribution time (denormalized snapshot).
    pub inviter_name: String,
    pub invitee_id: Snowflake,
    /// Invitee display name at join time (denormalized snapshot).
    pub invitee_name: String,
    /// Code of the invite link the invitee consumed.
    pub invite_code: String,
    pub joined_at: DateTime<Utc>,
    pub state: ReferralState,
    /// The invitee held the required role during a prior membership span.
    pub was_previous_resident: bool,
}

impl Referral {
    /// Create a freshly attributed referral, pending validation.
    pub fn new(
        inviter_id: Snowflake,
        inviter_name: String,
        invitee_id: Snowflake,
        invitee_name: String,
        invite_code: String,
    ) -> Self {
        Self {
            inviter_id,
            inviter_name,
            invitee_id,
            invitee_name,
            invite_code,
            joined_at: Utc::now(),
            state: ReferralState::ActivePending,
            was_previous_resident: false,
        }
    }

    /// Whether `member_id` appears on either side of the relationship.
    pub fn involves(&self, member_id: Snowflake) -> bool {
        self.inviter_id == member_id || self.invitee_id == member_id
    }
}
