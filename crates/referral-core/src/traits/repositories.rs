//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{AuditEvent, BoardMessage, MemberHistoryEntry, Referral, ReferralState};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Referral Repository
// ============================================================================

/// One leaderboard standings row: per-inviter counts over active referrals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingRow {
    pub inviter_id: Snowflake,
    /// Denormalized inviter name, fallback when the member left the roster.
    pub inviter_name: String,
    pub validated: i64,
    pub pending: i64,
    pub total: i64,
}

/// Aggregate referral counters for the `invitestats` report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferralStats {
    pub total: i64,
    pub active: i64,
    pub validated: i64,
    pub distinct_inviters: i64,
}

#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// Find the referral row for an invitee (active or not)
    async fn find_by_invitee(&self, invitee_id: Snowflake) -> RepoResult<Option<Referral>>;

    /// List referrals attributed to an inviter, newest join first
    async fn find_by_inviter(&self, inviter_id: Snowflake) -> RepoResult<Vec<Referral>>;

    /// List every active referral
    async fn list_active(&self) -> RepoResult<Vec<Referral>>;

    /// Insert a freshly attributed referral
    async fn create(&self, referral: &Referral) -> RepoResult<()>;

    /// Persist a recomputed state for an invitee's row
    async fn set_state(&self, invitee_id: Snowflake, state: ReferralState) -> RepoResult<()>;

    /// Reactivate the row where `invitee_id` was invited; validation resets,
    /// `was_previous_resident` is overwritten with the supplied inference.
    /// Returns affected row count.
    async fn reactivate_invitee(
        &self,
        invitee_id: Snowflake,
        was_previous_resident: bool,
    ) -> RepoResult<u64>;

    /// Reactivate rows where the rejoining member was the inviter.
    /// Returns affected row count.
    async fn reactivate_inviter(&self, inviter_id: Snowflake) -> RepoResult<u64>;

    /// Deactivate and invalidate every row naming `member_id` on either side.
    /// Returns affected row count.
    async fn deactivate_member(&self, member_id: Snowflake) -> RepoResult<u64>;

    /// Ranked standings over active referrals: validated desc, total desc,
    /// denylisted inviters excluded, truncated to `limit`.
    async fn standings(&self, excluded: &[Snowflake], limit: i64) -> RepoResult<Vec<StandingRow>>;

    /// Aggregate counters over the whole table
    async fn stats(&self) -> RepoResult<ReferralStats>;
}

// ============================================================================
// Member History Repository
// ============================================================================

#[async_trait]
pub trait MemberHistoryRepository: Send + Sync {
    /// Append an entry; the log is never updated in place
    async fn append(&self, entry: &MemberHistoryEntry) -> RepoResult<()>;

    /// List a member's entries, oldest first
    async fn find_by_member(&self, member_id: Snowflake) -> RepoResult<Vec<MemberHistoryEntry>>;

    /// Whether any entry records the member holding the required role
    async fn held_role_before(&self, member_id: Snowflake) -> RepoResult<bool>;

    /// Total entry count
    async fn count(&self) -> RepoResult<i64>;

    /// Drop all entries (admin reset). Returns deleted row count.
    async fn clear(&self) -> RepoResult<u64>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append an event; the log is never updated in place
    async fn append(&self, event: &AuditEvent) -> RepoResult<()>;

    /// Most recent events, newest first
    async fn recent(&self, limit: i64) -> RepoResult<Vec<AuditEvent>>;

    /// Total event count
    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Board Message Repository
// ============================================================================

#[async_trait]
pub trait BoardMessageRepository: Send + Sync {
    /// The currently tracked leaderboard message for a guild, if any
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<BoardMessage>>;

    /// Record the handle of a freshly published leaderboard, replacing any
    /// previous handle for the guild
    async fn upsert(&self, handle: &BoardMessage) -> RepoResult<()>;

    /// Forget the tracked handle for a guild
    async fn clear(&self, guild_id: Snowflake) -> RepoResult<()>;
}
