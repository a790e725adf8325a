//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Referral not found for invitee: {0}")]
    ReferralNotFound(Snowflake),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("No leaderboard message recorded for guild: {0}")]
    BoardMessageNotFound(Snowflake),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Active referral already exists for invitee: {0}")]
    ReferralExists(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for reporting
    pub fn code(&self) -> &'static str {
        match self {
            Self::ReferralNotFound(_) => "UNKNOWN_REFERRAL",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::BoardMessageNotFound(_) => "UNKNOWN_BOARD_MESSAGE",
            Self::ReferralExists(_) => "REFERRAL_EXISTS",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ReferralNotFound(_)
                | Self::MemberNotFound(_)
                | Self::RoleNotFound(_)
                | Self::BoardMessageNotFound(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReferralExists(_))
    }

    /// Check if this is a storage-layer error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }
}
