//! Member history entity <-> model mappers

use referral_core::entities::{MemberAction, MemberHistoryEntry};
use referral_core::error::DomainError;
use referral_core::value_objects::Snowflake;

use crate::models::MemberHistoryModel;

/// Convert MemberHistoryModel to MemberHistoryEntry, rejecting unknown
/// action strings rather than guessing.
impl TryFrom<MemberHistoryModel> for MemberHistoryEntry {
    type Error = DomainError;

    fn try_from(model: MemberHistoryModel) -> Result<Self, Self::Error> {
        let action = MemberAction::parse(&model.action).ok_or_else(|| {
            DomainError::InternalError(format!("unknown member action: {}", model.action))
        })?;

        Ok(MemberHistoryEntry {
            id: model.id,
            member_id: Snowflake::new(model.member_id),
            action,
            recorded_at: model.recorded_at,
            had_required_role: model.had_required_role,
        })
    }
}
