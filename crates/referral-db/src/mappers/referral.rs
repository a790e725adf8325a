//! Referral entity <-> model mappers

use referral_core::entities::{Referral, ReferralState};
use referral_core::traits::StandingRow;
use referral_core::value_objects::Snowflake;

use crate::models::{ReferralModel, StandingModel};

/// Convert ReferralModel to Referral entity
impl From<ReferralModel> for Referral {
    fn from(model: ReferralModel) -> Self {
        Referral {
            inviter_id: Snowflake::new(model.inviter_id),
            inviter_name: model.inviter_name,
            invitee_id: Snowflake::new(model.invitee_id),
            invitee_name: model.invitee_name,
            invite_code: model.invite_code,
            joined_at: model.joined_at,
            state: ReferralState::from_flags(model.is_member_active, model.is_validated),
            was_previous_resident: model.was_previous_resident,
        }
    }
}

/// Convert StandingModel to StandingRow
impl From<StandingModel> for StandingRow {
    fn from(model: StandingModel) -> Self {
        StandingRow {
            inviter_id: Snowflake::new(model.inviter_id),
            inviter_name: model.inviter_name,
            validated: model.validated,
            pending: model.pending,
            total: model.total,
        }
    }
}
