//! Referral database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the referrals table
#[derive(Debug, Clone, FromRow)]
pub struct ReferralModel {
    pub inviter_id: i64,
    pub inviter_name: String,
    pub invitee_id: i64,
    pub invitee_name: String,
    pub invite_code: String,
    pub joined_at: DateTime<Utc>,
    pub is_validated: bool,
    pub is_member_active: bool,
    pub was_previous_resident: bool,
}

/// Aggregated standings row (GROUP BY inviter over active referrals)
#[derive(Debug, Clone, FromRow)]
pub struct StandingModel {
    pub inviter_id: i64,
    pub inviter_name: String,
    pub validated: i64,
    pub pending: i64,
    pub total: i64,
}

/// Whole-table counters for the stats report
#[derive(Debug, Clone, Copy, FromRow)]
pub struct StatsModel {
    pub total: i64,
    pub active: i64,
    pub validated: i64,
    pub distinct_inviters: i64,
}
