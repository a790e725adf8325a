//! # referral-service
//!
//! Application layer containing business logic: invite attribution, referral
//! validation, leaderboard rendering and publication, and report building.

pub mod services;

pub use services::{
    AttributionService, AuditService, HistoryService, InviteCache, JoinOutcome,
    LeaderboardService, ReportService, ServiceContext, ServiceError, ServiceResult,
    ValidationReport, ValidationService,
};
