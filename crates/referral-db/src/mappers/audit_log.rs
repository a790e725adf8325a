//! Audit event entity <-> model mappers

use referral_core::entities::{AuditEvent, AuditSeverity};
use referral_core::error::DomainError;

use crate::models::AuditLogModel;

/// Convert AuditLogModel to AuditEvent, rejecting unknown severity strings.
impl TryFrom<AuditLogModel> for AuditEvent {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        let severity = AuditSeverity::parse(&model.severity).ok_or_else(|| {
            DomainError::InternalError(format!("unknown audit severity: {}", model.severity))
        })?;

        Ok(AuditEvent {
            id: model.id,
            event_type: model.event_type,
            payload: model.payload,
            severity,
            created_at: model.created_at,
        })
    }
}
