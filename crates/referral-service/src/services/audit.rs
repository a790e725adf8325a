//! Audit service
//!
//! Thin wrapper over the audit log repository. Recording is best-effort:
//! a failed append is logged and swallowed so it never takes the triggering
//! operation down with it.

use tracing::{instrument, warn};

use referral_core::entities::AuditEvent;
use referral_core::traits::AuditLogRepository;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append an event, swallowing storage failures.
    #[instrument(skip(self, event), fields(event_type = %event.event_type))]
    pub async fn record(&self, event: AuditEvent) {
        if let Err(e) = self.ctx.audit_repo().append(&event).await {
            warn!(error = %e, event_type = %event.event_type, "Failed to record audit event");
        }
    }

    /// Most recent events, newest first.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: i64) -> ServiceResult<Vec<AuditEvent>> {
        Ok(self.ctx.audit_repo().recent(limit).await?)
    }

    /// Total number of recorded events.
    pub async fn count(&self) -> ServiceResult<i64> {
        Ok(self.ctx.audit_repo().count().await?)
    }
}
