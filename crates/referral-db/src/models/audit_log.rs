//! Audit log database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for the audit_log table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: i64,
    pub event_type: String,
    /// JSON object with the structured event detail
    pub payload: JsonValue,
    /// Severity stored as string: "info" | "warning" | "error"
    pub severity: String,
    pub created_at: DateTime<Utc>,
}
