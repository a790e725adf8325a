//! Audit event - append-only operational log entry
//!
//! Write-only from the bot's perspective; read back only by the `auditlogs`
//! admin command.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

/// Severity attached to an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditSeverity {
    Info,
    Warning,
    Error,
}

impl AuditSeverity {
    /// Stable string form used in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Parse the database string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Append-only audit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Row id; zero until persisted.
    pub id: i64,
    /// Machine-readable event type, e.g. `referral_created`.
    pub event_type: String,
    /// Structured JSON detail.
    pub payload: JsonValue,
    pub severity: AuditSeverity,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    fn new(event_type: impl Into<String>, payload: JsonValue, severity: AuditSeverity) -> Self {
        Self {
            id: 0,
            event_type: event_type.into(),
            payload,
            severity,
            created_at: Utc::now(),
        }
    }

    /// An informational event.
    pub fn info(event_type: impl Into<String>, payload: JsonValue) -> Self {
        Self::new(event_type, payload, AuditSeverity::Info)
    }

    /// A warning event.
    pub fn warning(event_type: impl Into<String>, payload: JsonValue) -> Self {
        Self::new(event_type, payload, AuditSeverity::Warning)
    }

    /// An error event.
    pub fn error(event_type: impl Into<String>, payload: JsonValue) -> Self {
        Self::new(event_type, payload, AuditSeverity::Error)
    }
}
