//! Structured audit logging for approval workflow events.
//!
//! Provides the [`AuditLogger`] trait and associated types. The primary
//! implementation, [`JsonlAuditWriter`], appends JSONL records to one file
//! per calendar day. Auto-approved recommendations leave no pending state
//! behind, so the audit trail is their only record.

pub mod writer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::models::recommendation::RiskLevel;

/// Event type classification for audit log entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// A recommendation entered the approval workflow.
    Submitted,
    /// A recommendation bypassed human review and executed.
    AutoApproved,
    /// A pending request reached full tier quorum.
    Approved,
    /// An eligible approver rejected a pending request.
    Rejected,
    /// A pending request's deadline expired and escalation fired.
    Escalated,
    /// Action execution failed after approval.
    ExecutionFailed,
    /// Rollback of a failed action itself failed.
    RollbackFailed,
}

/// A structured record of one approval workflow event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// ISO 8601 timestamp with timezone.
    pub timestamp: DateTime<Utc>,
    /// Event classification.
    pub event_type: AuditEventType,
    /// Recommendation identifier.
    pub recommendation_id: Uuid,
    /// Approval request identifier (absent for auto-approvals).
    pub request_id: Option<Uuid>,
    /// Action name of the recommendation.
    pub action: String,
    /// Risk classification at submission.
    pub risk_level: RiskLevel,
    /// Acting identity: submitter or responding approver.
    pub actor: Option<String>,
    /// Free-form detail (rejection comments, failure message, ...).
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Construct a minimal audit entry for the given event type.
    #[must_use]
    pub fn new(
        event_type: AuditEventType,
        recommendation_id: Uuid,
        action: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            recommendation_id,
            request_id: None,
            action: action.into(),
            risk_level,
            actor: None,
            detail: None,
        }
    }

    /// Set the approval request identifier for this entry.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Set the acting identity for this entry.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the free-form detail for this entry.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Writes structured audit entries to a persistent store.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// async task boundaries via [`std::sync::Arc`].
pub trait AuditLogger: Send + Sync {
    /// Record a single audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write operation fails.
    fn log_entry(&self, entry: AuditEntry) -> crate::Result<()>;
}

/// Audit logger that emits entries as structured `tracing` events.
///
/// The default when no durable audit sink is configured.
#[derive(Debug, Default)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn log_entry(&self, entry: AuditEntry) -> crate::Result<()> {
        info!(
            event = ?entry.event_type,
            recommendation_id = %entry.recommendation_id,
            action = %entry.action,
            risk = entry.risk_level.as_str(),
            actor = entry.actor.as_deref().unwrap_or("-"),
            "audit"
        );
        Ok(())
    }
}

pub use writer::JsonlAuditWriter;
