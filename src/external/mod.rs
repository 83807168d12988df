//! External collaborator contracts.
//!
//! The engine core never talks to a cloud SDK, a chat transport, or a user
//! directory directly. Each of those concerns is a trait here, injected into
//! the [`crate::workflow::coordinator::WorkflowCoordinator`] at construction
//! so a real implementation can be substituted without touching the state
//! machine. Log-only defaults live in [`log`].

pub mod log;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::models::approval::{ApprovalRequest, ApprovalResponse};
use crate::models::recommendation::{Recommendation, Urgency};
use crate::Result;

/// Audit context handed to the executor alongside an approved action.
#[derive(Debug, Clone)]
pub struct ExecutionAudit {
    /// Identity that submitted the recommendation.
    pub submitted_by: String,
    /// Whether the action bypassed human review.
    pub auto_approved: bool,
    /// Full response trail that authorized the action (empty when
    /// auto-approved).
    pub responses: Vec<ApprovalResponse>,
}

/// Executes approved infrastructure actions.
///
/// The coordinator guarantees at most one `execute` call per approved or
/// auto-approved recommendation; implementations must be idempotent-safe
/// under that contract.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Whether an executor is registered for the given action name.
    fn supports(&self, action: &str) -> bool;

    /// Execute the recommended action.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Execution`] if the action fails.
    async fn execute(&self, recommendation: &Recommendation, audit: &ExecutionAudit)
        -> Result<()>;

    /// Roll back a failed action using its rollback plan.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Rollback`] if the rollback fails.
    async fn rollback(&self, recommendation: &Recommendation) -> Result<()>;
}

/// Payload for an outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Short subject line.
    pub title: String,
    /// Message body.
    pub body: String,
    /// Urgency derived from the recommendation's risk level.
    pub urgency: Urgency,
    /// Target user ids.
    pub recipients: Vec<String>,
}

/// Delivers notifications to approvers and submitters.
///
/// Fire-and-forget: delivery failures are the transport's concern and never
/// propagate back into the workflow.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Dispatch a notification.
    async fn notify(&self, payload: NotificationPayload);
}

/// Resolves role membership.
///
/// Consulted at request build time and per evaluation; the core never caches
/// results beyond the lifetime of a single request (freshness is the
/// directory's concern).
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// User ids currently holding the given role.
    async fn eligible_users(&self, role: &str) -> HashSet<String>;

    /// Whether a user currently holds the given role.
    async fn has_role(&self, user_id: &str, role: &str) -> bool;
}

/// Invoked by the timeout scheduler when a pending request's deadline passes.
///
/// The hook notifies a higher authority; it does not resolve the request.
#[async_trait]
pub trait EscalationHook: Send + Sync {
    /// Handle a timed-out, still-unresolved request.
    async fn on_timeout(&self, request: &ApprovalRequest);
}

/// Historical-success signal for action types.
///
/// Auto-approval requires the action to have a recorded success history;
/// implementations back this with whatever telemetry they keep.
pub trait ActionHistory: Send + Sync {
    /// Whether the action type has previously executed successfully.
    fn has_succeeded(&self, action: &str) -> bool;
}

/// Time source, injectable so the auto-approval predicate is testable
/// against a fixed clock.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current wall-clock time in the engine's local timezone.
    fn now_local(&self) -> NaiveDateTime;
}
