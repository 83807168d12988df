//! Approval request, tier, and response models.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::recommendation::{Recommendation, RiskLevel};

/// A required signer group: role plus a minimum distinct-approver count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ApprovalTier {
    /// Role name (e.g. `senior_engineer`).
    pub role: String,
    /// Minimum number of distinct approving users required.
    pub required: u32,
    /// User ids eligible to sign for this tier, resolved at request build
    /// time from the role directory.
    pub eligible: HashSet<String>,
}

impl ApprovalTier {
    /// Construct a tier requiring `required` distinct approvers of `role`.
    #[must_use]
    #[allow(clippy::implicit_hasher)] // Eligibility sets always use the default hasher.
    pub fn new(role: impl Into<String>, required: u32, eligible: HashSet<String>) -> Self {
        Self {
            role: role.into(),
            required,
            eligible,
        }
    }
}

/// A pending approval request awaiting tier sign-off.
///
/// Required tiers are fixed at creation and never change once approvers
/// begin responding. Owned exclusively by the request store until terminal
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ApprovalRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The recommendation under review.
    pub recommendation: Recommendation,
    /// Identity that submitted the recommendation.
    pub submitted_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Ordered list of required approval tiers.
    pub required_tiers: Vec<ApprovalTier>,
    /// Deadline after which the escalation hook fires.
    pub timeout: Duration,
    /// Per-risk auto-approve threshold, retained for audit only; the
    /// classifier gates on its own hard-coded confidence literal.
    pub auto_approve_threshold: f64,
    /// Free-form submission context (environment, repo, branch, commit).
    pub context: HashMap<String, String>,
}

impl ApprovalRequest {
    /// Whether `user_id` is eligible to respond on any required tier.
    #[must_use]
    pub fn is_eligible(&self, user_id: &str) -> bool {
        self.required_tiers.iter().any(|t| t.eligible.contains(user_id))
    }

    /// Risk level of the underlying recommendation.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.recommendation.risk_level
    }
}

/// One approver's decision on a pending request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ApprovalResponse {
    /// Target request identifier.
    pub request_id: Uuid,
    /// Responding user identifier.
    pub user_id: String,
    /// The decision taken.
    pub decision: ResponseDecision,
    /// Free-form comments.
    pub comments: Option<String>,
    /// Optional modification payload accompanying `request_changes`.
    pub modifications: Option<serde_json::Value>,
    /// Response timestamp.
    pub responded_at: DateTime<Utc>,
}

impl ApprovalResponse {
    /// Construct a response with the current timestamp.
    #[must_use]
    pub fn new(request_id: Uuid, user_id: impl Into<String>, decision: ResponseDecision) -> Self {
        Self {
            request_id,
            user_id: user_id.into(),
            decision,
            comments: None,
            modifications: None,
            responded_at: Utc::now(),
        }
    }

    /// Attach comments to this response.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Decision carried by a single approval response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseDecision {
    /// Counts toward the responder's tier quorum.
    Approve,
    /// Immediately resolves the request as rejected.
    Reject,
    /// Pending-preserving feedback; counts toward neither outcome.
    RequestChanges,
}

/// Aggregate outcome of evaluating a request's collected responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// One or more tiers still lack quorum.
    Pending,
    /// Every required tier reached quorum.
    Approved,
    /// At least one eligible approver rejected.
    Rejected,
}

/// Handle returned by `submit`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The recommendation bypassed human review and executed immediately.
    AutoApproved {
        /// Identifier of the executed recommendation.
        recommendation_id: Uuid,
    },
    /// The recommendation is awaiting tier sign-off.
    PendingApproval {
        /// Identifier of the stored approval request.
        request_id: Uuid,
    },
}

/// Terminal outcome recorded in the resolution history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Auto-approved and executed without a pending request.
    AutoApproved,
    /// Approved by the required tiers.
    Approved,
    /// Rejected by an eligible approver.
    Rejected,
    /// Timed out and escalated; the request remained pending.
    TimedOutEscalated,
    /// Approved but the downstream action failed.
    ExecutionFailed,
}

/// One entry in the coordinator's resolution history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ResolutionRecord {
    /// Request id, or recommendation id for auto-approvals.
    pub id: Uuid,
    /// Action name of the underlying recommendation.
    pub action: String,
    /// Risk classification at submission.
    pub risk_level: RiskLevel,
    /// How the request resolved.
    pub outcome: ResolutionOutcome,
    /// Resolution timestamp.
    pub resolved_at: DateTime<Utc>,
    /// Snapshot of the collected responses (empty for auto-approvals).
    pub responses: Vec<ApprovalResponse>,
}
