//! AI-generated infrastructure recommendation model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Risk classification for a recommended infrastructure action.
///
/// Ordering follows severity: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine change unlikely to cause issues.
    Low,
    /// Change with moderate blast radius.
    Medium,
    /// High-impact change requiring layered review.
    High,
    /// Change affecting core infrastructure or production data.
    Critical,
}

impl RiskLevel {
    /// Notification urgency derived from the risk level.
    #[must_use]
    pub fn urgency(self) -> Urgency {
        match self {
            Self::Low => Urgency::Info,
            Self::Medium => Urgency::Warning,
            Self::High => Urgency::Urgent,
            Self::Critical => Urgency::Critical,
        }
    }

    /// Canonical lowercase name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Urgency attached to outbound notifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Informational, no action pressure.
    Info,
    /// Needs attention within the working day.
    Warning,
    /// Needs prompt attention.
    Urgent,
    /// Needs immediate attention.
    Critical,
}

/// A cloud resource touched by a recommended action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AffectedResource {
    /// Provider-scoped resource identifier.
    pub resource_id: String,
    /// Resource kind (e.g. `vm`, `bucket`, `cluster`).
    pub resource_type: String,
    /// Cloud provider the resource lives in.
    pub provider: String,
    /// Environment tag (`production`, `staging`, `dev`, ...).
    pub environment: String,
}

impl AffectedResource {
    /// Whether this resource carries the production environment tag.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Estimated impact of executing a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EstimatedImpact {
    /// Projected monthly cost delta in USD (negative = savings).
    pub cost_delta_usd: f64,
    /// Expected execution duration in minutes.
    pub duration_minutes: u64,
    /// Number of resources the action touches.
    pub resource_count: u32,
    /// Human-readable benefit summary.
    pub benefit: String,
}

/// An AI-proposed infrastructure action awaiting authorization.
///
/// Immutable once submitted: the coordinator takes it by value and it lives
/// inside the owning [`crate::models::approval::ApprovalRequest`] thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Recommendation {
    /// Unique recommendation identifier.
    pub id: Uuid,
    /// Registered action name (e.g. `scale_infrastructure`).
    pub action: String,
    /// Human-readable description of the proposed change.
    pub description: String,
    /// Model reasoning behind the proposal.
    pub reasoning: String,
    /// Model confidence in the range `0.0..=1.0`.
    pub confidence: f64,
    /// Risk classification.
    pub risk_level: RiskLevel,
    /// Estimated cost/duration/benefit impact.
    pub estimated_impact: EstimatedImpact,
    /// Resources the action touches, each with an environment tag.
    pub affected_resources: Vec<AffectedResource>,
    /// Identified risks of executing the action.
    pub risks: Vec<String>,
    /// Alternative actions that were considered.
    pub alternatives: Vec<String>,
    /// Ordered execution steps.
    pub execution_plan: Vec<String>,
    /// Ordered rollback steps, if the action is reversible.
    pub rollback_plan: Option<Vec<String>>,
}

impl Recommendation {
    /// Whether any affected resource is tagged `production`.
    #[must_use]
    pub fn touches_production(&self) -> bool {
        self.affected_resources.iter().any(AffectedResource::is_production)
    }
}
