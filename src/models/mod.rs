//! Domain model module declarations.

pub mod approval;
pub mod recommendation;

pub use approval::{
    ApprovalRequest, ApprovalResponse, ApprovalTier, Decision, ResolutionOutcome,
    ResolutionRecord, ResponseDecision, SubmitOutcome,
};
pub use recommendation::{
    AffectedResource, EstimatedImpact, Recommendation, RiskLevel, Urgency,
};
