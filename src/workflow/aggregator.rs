//! Pure decision aggregation over a request's collected responses.

use std::collections::HashSet;

use crate::models::approval::{
    ApprovalRequest, ApprovalResponse, ApprovalTier, Decision, ResponseDecision,
};

/// Evaluate a request's responses against its required tiers.
///
/// Rules, in order:
/// 1. any `reject` response from a user eligible on some tier →
///    [`Decision::Rejected`] (short-circuit, no override);
/// 2. every tier's distinct eligible approver count ≥ its quorum →
///    [`Decision::Approved`];
/// 3. otherwise → [`Decision::Pending`].
///
/// Tiers are evaluated independently: a user eligible on two tiers counts
/// toward both. Duplicate approvals from one user count once per tier.
/// `request_changes` responses count toward neither outcome.
#[must_use]
pub fn evaluate(request: &ApprovalRequest, responses: &[ApprovalResponse]) -> Decision {
    if responses
        .iter()
        .any(|r| r.decision == ResponseDecision::Reject && request.is_eligible(&r.user_id))
    {
        return Decision::Rejected;
    }

    let all_satisfied = request
        .required_tiers
        .iter()
        .all(|tier| tier_approvals(tier, responses) >= tier.required as usize);

    if all_satisfied {
        Decision::Approved
    } else {
        Decision::Pending
    }
}

/// Count distinct eligible users who approved on the given tier.
fn tier_approvals(tier: &ApprovalTier, responses: &[ApprovalResponse]) -> usize {
    let approvers: HashSet<&str> = responses
        .iter()
        .filter(|r| r.decision == ResponseDecision::Approve)
        .filter(|r| tier.eligible.contains(&r.user_id))
        .map(|r| r.user_id.as_str())
        .collect();
    approvers.len()
}
