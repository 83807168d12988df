//! Static mapping from risk level to required approval tiers.

use tracing::info;

use crate::external::RoleDirectory;
use crate::models::approval::ApprovalTier;
use crate::models::recommendation::{Recommendation, RiskLevel};
use crate::{AppError, Result};

/// Role asked to sign low-risk changes.
pub const ROLE_ENGINEER: &str = "engineer";
/// Role asked to sign medium- and high-risk changes.
pub const ROLE_SENIOR_ENGINEER: &str = "senior_engineer";
/// Role asked to sign high- and critical-risk changes.
pub const ROLE_TEAM_LEAD: &str = "team_lead";
/// Role asked to sign critical-risk changes.
pub const ROLE_MANAGER: &str = "manager";
/// Extra role required when a critical change touches production.
pub const ROLE_ADMIN: &str = "admin";

/// Static risk → tier policy.
pub struct PolicyTable;

impl PolicyTable {
    /// Ordered role names required for the given recommendation.
    ///
    /// Critical changes that touch a production-tagged resource require an
    /// additional admin signature after manager sign-off.
    #[must_use]
    pub fn required_roles(risk: RiskLevel, touches_production: bool) -> Vec<&'static str> {
        match risk {
            RiskLevel::Low => vec![ROLE_ENGINEER],
            RiskLevel::Medium => vec![ROLE_SENIOR_ENGINEER],
            RiskLevel::High => vec![ROLE_SENIOR_ENGINEER, ROLE_TEAM_LEAD],
            RiskLevel::Critical => {
                if touches_production {
                    vec![ROLE_TEAM_LEAD, ROLE_MANAGER, ROLE_ADMIN]
                } else {
                    vec![ROLE_TEAM_LEAD, ROLE_MANAGER]
                }
            }
        }
    }

    /// Build the ordered tier list for a recommendation, resolving each
    /// tier's eligible set from the role directory.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Policy`] if any required role has fewer eligible
    /// users than its quorum — a tier misconfiguration that must fail the
    /// submission before any state is persisted.
    pub async fn required_tiers(
        recommendation: &Recommendation,
        directory: &dyn RoleDirectory,
    ) -> Result<Vec<ApprovalTier>> {
        let roles =
            Self::required_roles(recommendation.risk_level, recommendation.touches_production());

        let mut tiers = Vec::with_capacity(roles.len());
        for role in roles {
            let eligible = directory.eligible_users(role).await;
            let required = 1u32;
            if eligible.len() < required as usize {
                return Err(AppError::Policy(format!(
                    "tier misconfiguration: role {role} has {} eligible users, {required} required",
                    eligible.len()
                )));
            }
            tiers.push(ApprovalTier::new(role, required, eligible));
        }

        info!(
            recommendation_id = %recommendation.id,
            risk = recommendation.risk_level.as_str(),
            tiers = tiers.len(),
            "resolved required approval tiers"
        );

        Ok(tiers)
    }

    /// Per-risk auto-approve threshold, retained on requests for audit.
    ///
    /// Auto-approval itself is gated solely by
    /// [`crate::policy::AUTO_APPROVE_CONFIDENCE`]; this value is computed and
    /// stored but never consulted by the classifier. The critical threshold
    /// is above 1.0, i.e. unattainable.
    #[must_use]
    pub fn auto_approve_threshold(risk: RiskLevel) -> f64 {
        match risk {
            RiskLevel::Low => 0.95,
            RiskLevel::Medium => 0.98,
            RiskLevel::High => 0.995,
            RiskLevel::Critical => 1.01,
        }
    }
}
