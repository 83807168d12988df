//! Auto-approval classification for incoming recommendations.

use chrono::{Datelike, Timelike, Weekday};
use tracing::info;

use crate::config::BusinessHoursConfig;
use crate::external::{ActionHistory, Clock};
use crate::models::recommendation::{Recommendation, RiskLevel};

/// Confidence a recommendation must exceed to skip human review.
///
/// Deliberately a hard-coded literal rather than
/// [`crate::policy::PolicyTable::auto_approve_threshold`]: the per-risk
/// threshold is carried on requests for audit but has never gated the
/// decision.
pub const AUTO_APPROVE_CONFIDENCE: f64 = 0.95;

/// Decides whether a recommendation may bypass human review.
pub struct RiskClassifier;

impl RiskClassifier {
    /// Whether the recommendation qualifies for automatic approval.
    ///
    /// All of the following must hold:
    /// 1. risk level is low;
    /// 2. confidence strictly exceeds [`AUTO_APPROVE_CONFIDENCE`];
    /// 3. no affected resource is tagged `production`;
    /// 4. the action type has a recorded historical-success signal;
    /// 5. the local clock reads a weekday inside business hours.
    ///
    /// Pure given its inputs; pass a fixed [`Clock`] to test against a
    /// known instant.
    #[must_use]
    pub fn is_auto_approvable(
        recommendation: &Recommendation,
        history: &dyn ActionHistory,
        clock: &dyn Clock,
        hours: &BusinessHoursConfig,
    ) -> bool {
        if recommendation.risk_level != RiskLevel::Low {
            return false;
        }
        if recommendation.confidence <= AUTO_APPROVE_CONFIDENCE {
            return false;
        }
        if recommendation.touches_production() {
            return false;
        }
        if !history.has_succeeded(&recommendation.action) {
            return false;
        }
        if !within_business_hours(clock, hours) {
            return false;
        }

        info!(
            recommendation_id = %recommendation.id,
            action = %recommendation.action,
            confidence = recommendation.confidence,
            "recommendation eligible for auto-approval"
        );
        true
    }
}

/// Whether the local clock reads Mon–Fri inside the configured window.
fn within_business_hours(clock: &dyn Clock, hours: &BusinessHoursConfig) -> bool {
    let now = clock.now_local();
    let weekday = matches!(
        now.weekday(),
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri
    );
    weekday && now.hour() >= hours.start_hour && now.hour() < hours.end_hour
}
