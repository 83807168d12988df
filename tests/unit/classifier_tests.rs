//! Unit tests for the auto-approval predicate against a fixed clock.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use cloudgate::config::BusinessHoursConfig;
use cloudgate::external::log::StaticActionHistory;
use cloudgate::external::Clock;
use cloudgate::models::recommendation::{
    AffectedResource, EstimatedImpact, Recommendation, RiskLevel,
};
use cloudgate::policy::{RiskClassifier, AUTO_APPROVE_CONFIDENCE};

/// Clock pinned to a fixed local instant.
struct FixedClock {
    local: NaiveDateTime,
}

impl FixedClock {
    /// Wednesday 2026-08-26 at the given hour.
    fn weekday_at(hour: u32) -> Self {
        Self {
            local: NaiveDate::from_ymd_opt(2026, 8, 26)
                .unwrap()
                .and_hms_opt(hour, 30, 0)
                .unwrap(),
        }
    }

    /// Saturday 2026-08-29 mid-morning.
    fn saturday() -> Self {
        Self {
            local: NaiveDate::from_ymd_opt(2026, 8, 29)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.local.and_utc()
    }

    fn now_local(&self) -> NaiveDateTime {
        self.local
    }
}

fn recommendation(risk: RiskLevel, confidence: f64, environment: &str) -> Recommendation {
    Recommendation {
        id: Uuid::new_v4(),
        action: "cleanup_snapshots".to_owned(),
        description: "Delete expired snapshots".to_owned(),
        reasoning: "retention policy exceeded".to_owned(),
        confidence,
        risk_level: risk,
        estimated_impact: EstimatedImpact {
            cost_delta_usd: -40.0,
            duration_minutes: 5,
            resource_count: 12,
            benefit: "storage savings".to_owned(),
        },
        affected_resources: vec![AffectedResource {
            resource_id: "snap-1".to_owned(),
            resource_type: "snapshot".to_owned(),
            provider: "aws".to_owned(),
            environment: environment.to_owned(),
        }],
        risks: vec![],
        alternatives: vec![],
        execution_plan: vec!["delete snapshots".to_owned()],
        rollback_plan: None,
    }
}

fn history_with(action: &str) -> StaticActionHistory {
    StaticActionHistory::new([action.to_owned()])
}

fn hours() -> BusinessHoursConfig {
    BusinessHoursConfig::default()
}

// ─── Happy path ───────────────────────────────────────────────────────

#[test]
fn all_conditions_met_is_auto_approvable() {
    let rec = recommendation(RiskLevel::Low, 0.97, "staging");
    assert!(RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::weekday_at(10),
        &hours(),
    ));
}

// ─── Each predicate leg denies on its own ─────────────────────────────

#[test]
fn medium_risk_is_never_auto_approvable() {
    let rec = recommendation(RiskLevel::Medium, 0.99, "staging");
    assert!(!RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::weekday_at(10),
        &hours(),
    ));
}

#[test]
fn confidence_at_threshold_is_denied() {
    // Strictly-greater gate: exactly 0.95 does not qualify.
    let rec = recommendation(RiskLevel::Low, AUTO_APPROVE_CONFIDENCE, "staging");
    assert!(!RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::weekday_at(10),
        &hours(),
    ));
}

#[test]
fn production_resource_is_denied() {
    let rec = recommendation(RiskLevel::Low, 0.97, "production");
    assert!(!RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::weekday_at(10),
        &hours(),
    ));
}

#[test]
fn action_without_success_history_is_denied() {
    let rec = recommendation(RiskLevel::Low, 0.97, "staging");
    assert!(!RiskClassifier::is_auto_approvable(
        &rec,
        &StaticActionHistory::default(),
        &FixedClock::weekday_at(10),
        &hours(),
    ));
}

// ─── Business hours ───────────────────────────────────────────────────

#[test]
fn weekend_is_denied() {
    let rec = recommendation(RiskLevel::Low, 0.97, "staging");
    assert!(!RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::saturday(),
        &hours(),
    ));
}

#[test]
fn before_business_hours_is_denied() {
    let rec = recommendation(RiskLevel::Low, 0.97, "staging");
    assert!(!RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::weekday_at(8),
        &hours(),
    ));
}

#[test]
fn at_end_hour_is_denied() {
    // The window is end-exclusive: 18:30 is outside 09..18.
    let rec = recommendation(RiskLevel::Low, 0.97, "staging");
    assert!(!RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::weekday_at(18),
        &hours(),
    ));
}

#[test]
fn at_start_hour_is_allowed() {
    let rec = recommendation(RiskLevel::Low, 0.97, "staging");
    assert!(RiskClassifier::is_auto_approvable(
        &rec,
        &history_with("cleanup_snapshots"),
        &FixedClock::weekday_at(9),
        &hours(),
    ));
}
