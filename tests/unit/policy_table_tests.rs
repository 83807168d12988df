//! Unit tests for the risk → tier policy table.

use std::collections::HashSet;

use uuid::Uuid;

use cloudgate::external::log::StaticRoleDirectory;
use cloudgate::external::RoleDirectory;
use cloudgate::models::recommendation::{
    AffectedResource, EstimatedImpact, Recommendation, RiskLevel,
};
use cloudgate::policy::PolicyTable;
use cloudgate::AppError;

fn resource(environment: &str) -> AffectedResource {
    AffectedResource {
        resource_id: "vm-1".to_owned(),
        resource_type: "vm".to_owned(),
        provider: "gcp".to_owned(),
        environment: environment.to_owned(),
    }
}

fn recommendation(risk: RiskLevel, environment: &str) -> Recommendation {
    Recommendation {
        id: Uuid::new_v4(),
        action: "rightsize_instance".to_owned(),
        description: "Downsize underutilized instance".to_owned(),
        reasoning: "14-day CPU p95 below 10%".to_owned(),
        confidence: 0.9,
        risk_level: risk,
        estimated_impact: EstimatedImpact {
            cost_delta_usd: -120.0,
            duration_minutes: 10,
            resource_count: 1,
            benefit: "cost savings".to_owned(),
        },
        affected_resources: vec![resource(environment)],
        risks: vec![],
        alternatives: vec![],
        execution_plan: vec!["resize".to_owned()],
        rollback_plan: None,
    }
}

fn full_directory() -> StaticRoleDirectory {
    let members = |names: &[&str]| -> HashSet<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    };
    StaticRoleDirectory::new([
        ("engineer".to_owned(), members(&["eng1", "eng2"])),
        ("senior_engineer".to_owned(), members(&["sen1"])),
        ("team_lead".to_owned(), members(&["lead1"])),
        ("manager".to_owned(), members(&["mgr1"])),
        ("admin".to_owned(), members(&["adm1"])),
    ])
}

// ─── Role mapping ─────────────────────────────────────────────────────

#[test]
fn low_risk_requires_one_engineer() {
    assert_eq!(
        PolicyTable::required_roles(RiskLevel::Low, false),
        vec!["engineer"]
    );
}

#[test]
fn medium_risk_requires_senior_engineer() {
    assert_eq!(
        PolicyTable::required_roles(RiskLevel::Medium, false),
        vec!["senior_engineer"]
    );
}

#[test]
fn high_risk_requires_senior_then_lead() {
    assert_eq!(
        PolicyTable::required_roles(RiskLevel::High, false),
        vec!["senior_engineer", "team_lead"]
    );
}

#[test]
fn critical_risk_requires_lead_then_manager() {
    assert_eq!(
        PolicyTable::required_roles(RiskLevel::Critical, false),
        vec!["team_lead", "manager"]
    );
}

#[test]
fn critical_production_adds_admin_last() {
    assert_eq!(
        PolicyTable::required_roles(RiskLevel::Critical, true),
        vec!["team_lead", "manager", "admin"]
    );
}

#[test]
fn production_flag_only_changes_critical() {
    assert_eq!(
        PolicyTable::required_roles(RiskLevel::High, true),
        vec!["senior_engineer", "team_lead"]
    );
}

// ─── Tier resolution ──────────────────────────────────────────────────

#[tokio::test]
async fn critical_production_tiers_resolve_in_order() {
    let rec = recommendation(RiskLevel::Critical, "production");
    let tiers = PolicyTable::required_tiers(&rec, &full_directory())
        .await
        .expect("tiers resolve");

    let roles: Vec<&str> = tiers.iter().map(|t| t.role.as_str()).collect();
    assert_eq!(roles, vec!["team_lead", "manager", "admin"]);
    assert!(tiers.iter().all(|t| t.required == 1));
    assert!(tiers[2].eligible.contains("adm1"));
}

#[tokio::test]
async fn empty_role_is_tier_misconfiguration() {
    let rec = recommendation(RiskLevel::Medium, "staging");
    let directory = StaticRoleDirectory::default();

    let err = PolicyTable::required_tiers(&rec, &directory)
        .await
        .expect_err("no senior engineers registered");
    assert!(matches!(err, AppError::Policy(_)));
}

// ─── Role directory ───────────────────────────────────────────────────

#[tokio::test]
async fn has_role_checks_current_membership() {
    let directory = full_directory();

    assert!(directory.has_role("sen1", "senior_engineer").await);
    assert!(!directory.has_role("sen1", "admin").await);
    assert!(!directory.has_role("ghost", "engineer").await);
    assert!(!directory.has_role("sen1", "no_such_role").await);
}

#[tokio::test]
async fn grant_adds_members_to_a_role() {
    let mut directory = StaticRoleDirectory::default();
    assert!(!directory.has_role("sen9", "senior_engineer").await);

    directory.grant("senior_engineer", ["sen9".to_owned()]);
    assert!(directory.has_role("sen9", "senior_engineer").await);
}

// ─── Audit threshold ──────────────────────────────────────────────────

#[test]
fn auto_approve_threshold_is_unattainable_for_critical() {
    assert!(PolicyTable::auto_approve_threshold(RiskLevel::Critical) > 1.0);
}

#[test]
fn auto_approve_threshold_rises_with_risk() {
    let low = PolicyTable::auto_approve_threshold(RiskLevel::Low);
    let medium = PolicyTable::auto_approve_threshold(RiskLevel::Medium);
    let high = PolicyTable::auto_approve_threshold(RiskLevel::High);
    assert!(low < medium && medium < high);
}
