//! Auto-approval path tests: immediate execution, no pending state.

use std::collections::HashMap;
use std::sync::Arc;

use super::test_helpers::{auto_approvable, harness, harness_with, FixedClock, RecordingExecutor};
use cloudgate::models::approval::{ResolutionOutcome, SubmitOutcome};

#[tokio::test]
async fn auto_approval_executes_without_pending_state() {
    let h = harness();
    let rec = auto_approvable();
    let rec_id = rec.id;

    let outcome = h
        .coordinator
        .submit(rec, "ai-optimizer", HashMap::new())
        .await
        .expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::AutoApproved {
            recommendation_id: rec_id
        }
    );
    assert!(h.coordinator.store().is_empty().await, "nothing pending");
    assert_eq!(h.coordinator.scheduler().armed_count().await, 0);
    assert!(h.notifier.payloads().is_empty(), "no approver fan-out");

    assert_eq!(h.executor.execution_count(), 1);
    let audit = &h.executor.executions()[0];
    assert!(audit.auto_approved);
    assert_eq!(audit.submitted_by, "ai-optimizer");
    assert!(audit.responses.is_empty());
}

#[tokio::test]
async fn auto_approval_is_recorded_in_history() {
    let h = harness();
    let rec = auto_approvable();
    let rec_id = rec.id;

    h.coordinator
        .submit(rec, "ai-optimizer", HashMap::new())
        .await
        .expect("submit");

    let history = h.coordinator.history(10).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, rec_id);
    assert_eq!(history[0].outcome, ResolutionOutcome::AutoApproved);
    assert!(history[0].responses.is_empty());
}

#[tokio::test]
async fn after_hours_submission_requires_human_approval() {
    let h = harness_with(
        Arc::new(RecordingExecutor::default()),
        FixedClock::after_hours(),
    );

    let outcome = h
        .coordinator
        .submit(auto_approvable(), "ai-optimizer", HashMap::new())
        .await
        .expect("submit");

    assert!(matches!(outcome, SubmitOutcome::PendingApproval { .. }));
    assert_eq!(h.executor.execution_count(), 0);
    assert_eq!(h.coordinator.store().len().await, 1);
}

#[tokio::test]
async fn confidence_at_threshold_is_not_enough() {
    let h = harness();
    let mut rec = auto_approvable();
    rec.confidence = 0.95;

    let outcome = h
        .coordinator
        .submit(rec, "ai-optimizer", HashMap::new())
        .await
        .expect("submit");

    assert!(matches!(outcome, SubmitOutcome::PendingApproval { .. }));
    assert_eq!(h.executor.execution_count(), 0);
}

#[tokio::test]
async fn unproven_action_falls_back_to_manual_approval() {
    let h = harness();
    let mut rec = auto_approvable();
    // Supported by the executor but absent from the success history.
    rec.action = "scale_infrastructure".to_owned();

    let outcome = h
        .coordinator
        .submit(rec, "ai-optimizer", HashMap::new())
        .await
        .expect("submit");

    assert!(matches!(outcome, SubmitOutcome::PendingApproval { .. }));
}

#[tokio::test]
async fn production_resources_block_auto_approval() {
    let h = harness();
    let mut rec = auto_approvable();
    rec.affected_resources[0].environment = "production".to_owned();

    let outcome = h
        .coordinator
        .submit(rec, "ai-optimizer", HashMap::new())
        .await
        .expect("submit");

    assert!(matches!(outcome, SubmitOutcome::PendingApproval { .. }));
}

#[tokio::test]
async fn failed_auto_execution_still_reports_outcome() {
    let executor = Arc::new(RecordingExecutor::failing(true, false));
    let h = harness_with(Arc::clone(&executor), FixedClock::business_hours());
    let rec = auto_approvable();
    let rec_id = rec.id;

    let outcome = h
        .coordinator
        .submit(rec, "ai-optimizer", HashMap::new())
        .await
        .expect("submit returns the outcome even when execution fails");
    assert!(matches!(outcome, SubmitOutcome::AutoApproved { .. }));

    let history = h.coordinator.history(10).await;
    assert_eq!(history[0].id, rec_id);
    assert_eq!(history[0].outcome, ResolutionOutcome::ExecutionFailed);
    assert!(h
        .notifier
        .titles()
        .iter()
        .any(|t| t.starts_with("Execution failed")));
}
