//! Workflow coordinator: the engine's public entry point.
//!
//! Accepts recommendations, classifies them, and either executes them
//! immediately (auto-approval) or registers a pending request, fans out
//! notifications, and arms the deadline timer. Accepts approver responses,
//! aggregates decisions, and drives execution, rejection, and cleanup.
//!
//! All state transitions to a terminal status happen before any external
//! call begins, so an approved action executes at most once even when the
//! executor is slow or fails.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditEventType, AuditLogger};
use crate::config::EngineConfig;
use crate::external::{
    ActionExecutor, ActionHistory, Clock, EscalationHook, ExecutionAudit, NotificationGateway,
    NotificationPayload, RoleDirectory,
};
use crate::models::approval::{
    ApprovalRequest, ApprovalResponse, ApprovalTier, ResolutionOutcome, ResolutionRecord,
    ResponseDecision, SubmitOutcome,
};
use crate::models::recommendation::{Recommendation, Urgency};
use crate::policy::{PolicyTable, RiskClassifier};
use crate::store::{ApprovalRequestStore, Evaluation};
use crate::workflow::scheduler::TimeoutScheduler;
use crate::{AppError, Result};

/// External collaborators injected into the coordinator.
pub struct Collaborators {
    /// Executes approved actions.
    pub executor: Arc<dyn ActionExecutor>,
    /// Delivers notifications to approvers and submitters.
    pub notifier: Arc<dyn NotificationGateway>,
    /// Resolves role membership.
    pub directory: Arc<dyn RoleDirectory>,
    /// Handles timed-out requests.
    pub escalation: Arc<dyn EscalationHook>,
    /// Historical-success signal for auto-approval.
    pub action_history: Arc<dyn ActionHistory>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Durable audit sink.
    pub audit: Arc<dyn AuditLogger>,
}

/// Bounded, newest-first resolution history.
#[derive(Clone)]
struct HistoryBuffer {
    inner: Arc<Mutex<VecDeque<ResolutionRecord>>>,
    capacity: usize,
}

impl HistoryBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    async fn push(&self, record: ResolutionRecord) {
        let mut buf = self.inner.lock().await;
        if buf.len() == self.capacity {
            buf.pop_back();
        }
        buf.push_front(record);
    }

    async fn recent(&self, limit: usize) -> Vec<ResolutionRecord> {
        self.inner.lock().await.iter().take(limit).cloned().collect()
    }
}

/// Escalation hook wrapper that records history and audit before delegating.
struct RecordingEscalationHook {
    inner: Arc<dyn EscalationHook>,
    history: HistoryBuffer,
    audit: Arc<dyn AuditLogger>,
}

#[async_trait::async_trait]
impl EscalationHook for RecordingEscalationHook {
    async fn on_timeout(&self, request: &ApprovalRequest) {
        self.history
            .push(ResolutionRecord {
                id: request.id,
                action: request.recommendation.action.clone(),
                risk_level: request.risk_level(),
                outcome: ResolutionOutcome::TimedOutEscalated,
                resolved_at: Utc::now(),
                responses: Vec::new(),
            })
            .await;

        log_audit(
            self.audit.as_ref(),
            AuditEntry::new(
                AuditEventType::Escalated,
                request.recommendation.id,
                request.recommendation.action.clone(),
                request.risk_level(),
            )
            .with_request_id(request.id),
        );

        self.inner.on_timeout(request).await;
    }
}

/// Public entry point for the approval workflow.
///
/// Constructed once at process start with explicit collaborators; owns the
/// request store and the timeout scheduler. Safe to share via `Arc` and
/// invoke concurrently.
pub struct WorkflowCoordinator {
    config: EngineConfig,
    store: ApprovalRequestStore,
    scheduler: TimeoutScheduler,
    executor: Arc<dyn ActionExecutor>,
    notifier: Arc<dyn NotificationGateway>,
    directory: Arc<dyn RoleDirectory>,
    action_history: Arc<dyn ActionHistory>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditLogger>,
    history: HistoryBuffer,
}

impl WorkflowCoordinator {
    /// Build a coordinator with a fresh, empty request store.
    #[must_use]
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        let store = ApprovalRequestStore::new();
        let history = HistoryBuffer::new(config.history_capacity);
        let escalation: Arc<dyn EscalationHook> = Arc::new(RecordingEscalationHook {
            inner: collaborators.escalation,
            history: history.clone(),
            audit: Arc::clone(&collaborators.audit),
        });
        let scheduler = TimeoutScheduler::new(store.clone(), escalation);

        Self {
            config,
            store,
            scheduler,
            executor: collaborators.executor,
            notifier: collaborators.notifier,
            directory: collaborators.directory,
            action_history: collaborators.action_history,
            clock: collaborators.clock,
            audit: collaborators.audit,
            history,
        }
    }

    /// Submit a recommendation for approval or auto-execution.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Policy`] for a malformed recommendation or tier
    /// misconfiguration and [`AppError::UnknownAction`] when no executor is
    /// registered for the action — in every case before any state is
    /// persisted.
    #[allow(clippy::implicit_hasher)] // Context maps always use the default hasher.
    pub async fn submit(
        &self,
        recommendation: Recommendation,
        submitted_by: impl Into<String>,
        context: HashMap<String, String>,
    ) -> Result<SubmitOutcome> {
        let submitted_by = submitted_by.into();
        info!(
            recommendation_id = %recommendation.id,
            action = %recommendation.action,
            risk = recommendation.risk_level.as_str(),
            "recommendation submitted"
        );

        if !(0.0..=1.0).contains(&recommendation.confidence) {
            return Err(AppError::Policy(format!(
                "confidence {} outside 0.0..=1.0",
                recommendation.confidence
            )));
        }
        if !self.executor.supports(&recommendation.action) {
            return Err(AppError::UnknownAction(recommendation.action.clone()));
        }

        log_audit(
            self.audit.as_ref(),
            AuditEntry::new(
                AuditEventType::Submitted,
                recommendation.id,
                recommendation.action.clone(),
                recommendation.risk_level,
            )
            .with_actor(submitted_by.clone()),
        );

        if RiskClassifier::is_auto_approvable(
            &recommendation,
            self.action_history.as_ref(),
            self.clock.as_ref(),
            &self.config.business_hours,
        ) {
            return self.auto_approve(recommendation, &submitted_by).await;
        }

        let tiers = PolicyTable::required_tiers(&recommendation, self.directory.as_ref()).await?;
        let request = ApprovalRequest {
            id: Uuid::new_v4(),
            submitted_by: submitted_by.clone(),
            created_at: self.clock.now_utc(),
            timeout: self.config.timeouts.for_risk(recommendation.risk_level),
            auto_approve_threshold: PolicyTable::auto_approve_threshold(
                recommendation.risk_level,
            ),
            context,
            required_tiers: tiers,
            recommendation,
        };
        let request_id = request.id;

        self.store.insert(request.clone()).await?;

        // The request is now resolvable; everything below is external I/O.
        self.notify_tiers(&request).await;
        self.scheduler.arm(&request).await;

        info!(
            request_id = %request_id,
            risk = request.risk_level().as_str(),
            tiers = request.required_tiers.len(),
            "approval request pending"
        );

        Ok(SubmitOutcome::PendingApproval { request_id })
    }

    /// Record an approver's response and resolve the request if terminal.
    ///
    /// Returns `true` when this response resolved the request (approved or
    /// rejected), `false` while it remains pending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RequestNotFound`] if the request id is unknown or
    /// already resolved.
    pub async fn respond(&self, response: ApprovalResponse) -> Result<bool> {
        let request_id = response.request_id;
        info!(
            request_id = %request_id,
            user_id = %response.user_id,
            decision = ?response.decision,
            "approval response received"
        );

        match self.store.append_and_evaluate(request_id, response).await? {
            Evaluation::Pending => Ok(false),
            Evaluation::Approved(entry) => {
                // Terminal bookkeeping completes before the executor runs.
                self.scheduler.cancel(request_id).await;

                log_audit(
                    self.audit.as_ref(),
                    AuditEntry::new(
                        AuditEventType::Approved,
                        entry.request.recommendation.id,
                        entry.request.recommendation.action.clone(),
                        entry.request.risk_level(),
                    )
                    .with_request_id(request_id),
                );

                let audit_ctx = ExecutionAudit {
                    submitted_by: entry.request.submitted_by.clone(),
                    auto_approved: false,
                    responses: entry.responses.clone(),
                };
                let succeeded = self
                    .run_execution(&entry.request.recommendation, &audit_ctx)
                    .await;

                self.history
                    .push(ResolutionRecord {
                        id: request_id,
                        action: entry.request.recommendation.action.clone(),
                        risk_level: entry.request.risk_level(),
                        outcome: if succeeded {
                            ResolutionOutcome::Approved
                        } else {
                            ResolutionOutcome::ExecutionFailed
                        },
                        resolved_at: Utc::now(),
                        responses: entry.responses,
                    })
                    .await;

                Ok(true)
            }
            Evaluation::Rejected(entry) => {
                self.scheduler.cancel(request_id).await;

                let rejector = entry
                    .responses
                    .iter()
                    .rev()
                    .find(|r| r.decision == ResponseDecision::Reject);
                let comments = rejector.and_then(|r| r.comments.clone());

                log_audit(
                    self.audit.as_ref(),
                    AuditEntry::new(
                        AuditEventType::Rejected,
                        entry.request.recommendation.id,
                        entry.request.recommendation.action.clone(),
                        entry.request.risk_level(),
                    )
                    .with_request_id(request_id)
                    .with_actor(rejector.map_or_else(String::new, |r| r.user_id.clone()))
                    .with_detail(comments.clone().unwrap_or_default()),
                );

                self.notifier
                    .notify(NotificationPayload {
                        title: format!(
                            "Recommendation rejected: {}",
                            entry.request.recommendation.action
                        ),
                        body: comments.unwrap_or_else(|| "no comments provided".into()),
                        urgency: entry.request.risk_level().urgency(),
                        recipients: vec![entry.request.submitted_by.clone()],
                    })
                    .await;

                self.history
                    .push(ResolutionRecord {
                        id: request_id,
                        action: entry.request.recommendation.action.clone(),
                        risk_level: entry.request.risk_level(),
                        outcome: ResolutionOutcome::Rejected,
                        resolved_at: Utc::now(),
                        responses: entry.responses,
                    })
                    .await;

                Ok(true)
            }
        }
    }

    /// Pending requests on which `user_id` is eligible to respond.
    pub async fn list_pending_for(&self, user_id: &str) -> Vec<ApprovalRequest> {
        self.store.pending_for_user(user_id).await
    }

    /// The most recent resolution records, newest first.
    pub async fn history(&self, limit: usize) -> Vec<ResolutionRecord> {
        self.history.recent(limit).await
    }

    /// The underlying request store (shared handle).
    #[must_use]
    pub fn store(&self) -> &ApprovalRequestStore {
        &self.store
    }

    /// The timeout scheduler (shared handle).
    #[must_use]
    pub fn scheduler(&self) -> &TimeoutScheduler {
        &self.scheduler
    }

    /// Execute immediately on the auto-approval path; no pending state is
    /// ever created, the audit trail is the only record.
    async fn auto_approve(
        &self,
        recommendation: Recommendation,
        submitted_by: &str,
    ) -> Result<SubmitOutcome> {
        let recommendation_id = recommendation.id;

        log_audit(
            self.audit.as_ref(),
            AuditEntry::new(
                AuditEventType::AutoApproved,
                recommendation_id,
                recommendation.action.clone(),
                recommendation.risk_level,
            )
            .with_actor(submitted_by),
        );

        let audit_ctx = ExecutionAudit {
            submitted_by: submitted_by.to_owned(),
            auto_approved: true,
            responses: Vec::new(),
        };
        let succeeded = self.run_execution(&recommendation, &audit_ctx).await;

        self.history
            .push(ResolutionRecord {
                id: recommendation_id,
                action: recommendation.action.clone(),
                risk_level: recommendation.risk_level,
                outcome: if succeeded {
                    ResolutionOutcome::AutoApproved
                } else {
                    ResolutionOutcome::ExecutionFailed
                },
                resolved_at: Utc::now(),
                responses: Vec::new(),
            })
            .await;

        Ok(SubmitOutcome::AutoApproved { recommendation_id })
    }

    /// Notify every eligible user of every required tier, one payload per
    /// tier so the message can name the role being asked to sign.
    async fn notify_tiers(&self, request: &ApprovalRequest) {
        for tier in &request.required_tiers {
            let mut recipients: Vec<String> = tier.eligible.iter().cloned().collect();
            recipients.sort_unstable();

            self.notifier
                .notify(NotificationPayload {
                    title: format!(
                        "Approval required ({}): {}",
                        tier.role, request.recommendation.action
                    ),
                    body: approval_body(request, tier),
                    urgency: request.risk_level().urgency(),
                    recipients,
                })
                .await;
        }
    }

    /// Run the executor, containing failures: report, attempt rollback when
    /// a plan exists, never propagate into approval bookkeeping.
    async fn run_execution(
        &self,
        recommendation: &Recommendation,
        audit_ctx: &ExecutionAudit,
    ) -> bool {
        if let Err(err) = self.executor.execute(recommendation, audit_ctx).await {
            error!(
                recommendation_id = %recommendation.id,
                action = %recommendation.action,
                %err,
                "action execution failed"
            );

            log_audit(
                self.audit.as_ref(),
                AuditEntry::new(
                    AuditEventType::ExecutionFailed,
                    recommendation.id,
                    recommendation.action.clone(),
                    recommendation.risk_level,
                )
                .with_detail(err.to_string()),
            );

            self.notifier
                .notify(NotificationPayload {
                    title: format!("Execution failed: {}", recommendation.action),
                    body: err.to_string(),
                    urgency: recommendation.risk_level.urgency(),
                    recipients: vec![audit_ctx.submitted_by.clone()],
                })
                .await;

            if recommendation.rollback_plan.is_some() {
                if let Err(rollback_err) = self.executor.rollback(recommendation).await {
                    error!(
                        recommendation_id = %recommendation.id,
                        %rollback_err,
                        "rollback failed"
                    );
                    log_audit(
                        self.audit.as_ref(),
                        AuditEntry::new(
                            AuditEventType::RollbackFailed,
                            recommendation.id,
                            recommendation.action.clone(),
                            recommendation.risk_level,
                        )
                        .with_detail(rollback_err.to_string()),
                    );
                    self.notifier
                        .notify(NotificationPayload {
                            title: format!("Rollback failed: {}", recommendation.action),
                            body: rollback_err.to_string(),
                            urgency: Urgency::Critical,
                            recipients: vec![audit_ctx.submitted_by.clone()],
                        })
                        .await;
                }
            }

            return false;
        }
        true
    }
}

/// Build the notification body for a pending request.
fn approval_body(request: &ApprovalRequest, tier: &ApprovalTier) -> String {
    let rec = &request.recommendation;
    format!(
        "{}\n\nRisk: {} | Confidence: {:.2} | Est. cost delta: ${:.2}/mo | Resources: {}\n\
         Required from {}: {} approval(s)\nRequest id: {}",
        rec.description,
        rec.risk_level.as_str(),
        rec.confidence,
        rec.estimated_impact.cost_delta_usd,
        rec.estimated_impact.resource_count,
        tier.role,
        tier.required,
        request.id,
    )
}

/// Audit failures are reported but never interrupt the workflow.
fn log_audit(audit: &dyn AuditLogger, entry: AuditEntry) {
    if let Err(err) = audit.log_entry(entry) {
        warn!(%err, "failed to write audit entry");
    }
}
