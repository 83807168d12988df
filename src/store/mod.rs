//! In-memory registry of pending approval requests.
//!
//! The store's map is the only shared mutable state in the engine. Every
//! mutation of a request (response append, decision evaluation, removal on
//! terminal resolution) happens inside one lock acquisition, so two
//! concurrent responses can never both conclude they completed the quorum.
//! No `await` occurs while the guard is held; external I/O always runs after
//! the guard drops.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::models::approval::{ApprovalRequest, ApprovalResponse, Decision};
use crate::workflow::aggregator;
use crate::{AppError, Result};

/// A pending request together with its accumulated responses.
#[derive(Debug, Clone)]
pub struct PendingEntry {
    /// The stored request.
    pub request: ApprovalRequest,
    /// Append-only response trail.
    pub responses: Vec<ApprovalResponse>,
}

/// Outcome of atomically appending a response and re-evaluating the request.
///
/// Terminal variants carry the entry removed from the store; by the time the
/// caller sees them, no further responses can resolve the same request.
#[derive(Debug)]
pub enum Evaluation {
    /// Quorum not yet reached; the request remains stored.
    Pending,
    /// Every tier satisfied; the request has been removed.
    Approved(PendingEntry),
    /// An eligible approver rejected; the request has been removed.
    Rejected(PendingEntry),
}

/// Concurrency-guarded registry of pending approval requests.
#[derive(Clone, Default)]
pub struct ApprovalRequestStore {
    inner: Arc<Mutex<HashMap<Uuid, PendingEntry>>>,
}

impl ApprovalRequestStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Policy`] if a request with the same id already
    /// exists. Ids are v4 UUIDs so this guards a logic bug, not a race.
    pub async fn insert(&self, request: ApprovalRequest) -> Result<()> {
        let mut map = self.inner.lock().await;
        let id = request.id;
        if map.contains_key(&id) {
            return Err(AppError::Policy(format!("duplicate request id {id}")));
        }
        map.insert(
            id,
            PendingEntry {
                request,
                responses: Vec::new(),
            },
        );
        debug!(request_id = %id, "approval request stored");
        Ok(())
    }

    /// Fetch a clone of a stored request, if present.
    pub async fn get(&self, id: Uuid) -> Option<ApprovalRequest> {
        self.inner.lock().await.get(&id).map(|e| e.request.clone())
    }

    /// Whether a request is still pending.
    pub async fn contains(&self, id: Uuid) -> bool {
        self.inner.lock().await.contains_key(&id)
    }

    /// Number of pending requests.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether no requests are pending.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Append a response, re-run the decision aggregation, and remove the
    /// entry if the outcome is terminal — all under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RequestNotFound`] if the id is unknown or the
    /// request already resolved.
    pub async fn append_and_evaluate(
        &self,
        id: Uuid,
        response: ApprovalResponse,
    ) -> Result<Evaluation> {
        let mut map = self.inner.lock().await;
        let entry = map
            .get_mut(&id)
            .ok_or_else(|| AppError::RequestNotFound(format!("approval request {id}")))?;

        entry.responses.push(response);

        match aggregator::evaluate(&entry.request, &entry.responses) {
            Decision::Pending => Ok(Evaluation::Pending),
            Decision::Approved => {
                let entry = map.remove(&id).ok_or_else(|| {
                    AppError::RequestNotFound(format!("approval request {id}"))
                })?;
                debug!(request_id = %id, "request approved and removed from store");
                Ok(Evaluation::Approved(entry))
            }
            Decision::Rejected => {
                let entry = map.remove(&id).ok_or_else(|| {
                    AppError::RequestNotFound(format!("approval request {id}"))
                })?;
                debug!(request_id = %id, "request rejected and removed from store");
                Ok(Evaluation::Rejected(entry))
            }
        }
    }

    /// Remove and return an entry regardless of its decision state.
    pub async fn remove(&self, id: Uuid) -> Option<PendingEntry> {
        self.inner.lock().await.remove(&id)
    }

    /// Pending requests on which `user_id` is eligible to respond.
    pub async fn pending_for_user(&self, user_id: &str) -> Vec<ApprovalRequest> {
        let map = self.inner.lock().await;
        let mut requests: Vec<ApprovalRequest> = map
            .values()
            .filter(|e| e.request.is_eligible(user_id))
            .map(|e| e.request.clone())
            .collect();
        requests.sort_by_key(|r| r.created_at);
        requests
    }
}
