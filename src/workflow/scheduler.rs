//! Per-request approval deadline timers with deterministic cancellation.
//!
//! Each pending request gets a cancellable timer keyed by request id. On
//! expiry the scheduler consults the store: only a still-pending request
//! triggers the escalation hook, and the hook fires at most once per armed
//! deadline. Resolution removes the request from the store before the timer
//! is cancelled, so a timer that races resolution finds the store empty and
//! stays silent.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::external::EscalationHook;
use crate::models::approval::ApprovalRequest;
use crate::store::ApprovalRequestStore;

/// Arms and cancels per-request deadline timers.
#[derive(Clone)]
pub struct TimeoutScheduler {
    store: ApprovalRequestStore,
    hook: Arc<dyn EscalationHook>,
    timers: Arc<Mutex<HashMap<Uuid, CancellationToken>>>,
}

impl TimeoutScheduler {
    /// Create a scheduler that checks `store` and escalates through `hook`.
    #[must_use]
    pub fn new(store: ApprovalRequestStore, hook: Arc<dyn EscalationHook>) -> Self {
        Self {
            store,
            hook,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm the deadline timer for a freshly stored request.
    ///
    /// Re-arming an id replaces (and cancels) any previous timer.
    pub async fn arm(&self, request: &ApprovalRequest) {
        let id = request.id;
        let timeout = request.timeout;
        let token = CancellationToken::new();

        if let Some(previous) = self.timers.lock().await.insert(id, token.clone()) {
            previous.cancel();
        }

        let store = self.store.clone();
        let hook = Arc::clone(&self.hook);
        let timers = Arc::clone(&self.timers);

        tokio::spawn(
            async move {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!(request_id = %id, "deadline timer cancelled");
                    }
                    () = tokio::time::sleep(timeout) => {
                        timers.lock().await.remove(&id);
                        // A request resolved between expiry and this lookup has
                        // already left the store; the hook must not fire for it.
                        if let Some(request) = store.get(id).await {
                            warn!(
                                request_id = %id,
                                timeout_secs = timeout.as_secs(),
                                "approval deadline expired, escalating"
                            );
                            hook.on_timeout(&request).await;
                        }
                    }
                }
            }
            .instrument(info_span!("deadline_timer", request_id = %id)),
        );
    }

    /// Cancel the timer for a resolved request.
    ///
    /// A no-op for unknown or already-fired ids.
    pub async fn cancel(&self, id: Uuid) {
        if let Some(token) = self.timers.lock().await.remove(&id) {
            token.cancel();
        }
    }

    /// Number of currently armed timers.
    pub async fn armed_count(&self) -> usize {
        self.timers.lock().await.len()
    }
}
