//! Log-only default collaborators.
//!
//! Stand-ins for real transports and directories: they record to `tracing`
//! and nothing else. Useful for wiring the engine up before the concrete
//! integrations exist, and as simple test doubles.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use tracing::{info, warn};

use super::{Clock, EscalationHook, NotificationGateway, NotificationPayload, RoleDirectory};
use crate::external::ActionHistory;
use crate::models::approval::ApprovalRequest;

/// Notification gateway that logs payloads instead of delivering them.
#[derive(Debug, Default)]
pub struct LogNotificationGateway;

#[async_trait]
impl NotificationGateway for LogNotificationGateway {
    async fn notify(&self, payload: NotificationPayload) {
        info!(
            title = %payload.title,
            urgency = ?payload.urgency,
            recipients = payload.recipients.len(),
            "notification dispatched"
        );
    }
}

/// Escalation hook that logs the timeout instead of paging anyone.
#[derive(Debug, Default)]
pub struct LogEscalationHook;

#[async_trait]
impl EscalationHook for LogEscalationHook {
    async fn on_timeout(&self, request: &ApprovalRequest) {
        warn!(
            request_id = %request.id,
            action = %request.recommendation.action,
            risk = request.recommendation.risk_level.as_str(),
            "approval request timed out, escalation required"
        );
    }
}

/// Role directory backed by a fixed in-memory role → users map.
#[derive(Debug, Default)]
pub struct StaticRoleDirectory {
    roles: HashMap<String, HashSet<String>>,
}

impl StaticRoleDirectory {
    /// Build a directory from `(role, members)` pairs.
    #[must_use]
    pub fn new(roles: impl IntoIterator<Item = (String, HashSet<String>)>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    /// Add every user in `members` to `role`.
    pub fn grant(&mut self, role: impl Into<String>, members: impl IntoIterator<Item = String>) {
        self.roles.entry(role.into()).or_default().extend(members);
    }
}

#[async_trait]
impl RoleDirectory for StaticRoleDirectory {
    async fn eligible_users(&self, role: &str) -> HashSet<String> {
        self.roles.get(role).cloned().unwrap_or_default()
    }

    async fn has_role(&self, user_id: &str, role: &str) -> bool {
        self.roles.get(role).is_some_and(|members| members.contains(user_id))
    }
}

/// Action history backed by a fixed set of known-good action names.
#[derive(Debug, Default)]
pub struct StaticActionHistory {
    succeeded: HashSet<String>,
}

impl StaticActionHistory {
    /// Build a history from the actions that have succeeded before.
    #[must_use]
    pub fn new(succeeded: impl IntoIterator<Item = String>) -> Self {
        Self {
            succeeded: succeeded.into_iter().collect(),
        }
    }
}

impl ActionHistory for StaticActionHistory {
    fn has_succeeded(&self, action: &str) -> bool {
        self.succeeded.contains(action)
    }
}

/// Wall-clock time source.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
