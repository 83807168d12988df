//! Error types shared across the approval engine.

use std::fmt::{Display, Formatter};

/// Shared engine result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Engine error enumeration covering all domain failure modes.
///
/// Timeout expiry is deliberately absent: it is a scheduled event routed to
/// the escalation hook, not an error.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Recommendation classification or tier misconfiguration, detected at
    /// submit time before any state is persisted.
    Policy(String),
    /// A response referenced an unknown or already-resolved request id.
    RequestNotFound(String),
    /// Recommendation names an action with no registered executor.
    UnknownAction(String),
    /// Action execution failed after approval.
    Execution(String),
    /// Rollback of a failed action itself failed.
    Rollback(String),
    /// Audit log write failure.
    Audit(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Policy(msg) => write!(f, "policy: {msg}"),
            Self::RequestNotFound(msg) => write!(f, "request not found: {msg}"),
            Self::UnknownAction(msg) => write!(f, "unknown action: {msg}"),
            Self::Execution(msg) => write!(f, "execution: {msg}"),
            Self::Rollback(msg) => write!(f, "rollback: {msg}"),
            Self::Audit(msg) => write!(f, "audit: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}
