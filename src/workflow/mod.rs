//! Approval workflow: decision aggregation, deadline timers, coordination.

pub mod aggregator;
pub mod coordinator;
pub mod scheduler;

pub use coordinator::{Collaborators, WorkflowCoordinator};
pub use scheduler::TimeoutScheduler;
