#![forbid(unsafe_code)]

//! `cloudgate` — human-in-the-loop approval engine for AI-generated
//! infrastructure recommendations.
//!
//! A recommendation enters through the
//! [`workflow::WorkflowCoordinator`], which classifies its risk, either
//! auto-executes it under a narrow low-risk predicate or registers a pending
//! approval request, fans notifications out to the required signer tiers,
//! and arms a per-request deadline timer. Approver responses are aggregated
//! against tier quorums; terminal resolutions execute or reject the action
//! and deterministically cancel the timer. Transports, cloud-provider
//! executors, notification delivery, and role directories are injected
//! collaborators (see [`external`]).

pub mod audit;
pub mod config;
pub mod errors;
pub mod external;
pub mod models;
pub mod policy;
pub mod store;
pub mod workflow;

pub use config::EngineConfig;
pub use errors::{AppError, Result};
pub use workflow::{Collaborators, WorkflowCoordinator};
