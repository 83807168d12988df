//! Risk policy: tier mapping and auto-approval classification.

pub mod classifier;
pub mod table;

pub use classifier::{RiskClassifier, AUTO_APPROVE_CONFIDENCE};
pub use table::PolicyTable;
