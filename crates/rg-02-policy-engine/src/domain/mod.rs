pub mod config;
pub mod decision;
pub mod rules;

pub use config::PolicyConfig;
pub use decision::{PolicyDecision, RejectReason, StatusHint, UploadDecision};
