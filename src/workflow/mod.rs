//! Workflow controller
//!
//! Sequences the automated REST/CLI calls and the mandatory human
//! checkpoints of the re-authorization procedure.

pub mod context;
pub mod steps;

pub use context::WorkflowContext;
pub use steps::{ReauthWorkflow, StepError, WorkflowError, WorkflowStep};
