use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentAction {
    Create,
    Delete,
}

impl std::fmt::Display for AssignmentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentAction::Create => write!(f, "create"),
            AssignmentAction::Delete => write!(f, "delete"),
        }
    }
}

/// Errors from the platform REST API
///
/// Every variant is fatal to the run; the workflow wraps these with the step
/// that was executing so the operator sees where the run died.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("no {object} record matched {field} = '{value}'")]
    NotFound {
        object: String,
        field: String,
        value: String,
    },
    #[error("{object} query failed: {message}")]
    Query { object: String, message: String },
    #[error("permission set assignment {action} failed: {message}")]
    AssignmentMutation {
        action: AssignmentAction,
        message: String,
    },
    #[error("email update for user {user_id} failed: {message}")]
    ProfileUpdate { user_id: String, message: String },
}
