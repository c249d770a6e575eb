/// Mutable run state threaded through the workflow
///
/// Owned exclusively by the controller and updated as steps complete; no
/// collaborator retains it and nothing here is global. The session token is
/// fetched once and reused for every REST call in the run. The assignment
/// id is resolved lazily at removal time and is only present while the link
/// record actually exists.
#[derive(Debug, Clone, Default)]
pub struct WorkflowContext {
    pub session_token: Option<String>,
    pub user_id: Option<String>,
    pub permission_set_id: Option<String>,
    pub assignment_id: Option<String>,
}
