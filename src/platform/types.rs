use serde::{Deserialize, Serialize};

/// Collection shape returned by the structured query endpoint
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub records: Vec<RecordId>,
}

#[derive(Debug, Deserialize)]
pub struct RecordId {
    #[serde(rename = "Id")]
    pub id: String,
}

/// Body for creating a permission-set-assignment link record
#[derive(Debug, Serialize)]
pub struct AssignmentRequest<'a> {
    #[serde(rename = "AssigneeId")]
    pub assignee_id: &'a str,
    #[serde(rename = "PermissionSetId")]
    pub permission_set_id: &'a str,
}

/// Partial-update body touching exactly the email field
#[derive(Debug, Serialize)]
pub struct EmailUpdate<'a> {
    #[serde(rename = "Email")]
    pub email: &'a str,
}
