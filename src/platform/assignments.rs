//! Permission-set assignment management
//!
//! The assignment is the link record tying one user to one permission set.
//! Lookup treats absence as a valid outcome; removal and creation are plain
//! single-resource mutations.

use tracing::debug;

use super::client::{http_failure, RestClient};
use super::errors::{AssignmentAction, PlatformError};
use super::query::escape_soql_literal;
use super::types::AssignmentRequest;

impl RestClient {
    /// Look up the assignment linking `user_id` to `permission_set_id`.
    ///
    /// Returns `Ok(None)` when no link exists; callers must not treat that
    /// as an error, and must not attempt removal in that case.
    pub async fn find_assignment(
        &self,
        user_id: &str,
        permission_set_id: &str,
        token: &str,
    ) -> Result<Option<String>, PlatformError> {
        let soql = format!(
            "SELECT Id FROM PermissionSetAssignment WHERE PermissionSetId = '{}' AND AssigneeId = '{}'",
            escape_soql_literal(permission_set_id),
            escape_soql_literal(user_id)
        );
        let result = self
            .run_query("PermissionSetAssignment", soql, token)
            .await?;
        Ok(result.records.into_iter().next().map(|r| r.id))
    }

    pub async fn remove_assignment(
        &self,
        assignment_id: &str,
        token: &str,
    ) -> Result<(), PlatformError> {
        let url = self.data_url(&format!("sobjects/PermissionSetAssignment/{}", assignment_id));
        debug!(assignment_id = assignment_id, "deleting assignment");

        let response = self
            .http()
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PlatformError::AssignmentMutation {
                action: AssignmentAction::Delete,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::AssignmentMutation {
                action: AssignmentAction::Delete,
                message: http_failure(status, response.text().await.ok()),
            });
        }
        Ok(())
    }

    /// Create the assignment unconditionally.
    ///
    /// No existence check is performed first: running this against a user
    /// who already holds the permission set creates a duplicate link.
    pub async fn create_assignment(
        &self,
        user_id: &str,
        permission_set_id: &str,
        token: &str,
    ) -> Result<(), PlatformError> {
        let url = self.data_url("sobjects/PermissionSetAssignment/");
        debug!(
            user_id = user_id,
            permission_set_id = permission_set_id,
            "creating assignment"
        );

        let body = AssignmentRequest {
            assignee_id: user_id,
            permission_set_id,
        };
        let response = self
            .http()
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::AssignmentMutation {
                action: AssignmentAction::Create,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::AssignmentMutation {
                action: AssignmentAction::Create,
                message: http_failure(status, response.text().await.ok()),
            });
        }
        Ok(())
    }
}
