//! User profile updates

use tracing::debug;

use super::client::{http_failure, RestClient};
use super::errors::PlatformError;
use super::types::EmailUpdate;

impl RestClient {
    /// Patch exactly one field (email) on the user record.
    ///
    /// The platform reacts by mailing a confirmation link to the new
    /// address; until the operator approves it out of band, the account
    /// still authenticates with its old identity state. The workflow holds
    /// at a checkpoint for exactly that reason.
    pub async fn update_email(
        &self,
        user_id: &str,
        new_email: &str,
        token: &str,
    ) -> Result<(), PlatformError> {
        let url = self.data_url(&format!("sobjects/User/{}/", user_id));
        debug!(user_id = user_id, "patching user email");

        let body = EmailUpdate { email: new_email };
        let response = self
            .http()
            .patch(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::ProfileUpdate {
                user_id: user_id.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::ProfileUpdate {
                user_id: user_id.to_string(),
                message: http_failure(status, response.text().await.ok()),
            });
        }
        Ok(())
    }
}
