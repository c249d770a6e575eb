//! Remote platform REST API
//!
//! Directory queries, permission-set assignment mutations, and the user
//! email patch, all against the versioned data path of the sandbox
//! instance. `PlatformOps` is the seam the workflow controller programs
//! against; `RestClient` is the real implementation.

pub mod assignments;
pub mod client;
pub mod errors;
pub mod query;
pub mod types;
pub mod users;

use async_trait::async_trait;

pub use client::RestClient;
pub use errors::{AssignmentAction, PlatformError};

/// The REST operations the workflow controller needs
///
/// Every call takes the session token explicitly; the token is obtained once
/// at the start of a run and reused unchanged for all of these.
#[async_trait]
pub trait PlatformOps: Send + Sync {
    async fn find_id_by_field(
        &self,
        object: &str,
        field: &str,
        value: &str,
        token: &str,
    ) -> Result<String, PlatformError>;

    async fn find_assignment(
        &self,
        user_id: &str,
        permission_set_id: &str,
        token: &str,
    ) -> Result<Option<String>, PlatformError>;

    async fn remove_assignment(&self, assignment_id: &str, token: &str)
        -> Result<(), PlatformError>;

    async fn create_assignment(
        &self,
        user_id: &str,
        permission_set_id: &str,
        token: &str,
    ) -> Result<(), PlatformError>;

    async fn update_email(
        &self,
        user_id: &str,
        new_email: &str,
        token: &str,
    ) -> Result<(), PlatformError>;
}

#[async_trait]
impl PlatformOps for RestClient {
    async fn find_id_by_field(
        &self,
        object: &str,
        field: &str,
        value: &str,
        token: &str,
    ) -> Result<String, PlatformError> {
        RestClient::find_id_by_field(self, object, field, value, token).await
    }

    async fn find_assignment(
        &self,
        user_id: &str,
        permission_set_id: &str,
        token: &str,
    ) -> Result<Option<String>, PlatformError> {
        RestClient::find_assignment(self, user_id, permission_set_id, token).await
    }

    async fn remove_assignment(
        &self,
        assignment_id: &str,
        token: &str,
    ) -> Result<(), PlatformError> {
        RestClient::remove_assignment(self, assignment_id, token).await
    }

    async fn create_assignment(
        &self,
        user_id: &str,
        permission_set_id: &str,
        token: &str,
    ) -> Result<(), PlatformError> {
        RestClient::create_assignment(self, user_id, permission_set_id, token).await
    }

    async fn update_email(
        &self,
        user_id: &str,
        new_email: &str,
        token: &str,
    ) -> Result<(), PlatformError> {
        RestClient::update_email(self, user_id, new_email, token).await
    }
}
