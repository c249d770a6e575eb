//! The fixed 8-step re-authorization sequence
//!
//! Linear, no branching, no loops, terminal on success or the first
//! unrecovered failure. Steps 4-6 suspend on operator checkpoints. No step
//! retries, and nothing rolls back except step 7's explicit purpose of
//! re-adding the permission set that step 3 removed. There is no persisted
//! progress: killing the process between steps means the operator inspects
//! remote state and decides where to resume.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::config::ReauthConfig;
use crate::console::{ConsoleError, OperatorConsole};
use crate::external::{AuthError, BrowserOpener, IdentityCli};
use crate::oauth;
use crate::platform::{PlatformError, PlatformOps};

use super::context::WorkflowContext;

/// The ordered states of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStep {
    Authenticating,
    ResolvingIdentifiers,
    RemovingAssignment,
    UpdatingEmail,
    LogoutCheckpoint,
    Authorizing,
    RestoringAssignment,
    FinalLogout,
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowStep::Authenticating => "AUTHENTICATING",
            WorkflowStep::ResolvingIdentifiers => "RESOLVING_IDENTIFIERS",
            WorkflowStep::RemovingAssignment => "REMOVING_ASSIGNMENT",
            WorkflowStep::UpdatingEmail => "UPDATING_EMAIL",
            WorkflowStep::LogoutCheckpoint => "LOGOUT_CHECKPOINT",
            WorkflowStep::Authorizing => "AUTHORIZING",
            WorkflowStep::RestoringAssignment => "RESTORING_ASSIGNMENT",
            WorkflowStep::FinalLogout => "FINAL_LOGOUT",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
}

/// A run abort, naming the step that failed and the underlying cause.
#[derive(Debug, Error)]
#[error("workflow failed during {step}: {source}")]
pub struct WorkflowError {
    pub step: WorkflowStep,
    #[source]
    pub source: StepError,
}

fn at<E: Into<StepError>>(step: WorkflowStep) -> impl FnOnce(E) -> WorkflowError {
    move |source| WorkflowError {
        step,
        source: source.into(),
    }
}

/// The workflow controller
///
/// Composes the identity CLI, the platform REST API, the browser hand-off,
/// and the operator console into the fixed sequence, holding the session
/// token and resolved identifiers in a [`WorkflowContext`].
pub struct ReauthWorkflow {
    config: ReauthConfig,
    identity: Arc<dyn IdentityCli>,
    platform: Arc<dyn PlatformOps>,
    browser: Arc<dyn BrowserOpener>,
    console: Arc<dyn OperatorConsole>,
}

impl ReauthWorkflow {
    pub fn new(
        config: ReauthConfig,
        identity: Arc<dyn IdentityCli>,
        platform: Arc<dyn PlatformOps>,
        browser: Arc<dyn BrowserOpener>,
        console: Arc<dyn OperatorConsole>,
    ) -> Self {
        Self {
            config,
            identity,
            platform,
            browser,
            console,
        }
    }

    pub async fn run(&self) -> Result<WorkflowContext, WorkflowError> {
        let cfg = &self.config;
        let mut ctx = WorkflowContext::default();

        // 1. AUTHENTICATING — nothing remote has been mutated yet, so any
        // failure here is safe to re-run.
        let step = WorkflowStep::Authenticating;
        info!(%step, "starting step");
        self.console.step(&format!(
            "Using sfdx to authorize with {} as your user",
            cfg.target.instance_url
        ));
        self.identity
            .web_login(&cfg.target.instance_url)
            .await
            .map_err(at(step))?;
        self.console.done(&format!(
            "Authenticated using sfdx in {}",
            cfg.target.instance_url
        ));
        self.console.step("Getting bearer token");
        let token = self
            .identity
            .session_token(&cfg.operator.username)
            .await
            .map_err(at(step))?;
        ctx.session_token = Some(token.clone());
        self.console.done("Bearer token obtained");

        // 2. RESOLVING_IDENTIFIERS
        let step = WorkflowStep::ResolvingIdentifiers;
        info!(%step, "starting step");
        self.console
            .step(&format!("Getting user id for {}", cfg.api_user.username));
        let user_id = self
            .platform
            .find_id_by_field("User", "Username", &cfg.api_user.username, &token)
            .await
            .map_err(at(step))?;
        self.console.done(&format!(
            "User with username {} has id {}",
            cfg.api_user.username, user_id
        ));
        self.console.step(&format!(
            "Getting permission set id for {}",
            cfg.api_user.permission_set
        ));
        let permission_set_id = self
            .platform
            .find_id_by_field("PermissionSet", "Name", &cfg.api_user.permission_set, &token)
            .await
            .map_err(at(step))?;
        self.console.done(&format!(
            "Permission set with name {} has id {}",
            cfg.api_user.permission_set, permission_set_id
        ));
        ctx.user_id = Some(user_id.clone());
        ctx.permission_set_id = Some(permission_set_id.clone());

        // 3. REMOVING_ASSIGNMENT — from here until step 7 completes, the
        // api user temporarily lacks the permission set, so the in-browser
        // consent flow runs without its restrictions.
        let step = WorkflowStep::RemovingAssignment;
        info!(%step, "starting step");
        self.console.step("Removing permission set assignment");
        let existing = self
            .platform
            .find_assignment(&user_id, &permission_set_id, &token)
            .await
            .map_err(at(step))?;
        match existing {
            Some(assignment_id) => {
                ctx.assignment_id = Some(assignment_id.clone());
                self.platform
                    .remove_assignment(&assignment_id, &token)
                    .await
                    .map_err(at(step))?;
                ctx.assignment_id = None;
                self.console.done(&format!(
                    "{} permission set has been removed from {}",
                    cfg.api_user.permission_set, cfg.api_user.username
                ));
            }
            None => {
                self.console.done(&format!(
                    "{} is not assigned to {}; nothing to remove",
                    cfg.api_user.permission_set, cfg.api_user.username
                ));
            }
        }

        // 4. UPDATING_EMAIL — the platform mails a confirmation link to the
        // new address; REST calls made before the operator approves it still
        // authenticate as the old identity state, hence the checkpoint.
        let step = WorkflowStep::UpdatingEmail;
        info!(%step, "starting step");
        self.console.step("Changing api user's email address");
        self.platform
            .update_email(&user_id, &cfg.api_user.new_email, &token)
            .await
            .map_err(at(step))?;
        self.console.done("Changed api user's email address");
        self.console
            .checkpoint("Press enter to continue after approving email change via sent email...")
            .await
            .map_err(at(step))?;

        // 5. LOGOUT_CHECKPOINT — the next interactive login must be as the
        // api user, not the operator.
        let step = WorkflowStep::LogoutCheckpoint;
        info!(%step, "starting step");
        self.console
            .step("Logging you out of your user - so that you can login as the api user");
        self.browser
            .open(&oauth::logout_url(&cfg.target.instance_url))
            .await;
        self.console
            .checkpoint("Press enter to continue once logged out...")
            .await
            .map_err(at(step))?;

        // 6. AUTHORIZING
        let step = WorkflowStep::Authorizing;
        info!(%step, "starting step");
        self.console
            .step("Opening browser to authorize connected app as api user");
        let state = oauth::fresh_token(cfg.oauth.state_length);
        let nonce = oauth::fresh_token(cfg.oauth.nonce_length);
        let authorize = oauth::authorize_url(
            &cfg.target.instance_url,
            &cfg.oauth.connected_app_client_id,
            &state,
            &nonce,
        );
        self.browser.open(&authorize).await;
        self.console
            .checkpoint("Press enter to continue after completing in browser flow as the API user...")
            .await
            .map_err(at(step))?;

        // 7. RESTORING_ASSIGNMENT — restores the invariant broken in step 3.
        // A failure here is a known-bad terminal state: the api user is left
        // without its permission set and the operator must restore it by
        // hand with the identifiers already resolved above.
        let step = WorkflowStep::RestoringAssignment;
        info!(%step, "starting step");
        self.console.step("Readding permission set");
        if let Err(e) = self
            .platform
            .create_assignment(&user_id, &permission_set_id, &token)
            .await
        {
            error!(
                user_id = %user_id,
                permission_set_id = %permission_set_id,
                "restoration failed; the api user is left without the permission set - \
                 re-create the assignment manually with these identifiers"
            );
            return Err(at(step)(e));
        }
        self.console.done(&format!(
            "{} permission set has been added to {}",
            cfg.api_user.permission_set, cfg.api_user.username
        ));

        // 8. FINAL_LOGOUT — no checkpoint; the run is complete.
        let step = WorkflowStep::FinalLogout;
        info!(%step, "starting step");
        self.console
            .step("Logging out of the api user account in browser");
        self.browser
            .open(&oauth::logout_url(&cfg.target.instance_url))
            .await;
        self.console
            .done("Once you've logged out in browser - this process is complete");

        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display_names() {
        assert_eq!(WorkflowStep::Authenticating.to_string(), "AUTHENTICATING");
        assert_eq!(
            WorkflowStep::RestoringAssignment.to_string(),
            "RESTORING_ASSIGNMENT"
        );
        assert_eq!(WorkflowStep::FinalLogout.to_string(), "FINAL_LOGOUT");
    }

    #[test]
    fn test_workflow_error_names_failed_step() {
        let err = WorkflowError {
            step: WorkflowStep::RestoringAssignment,
            source: StepError::Platform(PlatformError::AssignmentMutation {
                action: crate::platform::AssignmentAction::Create,
                message: "HTTP 500".to_string(),
            }),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("RESTORING_ASSIGNMENT"));
    }
}
