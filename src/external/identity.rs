//! Identity CLI abstractions
//!
//! Wraps the sfdx CLI behind a trait so the workflow can establish an
//! operator session and retrieve its access token without depending on a
//! real subprocess.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::command::{CommandError, CommandExecutor};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("interactive sfdx login failed: {message}")]
    LoginFailed { message: String },
    #[error("sfdx org display reported no successful session: {message}")]
    SessionUnavailable { message: String },
    #[error("sfdx output did not include an access token")]
    TokenMissing,
    #[error("token retrieval did not complete within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
    #[error("could not parse sfdx output: {message}")]
    MalformedOutput { message: String },
    #[error("failed to run sfdx: {source}")]
    Command {
        #[from]
        source: CommandError,
    },
}

/// Trait for obtaining an operator session from the identity CLI
///
/// Two calls mirror the CLI's two roles: an interactive web login (the CLI
/// opens its own browser window, outside our control) and a structured query
/// for the resulting session's access token.
#[async_trait]
pub trait IdentityCli: Send + Sync {
    async fn web_login(&self, instance_url: &str) -> Result<(), AuthError>;

    async fn session_token(&self, username: &str) -> Result<String, AuthError>;
}

/// Real sfdx CLI implementation
pub struct SfdxCli {
    executor: Arc<dyn CommandExecutor>,
    token_timeout: Duration,
}

impl SfdxCli {
    pub fn new(executor: Arc<dyn CommandExecutor>, token_timeout: Duration) -> Self {
        Self {
            executor,
            token_timeout,
        }
    }

    fn parse_access_token(stdout: &str) -> Result<String, AuthError> {
        let payload: serde_json::Value =
            serde_json::from_str(stdout).map_err(|e| AuthError::MalformedOutput {
                message: format!("org display payload is not valid JSON: {}", e),
            })?;

        payload
            .get("result")
            .and_then(|r| r.get("accessToken"))
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or(AuthError::TokenMissing)
    }
}

#[async_trait]
impl IdentityCli for SfdxCli {
    async fn web_login(&self, instance_url: &str) -> Result<(), AuthError> {
        let output = self
            .executor
            .execute("sfdx", &["force:auth:web:login", "-r", instance_url])
            .await?;

        if !output.success() {
            return Err(AuthError::LoginFailed {
                message: output.stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    async fn session_token(&self, username: &str) -> Result<String, AuthError> {
        let result = self
            .executor
            .execute_with_timeout(
                "sfdx",
                &["force:org:display", "--json", "--targetusername", username],
                self.token_timeout,
            )
            .await;

        let output = match result {
            Ok(output) => output,
            Err(CommandError::Timeout { timeout_ms }) => {
                return Err(AuthError::Timeout {
                    timeout_secs: timeout_ms / 1000,
                })
            }
            Err(e) => return Err(e.into()),
        };

        if !output.success() {
            return Err(AuthError::SessionUnavailable {
                message: output.stderr.trim().to_string(),
            });
        }

        Self::parse_access_token(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::super::command::CommandOutput;
    use super::*;
    use serde_json::json;

    struct MockCommandExecutor {
        responses: std::collections::HashMap<String, Result<CommandOutput, CommandError>>,
    }

    impl MockCommandExecutor {
        fn new() -> Self {
            Self {
                responses: std::collections::HashMap::new(),
            }
        }

        fn expect_command(
            mut self,
            program: &str,
            args: &[&str],
            response: Result<CommandOutput, CommandError>,
        ) -> Self {
            let key = format!("{} {}", program, args.join(" "));
            self.responses.insert(key, response);
            self
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(
            &self,
            program: &str,
            args: &[&str],
        ) -> Result<CommandOutput, CommandError> {
            let key = format!("{} {}", program, args.join(" "));
            self.responses.get(&key).cloned().unwrap_or(Err(
                CommandError::CommandNotFound {
                    command: program.to_string(),
                },
            ))
        }
    }

    fn ok_output(stdout: String) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput {
            status_code: 0,
            stdout,
            stderr: String::new(),
        })
    }

    #[tokio::test]
    async fn test_session_token_extracts_access_token() {
        let payload = json!({
            "status": 0,
            "result": {
                "id": "00D000000000001EAA",
                "accessToken": "00D!AQEAQa.secret.token",
                "instanceUrl": "https://acme--dev.my.salesforce.com"
            }
        });
        let mock = MockCommandExecutor::new().expect_command(
            "sfdx",
            &[
                "force:org:display",
                "--json",
                "--targetusername",
                "admin@example.com.dev",
            ],
            ok_output(payload.to_string()),
        );

        let cli = SfdxCli::new(Arc::new(mock), Duration::from_secs(20));
        let token = cli.session_token("admin@example.com.dev").await.unwrap();
        assert_eq!(token, "00D!AQEAQa.secret.token");
    }

    #[tokio::test]
    async fn test_session_token_missing_field_is_an_error() {
        let payload = json!({ "status": 0, "result": { "id": "00D000000000001EAA" } });
        let mock = MockCommandExecutor::new().expect_command(
            "sfdx",
            &[
                "force:org:display",
                "--json",
                "--targetusername",
                "admin@example.com.dev",
            ],
            ok_output(payload.to_string()),
        );

        let cli = SfdxCli::new(Arc::new(mock), Duration::from_secs(20));
        let result = cli.session_token("admin@example.com.dev").await;
        assert!(matches!(result.unwrap_err(), AuthError::TokenMissing));
    }

    #[tokio::test]
    async fn test_session_token_non_json_output_is_an_error() {
        let mock = MockCommandExecutor::new().expect_command(
            "sfdx",
            &[
                "force:org:display",
                "--json",
                "--targetusername",
                "admin@example.com.dev",
            ],
            ok_output("ERROR: not logged in".to_string()),
        );

        let cli = SfdxCli::new(Arc::new(mock), Duration::from_secs(20));
        let result = cli.session_token("admin@example.com.dev").await;
        assert!(matches!(
            result.unwrap_err(),
            AuthError::MalformedOutput { .. }
        ));
    }

    #[tokio::test]
    async fn test_session_token_failed_cli_reports_session_unavailable() {
        let mock = MockCommandExecutor::new().expect_command(
            "sfdx",
            &[
                "force:org:display",
                "--json",
                "--targetusername",
                "admin@example.com.dev",
            ],
            Ok(CommandOutput {
                status_code: 1,
                stdout: String::new(),
                stderr: "No org configuration found".to_string(),
            }),
        );

        let cli = SfdxCli::new(Arc::new(mock), Duration::from_secs(20));
        let result = cli.session_token("admin@example.com.dev").await;
        assert!(matches!(
            result.unwrap_err(),
            AuthError::SessionUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn test_web_login_failure_surfaces_stderr() {
        let mock = MockCommandExecutor::new().expect_command(
            "sfdx",
            &[
                "force:auth:web:login",
                "-r",
                "https://acme--dev.my.salesforce.com",
            ],
            Ok(CommandOutput {
                status_code: 1,
                stdout: String::new(),
                stderr: "login cancelled\n".to_string(),
            }),
        );

        let cli = SfdxCli::new(Arc::new(mock), Duration::from_secs(20));
        let result = cli.web_login("https://acme--dev.my.salesforce.com").await;
        match result.unwrap_err() {
            AuthError::LoginFailed { message } => assert_eq!(message, "login cancelled"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
