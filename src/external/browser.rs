//! Browser hand-off
//!
//! The workflow never drives the browser; it only hands URLs to a configured
//! local command (`open` on macOS, `xdg-open` elsewhere) and moves on. The
//! operator observes the resulting window themselves.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::command::CommandExecutor;

/// Trait for handing a URL to the local browser-opening mechanism
///
/// Fire-and-forget: implementations return as soon as the hand-off has been
/// attempted and make no claim about whether a browser actually opened or
/// the operator completed anything in it.
#[async_trait]
pub trait BrowserOpener: Send + Sync {
    async fn open(&self, url: &str);
}

/// Opens URLs via a configured shell command taking the URL as its argument
pub struct CommandBrowser {
    command: String,
    executor: Arc<dyn CommandExecutor>,
}

impl CommandBrowser {
    pub fn new(command: String, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { command, executor }
    }
}

#[async_trait]
impl BrowserOpener for CommandBrowser {
    async fn open(&self, url: &str) {
        debug!(command = %self.command, url = %url, "handing URL to browser command");
        match self.executor.execute(&self.command, &[url]).await {
            Ok(output) if !output.success() => {
                warn!(
                    command = %self.command,
                    status = output.status_code,
                    "browser command exited non-zero; open {} manually",
                    url
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    command = %self.command,
                    error = %e,
                    "browser command could not be run; open {} manually",
                    url
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::command::{CommandError, CommandOutput};
    use super::*;
    use std::sync::Mutex;

    struct RecordingExecutor {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        response: Result<CommandOutput, CommandError>,
    }

    impl RecordingExecutor {
        fn new(response: Result<CommandOutput, CommandError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn execute(
            &self,
            program: &str,
            args: &[&str],
        ) -> Result<CommandOutput, CommandError> {
            self.calls.lock().unwrap().push((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_open_invokes_configured_command_with_url() {
        let executor = Arc::new(RecordingExecutor::new(Ok(CommandOutput {
            status_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })));
        let browser = CommandBrowser::new("open".to_string(), executor.clone());

        browser
            .open("https://acme--dev.my.salesforce.com/secur/logout.jsp")
            .await;

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "open");
        assert_eq!(
            calls[0].1,
            vec!["https://acme--dev.my.salesforce.com/secur/logout.jsp"]
        );
    }

    #[tokio::test]
    async fn test_open_swallows_launch_failures() {
        let executor = Arc::new(RecordingExecutor::new(Err(
            CommandError::CommandNotFound {
                command: "open".to_string(),
            },
        )));
        let browser = CommandBrowser::new("open".to_string(), executor);

        // Must not panic or propagate; the operator is told to open manually.
        browser.open("https://example.com").await;
    }
}
