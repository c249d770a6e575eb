//! Operator console
//!
//! Step narration plus the blocking human checkpoints. Checkpoints are
//! modeled as an explicit suspend on an operator-input source behind a
//! trait, so tests substitute a scripted source instead of stdin. Any input
//! resumes the run; content is not validated.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("operator input stream closed")]
    Closed,
    #[error("failed to read operator input: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait OperatorConsole: Send + Sync {
    /// Announce the start of a step (`...Doing the thing`).
    fn step(&self, message: &str);

    /// Announce a step's completion (`   Did the thing`).
    fn done(&self, message: &str);

    /// Suspend until the operator confirms. No timeout; a human is present.
    async fn checkpoint(&self, prompt: &str) -> Result<(), ConsoleError>;
}

/// Real console over stdout/stdin
pub struct StdinConsole;

#[async_trait]
impl OperatorConsole for StdinConsole {
    fn step(&self, message: &str) {
        println!("...{}", message);
    }

    fn done(&self, message: &str) {
        println!("   {}", message);
    }

    async fn checkpoint(&self, prompt: &str) -> Result<(), ConsoleError> {
        use std::io::Write;
        print!("   {}", prompt);
        std::io::stdout().flush()?;

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Err(ConsoleError::Closed);
        }
        Ok(())
    }
}

/// Scripted console for tests: records narration and checkpoint prompts,
/// resuming every checkpoint immediately.
#[derive(Default)]
pub struct ScriptedConsole {
    events: Mutex<Vec<ConsoleEvent>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Step(String),
    Done(String),
    Checkpoint(String),
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn checkpoint_prompts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ConsoleEvent::Checkpoint(prompt) => Some(prompt),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl OperatorConsole for ScriptedConsole {
    fn step(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ConsoleEvent::Step(message.to_string()));
    }

    fn done(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ConsoleEvent::Done(message.to_string()));
    }

    async fn checkpoint(&self, prompt: &str) -> Result<(), ConsoleError> {
        self.events
            .lock()
            .unwrap()
            .push(ConsoleEvent::Checkpoint(prompt.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_console_records_in_order() {
        let console = ScriptedConsole::new();
        console.step("Removing permission set assignment");
        console.checkpoint("Press enter to continue...").await.unwrap();
        console.done("Permission set removed");

        assert_eq!(
            console.events(),
            vec![
                ConsoleEvent::Step("Removing permission set assignment".to_string()),
                ConsoleEvent::Checkpoint("Press enter to continue...".to_string()),
                ConsoleEvent::Done("Permission set removed".to_string()),
            ]
        );
        assert_eq!(
            console.checkpoint_prompts(),
            vec!["Press enter to continue...".to_string()]
        );
    }
}
