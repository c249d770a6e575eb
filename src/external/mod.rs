//! External process integrations
//!
//! Trait-based abstractions over the subprocesses this tool drives: the
//! sfdx identity CLI and the local browser-opening command.

pub mod browser;
pub mod command;
pub mod identity;

pub use browser::{BrowserOpener, CommandBrowser};
pub use command::{CommandError, CommandExecutor, CommandOutput, ProcessCommandExecutor};
pub use identity::{AuthError, IdentityCli, SfdxCli};
