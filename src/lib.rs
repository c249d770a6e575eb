// sandbox-reauth - sandbox connected-app re-authorization orchestration
// This exposes the core components for testing and integration

pub mod config;
pub mod console;
pub mod external;
pub mod oauth;
pub mod platform;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::ReauthConfig;
pub use console::{ConsoleError, OperatorConsole, ScriptedConsole, StdinConsole};
pub use external::{
    AuthError, BrowserOpener, CommandBrowser, CommandError, CommandExecutor, CommandOutput,
    IdentityCli, ProcessCommandExecutor, SfdxCli,
};
pub use platform::{AssignmentAction, PlatformError, PlatformOps, RestClient};
pub use telemetry::init_telemetry;
pub use workflow::{ReauthWorkflow, StepError, WorkflowContext, WorkflowError, WorkflowStep};
