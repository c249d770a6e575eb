use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an env-filtered fmt layer on stderr.
///
/// Stdout belongs to the operator console (step narration and checkpoint
/// prompts), so structured logging stays on stderr where it cannot garble a
/// prompt the operator is waiting at.
pub fn init_telemetry(log_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    tracing::debug!("telemetry initialized");
    Ok(())
}
