use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::config::MonitoringConfig;

/// JSON logs to stderr so stdout stays free for the console summary.
pub fn init_logging(config: &MonitoringConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

    Ok(())
}
