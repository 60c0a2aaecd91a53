// Logging for the `schemamap` binary, powered by tracing-subscriber.
//
// The library only emits `tracing` events; installing a subscriber is the
// binary's job. `RUST_LOG` takes precedence over `--log-level`.

use tracing_subscriber::EnvFilter;

/// Log format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact text format: timestamp LEVEL message
    Compact,
    /// JSON Lines format for structured logging
    Json,
}

fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for converted schemas.
pub fn init(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
