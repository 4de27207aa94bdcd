//! Tracing initialization.
//!
//! Standard output carries the command's result lines, so all diagnostics go to standard error.
//! The filter comes from `RUST_LOG` and defaults to `warn`, which keeps a normal run silent apart
//! from constraint violations and slow statements.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber: env filter plus a fmt layer on stderr.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    tracing::debug!("Telemetry initialized");
    Ok(())
}
