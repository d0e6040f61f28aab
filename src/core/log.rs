//! Console logging for the binary entry point.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, filter::Targets, fmt, prelude::*};

/// Quiet by default. `--verbose` turns on debug output for this crate
/// only, and a `RUST_LOG` environment variable overrides both.
pub fn init_logging(verbose: bool) {
    let crate_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(crate_level.into()));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(Targets::new().with_target(env!("CARGO_PKG_NAME"), crate_level))
        .with(env_filter)
        .init();
}
