//! Diagnostic logging for the CLI.
//!
//! Logs go to stderr so stdout stays machine-readable. The filter comes
//! from `BARISTA_LOG` (e.g. `BARISTA_LOG=barista_core=debug`), default `warn`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "BARISTA_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
