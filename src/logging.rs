//! Tracing subscriber setup.

use std::io;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "newsbrief=info,reqwest=warn,html5ever=off";

/// Install a stderr subscriber, honouring `RUST_LOG` when set.
///
/// Logs go to stderr so JSON printed on stdout stays machine-readable. Calling this more than
/// once is harmless; only the first call installs a subscriber.
pub fn configure_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
