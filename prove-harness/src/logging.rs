use std::env;
use std::io;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PROVE_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Installs a stderr subscriber filtered by `PROVE_LOG`, then `RUST_LOG`,
/// then `warn`. Does nothing if a global subscriber is already set.
pub fn init() {
    let filter = env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
