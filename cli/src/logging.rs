use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Compact logs on stderr so they never mix with command output.
/// - `--verbose` forces `debug`
/// - otherwise `RUST_LOG`, falling back to `warn`
pub fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
