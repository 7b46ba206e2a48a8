use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a stderr subscriber.
///
/// `--verbose` and `--quiet` pick the level; otherwise `RUST_LOG` is
/// honored, defaulting to "warn".
pub fn init(verbose: bool, quiet: bool) {
    let filter = match (verbose, quiet) {
        (true, _) => EnvFilter::new("debug"),
        (false, true) => EnvFilter::new("error"),
        (false, false) => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
