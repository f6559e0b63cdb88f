use tracing_subscriber::EnvFilter;

/// Initialise logging to stderr. The default level is `warn`, or `debug`
/// when `verbose` is set; `RUST_LOG` overrides either.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A subscriber may already be installed (tests, embedding hosts).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
