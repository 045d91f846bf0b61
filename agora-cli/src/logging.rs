use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber. `default_level` is used
/// when `RUST_LOG` isn't set; an explicit `--log-level` flag takes
/// precedence over both by being folded into `default_level` before this
/// is called.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
