use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the stderr subscriber once per process.
///
/// `RUST_LOG` wins when present, otherwise the level is `info`
/// (`debug` when `verbose` is set).
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.get_or_init(|| {
        let fallback = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        // a global subscriber installed elsewhere keeps precedence
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    });
}
