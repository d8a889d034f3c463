//! Log output for the delivery runner binaries.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,modsync_delivery=info,modsync_production=info";

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_filter` when the variable is unset or does not
/// parse. Fails if a global subscriber is already installed.
pub fn init_tracing(
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
