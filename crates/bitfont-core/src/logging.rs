//! Logging bootstrap built on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,bitfont=debug,cosmic_text=info,wgpu_core=info,wgpu_hal=info";

/// Install a fmt subscriber, honouring `RUST_LOG` when present.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    init_with_filter(filter);
}

/// Install a fmt subscriber with an explicit filter.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_filter(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
