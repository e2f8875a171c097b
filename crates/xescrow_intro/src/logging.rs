//! Log output for hosts and tools

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber filtered by `RUST_LOG`, defaulting to `info`
///
/// Returns false if a global subscriber was already installed.
pub fn init() -> bool {
    init_with_default("info")
}

/// Like [`init`] with a custom fallback directive such as `"xescrow_intro=debug"`
pub fn init_with_default(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
