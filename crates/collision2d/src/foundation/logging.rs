//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Reads the filter from `RUST_LOG`; calling it more than once is harmless.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize logging with a default filter used when `RUST_LOG` is unset
pub fn init_with_default(filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}
