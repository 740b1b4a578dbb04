//! Tracing and logging (shared setup).

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(config: &LogConfig) {
    tracing::init(config);
}

/// Subscriber configuration (format, filters).
pub mod tracing;

pub use tracing::{LogConfig, LogFormat};
