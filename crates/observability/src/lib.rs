//! Process-wide tracing setup.

pub mod tracing;

pub use tracing::LogFormat;

/// Initialize tracing with JSON output.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}
