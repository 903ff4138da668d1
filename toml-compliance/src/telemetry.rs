//! Diagnostic logging to stderr.
//!
//! Log lines never mix with the report on stdout. The filter is read from
//! [`LOG_ENV`] and defaults to warnings only.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "TOML_COMPLIANCE_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns an error when the filter directive is malformed or a subscriber
/// is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_DIRECTIVE.to_owned());
    let filter = EnvFilter::try_new(directive)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}
