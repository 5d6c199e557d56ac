//! Telemetry logic.
//! Structured logs on standard error, standard output is left to the host.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "ad_provider=info";

/// Install a global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn setup_logging(default_filter: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_once() {
        assert!(setup_logging(DEFAULT_FILTER).is_ok());
        // A global subscriber is already installed.
        assert!(setup_logging(DEFAULT_FILTER).is_err());
    }
}
