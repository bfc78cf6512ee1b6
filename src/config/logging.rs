//! Environment and log filter setup for the binary.
//!
//! `.env` has to be loaded before the subscriber is built, otherwise a
//! `RUST_LOG` set there is never seen.

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "info";

/// Loads `.env` from the working directory or its parents.
///
/// Returns the file that was loaded, or the reason none was.
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

/// Builds the log filter from `RUST_LOG`.
#[must_use]
pub fn log_filter() -> EnvFilter {
    log_filter_from(EnvFilter::DEFAULT_ENV)
}

/// Builds the log filter from the environment variable `var`, falling back to `info`.
#[must_use]
pub fn log_filter_from(var: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_filter_comes_from_loaded_env_file() {
        let path = std::env::temp_dir().join(format!("hostel-gate-{}.env", std::process::id()));
        std::fs::write(&path, "HOSTEL_GATE_TEST_LOG=warn\n").unwrap();

        dotenvy::from_path(&path).unwrap();
        let filter = log_filter_from("HOSTEL_GATE_TEST_LOG");
        std::fs::remove_file(&path).unwrap();

        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_filter_defaults_to_info() {
        assert_eq!(log_filter_from("HOSTEL_GATE_UNSET_LOG").to_string(), "info");
    }
}
