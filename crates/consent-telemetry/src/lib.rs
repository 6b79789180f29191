//! # Consent Telemetry
//!
//! Structured logging for processes hosting the consent bus. Every consent
//! crate logs through `tracing`; this crate installs the subscriber that
//! turns those events into pretty or JSON lines.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use consent_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_tracing(&config).expect("Failed to init tracing");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CONSENT_SERVICE_NAME` | `consent-bus` | Service name in log lines |
//! | `CONSENT_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `CONSENT_CONSOLE_OUTPUT` | `true` | Emit log lines at all |
//! | `CONSENT_JSON_LOGS` | `false` | JSON instead of pretty lines |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter {directive:?}: {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// A global subscriber is already installed.
    #[error("Tracing subscriber init failed: {0}")]
    SubscriberInit(String),
}
