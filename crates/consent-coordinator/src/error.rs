//! Error types for the consent coordinator

use consent_bus::EventKind;
use consent_types::ConsentId;
use std::time::Duration;
use thiserror::Error;

/// Errors from the optional bounded forms of the wait operations.
///
/// The plain awaitables never fail; they stay pending instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    #[error("timed out after {after:?} waiting for {kind} on {pending:?}")]
    TimedOut {
        kind: EventKind,
        pending: Vec<ConsentId>,
        after: Duration,
    },
}
