//! # Consent Coordinator
//!
//! The public face of the consent bus. Independent parties share one
//! `ConsentContext` (store + channel) and call into a `ConsentCoordinator`
//! to request, grant or deny consent ids, and to await decisions.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure logic, no I/O
//!   - `AwaitSet`: ids a wait has not matched yet
//!   - `DecisionOptions`: `{ expires }`, where `expires = 0` marks a
//!     one-time decision
//!
//! - **Service Layer** (`service/`): orchestration
//!   - `ConsentContext`: the store and channel every call site shares
//!   - `ConsentCoordinator`: request/grant/deny and the awaitable queries
//!   - `ConsentWait`: future resolving once every awaited id matched
//!
//! ## Invariants
//!
//! - A grant or deny is published before it is persisted. A listener
//!   reacting synchronously sees the previous stored value.
//! - A wait resolves at most once, and only when every target id has been
//!   matched by an event or was already decided at call time.
//! - A wait's listener is detached as soon as it resolves, or when the wait
//!   is dropped.
//! - No consent operation fails: unknown ids read as `Unknown`, empty batches
//!   resolve immediately.
//!
//! ## Usage Example
//!
//! ```ignore
//! use consent_coordinator::{ConsentContext, ConsentCoordinator, DecisionOptions};
//!
//! let consent = ConsentCoordinator::with_site_id(ConsentContext::in_memory(), "site-1234");
//!
//! let gate = consent.granted(["analytics", "ads"]);
//! consent.grant("analytics", DecisionOptions::default());
//! consent.grant("ads", DecisionOptions::one_time());
//! gate.await;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod error;
pub mod service;

// Re-exports for convenience
pub use consent_bus::{ConsentEvent, EventKind};
pub use consent_types::{ConsentConfig, ConsentId, ConsentIds, ConsentValue, Decision};
pub use domain::{AwaitSet, DecisionOptions};
pub use error::WaitError;
pub use service::{ConsentContext, ConsentCoordinator, ConsentWait};
