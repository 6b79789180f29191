//! # Consent Bus - Named-Event Channel for Consent Signals
//!
//! Carries `request`, `grant` and `deny` events between independent parties
//! that share one process.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Requester   │                    │   Observer   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │   Channel    │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Delivery
//!
//! - `publish` runs every listener of the event kind synchronously, in
//!   registration order, before it returns.
//! - Listeners see the whole batch; filtering by id is their job.
//! - A listener may detach itself by returning `ControlFlow::Break(())`, or
//!   be detached by id through `unsubscribe`.
//! - Async observers can additionally take an `EventStream` fed from a
//!   broadcast channel.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ConsentEvent, EventDetail, EventFilter, EventKind};
pub use publisher::{ConsentChannel, InMemoryConsentChannel, Listener, SubscriptionId};
pub use subscriber::{EventStream, ListenerGuard, Subscription, SubscriptionError};

/// Maximum events buffered per stream observer before it lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
