//! # Consent Types Crate
//!
//! Domain entities shared by every consent crate.
//!
//! ## Design Principles
//!
//! - **Opaque ids**: a `ConsentId` is compared by string equality only; the
//!   namespace belongs to the caller.
//! - **Tri-state values**: `Unknown` is the absence of a decision and is never
//!   written anywhere.
//! - **One normalization point**: `ConsentIds` accepts one id or many and
//!   keeps order and duplicates.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod entities;
pub mod errors;

pub use config::{ConsentConfig, ConsentConfigBuilder};
pub use entities::*;
pub use errors::*;
