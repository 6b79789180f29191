//! # Consent Store
//!
//! Maps a consent id to `Granted`, `Denied` or `Unknown`, backed by one flag
//! per id.
//!
//! ## Architecture
//!
//! - **Port** (`ports`): `ConsentStore`, the only interface the coordinator
//!   sees.
//! - **Codec** (`codec`): flag values are `"1"` (granted) and `"0"`
//!   (denied); anything else, or no flag at all, reads as unknown.
//! - **Adapters** (`adapters`): substrates the port can sit on
//!   - `CookieJarStore`: `name=value; path=/` flags as a page would keep them
//!   - `InMemoryConsentStore`: plain map, for tests and embedders
//!   - `FileConsentStore`: JSON file rewritten after every write
//!
//! ## Invariants
//!
//! - `Unknown` is never written.
//! - `set` is the only mutation the core performs; expiry and external
//!   rewrites belong to the substrate, so two reads may differ.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod codec;
pub mod error;
pub mod ports;

pub use adapters::{Cookie, CookieJarStore, FileConsentStore, InMemoryConsentStore};
pub use error::StoreError;
pub use ports::ConsentStore;
