//! # Consent Bus Test Suite
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── properties.rs   # Observable guarantees of the coordinator
//!     └── flows.rs        # Independent parties sharing one context
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p consent-tests
//! cargo test -p consent-tests integration::flows::
//! ```

#![allow(dead_code)]

pub mod integration;
