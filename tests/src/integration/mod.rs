//! Cross-crate integration tests.

pub mod flows;
pub mod properties;

use consent_coordinator::{ConsentContext, ConsentCoordinator};

/// Coordinator over a fresh in-memory context.
pub fn coordinator() -> ConsentCoordinator {
    ConsentCoordinator::with_site_id(ConsentContext::in_memory(), "test-site")
}
