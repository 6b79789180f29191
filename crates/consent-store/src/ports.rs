//! # Consent Store Port
//!
//! The interface the coordinator requires from whatever keeps the flags.

use crate::error::StoreError;
use consent_types::{ConsentId, ConsentValue, Decision};
use std::sync::Arc;

/// Per-id consent flags.
///
/// Implementations use interior mutability; one store is shared by every
/// coordinator in the process.
pub trait ConsentStore: Send + Sync {
    /// Current value of `id`. Missing or unparseable flags are `Unknown`.
    fn get(&self, id: &ConsentId) -> ConsentValue;

    /// Record `decision` for every id, overwriting earlier flags.
    fn set(&self, ids: &[ConsentId], decision: Decision) -> Result<(), StoreError>;
}

impl<T: ConsentStore + ?Sized> ConsentStore for Arc<T> {
    fn get(&self, id: &ConsentId) -> ConsentValue {
        (**self).get(id)
    }

    fn set(&self, ids: &[ConsentId], decision: Decision) -> Result<(), StoreError> {
        (**self).set(ids, decision)
    }
}
