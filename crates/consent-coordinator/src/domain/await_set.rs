//! Pending-id aggregation shared by every wait.

use consent_types::ConsentId;

/// Ids a wait has not matched yet.
///
/// Targets are deduplicated on construction. Every observed batch removes
/// the ids it contains, whichever publish supplies them. The set reports the
/// transition to empty exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwaitSet {
    pending: Vec<ConsentId>,
}

impl AwaitSet {
    pub fn new(targets: impl IntoIterator<Item = ConsentId>) -> Self {
        let mut pending: Vec<ConsentId> = Vec::new();
        for id in targets {
            if !pending.contains(&id) {
                pending.push(id);
            }
        }
        Self { pending }
    }

    /// Remove every id of `batch` still pending.
    ///
    /// Returns `true` only for the call that empties the set.
    pub fn observe(&mut self, batch: &[ConsentId]) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.pending.retain(|id| !batch.contains(id));
        self.pending.is_empty()
    }

    #[must_use]
    pub fn pending(&self) -> &[ConsentId] {
        &self.pending
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
