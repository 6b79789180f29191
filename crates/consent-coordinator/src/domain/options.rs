//! Options accepted by `grant` and `deny`.

use serde::{Deserialize, Serialize};

/// `{ expires }` options of a decision.
///
/// `expires = Some(0)` marks a one-time decision: it is broadcast but not
/// persisted. Any other value, or none, persists the decision; the lifetime
/// of the persisted flag is left to the store's substrate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<u64>,
}

impl DecisionOptions {
    /// Broadcast without persisting.
    #[must_use]
    pub fn one_time() -> Self {
        Self { expires: Some(0) }
    }

    #[must_use]
    pub fn with_expires(expires: u64) -> Self {
        Self {
            expires: Some(expires),
        }
    }

    /// Whether the decision should reach the store.
    #[must_use]
    pub fn persists(&self) -> bool {
        self.expires != Some(0)
    }
}
