//! # Core Domain Entities
//!
//! - **Identity**: `ConsentId`, `ConsentIds`
//! - **Outcome**: `ConsentValue` (what a reader sees), `Decision` (what a
//!   writer records)

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// =============================================================================
// IDENTITY
// =============================================================================

/// Opaque name of a consent purpose, e.g. `"analytics"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsentId(String);

impl ConsentId {
    /// Wrap a caller-defined consent id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ConsentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConsentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ConsentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConsentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ConsentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for ConsentId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<&ConsentId> for ConsentId {
    fn from(id: &ConsentId) -> Self {
        id.clone()
    }
}

/// One consent id or an ordered batch of them.
///
/// Every public operation accepts `impl Into<ConsentIds>`, so callers may pass
/// `"ads"`, `["ads", "analytics"]`, a `Vec<String>` or a slice. Order and
/// duplicates are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsentIds(Vec<ConsentId>);

impl ConsentIds {
    #[must_use]
    pub fn new(ids: Vec<ConsentId>) -> Self {
        Self(ids)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ConsentId] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ConsentId> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConsentId> {
        self.0.iter()
    }
}

impl fmt::Display for ConsentIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(id.as_str())?;
        }
        f.write_str("]")
    }
}

impl<'a> IntoIterator for &'a ConsentIds {
    type Item = &'a ConsentId;
    type IntoIter = std::slice::Iter<'a, ConsentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ConsentIds {
    type Item = ConsentId;
    type IntoIter = std::vec::IntoIter<ConsentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Into<ConsentId>> FromIterator<T> for ConsentIds {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<ConsentId> for ConsentIds {
    fn from(id: ConsentId) -> Self {
        Self(vec![id])
    }
}

impl From<&ConsentId> for ConsentIds {
    fn from(id: &ConsentId) -> Self {
        Self(vec![id.clone()])
    }
}

impl From<&str> for ConsentIds {
    fn from(id: &str) -> Self {
        Self(vec![id.into()])
    }
}

impl From<String> for ConsentIds {
    fn from(id: String) -> Self {
        Self(vec![id.into()])
    }
}

impl<T: Into<ConsentId>> From<Vec<T>> for ConsentIds {
    fn from(ids: Vec<T>) -> Self {
        ids.into_iter().collect()
    }
}

impl<T: Into<ConsentId> + Clone> From<&[T]> for ConsentIds {
    fn from(ids: &[T]) -> Self {
        ids.iter().cloned().collect()
    }
}

impl<T: Into<ConsentId>, const N: usize> From<[T; N]> for ConsentIds {
    fn from(ids: [T; N]) -> Self {
        ids.into_iter().collect()
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Observed state of a consent id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentValue {
    Granted,
    Denied,
    /// No decision on record.
    #[default]
    Unknown,
}

impl ConsentValue {
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    #[must_use]
    pub fn is_denied(self) -> bool {
        matches!(self, Self::Denied)
    }

    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The recorded decision, if there is one.
    #[must_use]
    pub fn decision(self) -> Option<Decision> {
        match self {
            Self::Granted => Some(Decision::Granted),
            Self::Denied => Some(Decision::Denied),
            Self::Unknown => None,
        }
    }

    /// Lowercase name, `None` for `Unknown`.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        self.decision().map(Decision::as_str)
    }
}

impl fmt::Display for ConsentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("unknown"))
    }
}

/// A recorded outcome. Unlike `ConsentValue` there is no unknown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Granted,
    Denied,
}

impl Decision {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl From<Decision> for ConsentValue {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Granted => Self::Granted,
            Decision::Denied => Self::Denied,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
