//! # Consent Events
//!
//! The three signals that flow through the channel, and the filter stream
//! observers use to pick among them.

use consent_types::{ConsentId, ConsentIds};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of consent signal. Also the suffix of the channel event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Some party wants a decision for the ids.
    Request,
    /// The ids were granted.
    Grant,
    /// The ids were denied.
    Deny,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 3] = [EventKind::Request, EventKind::Grant, EventKind::Deny];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Grant => "grant",
            Self::Deny => "deny",
        }
    }

    /// Full channel event name, e.g. `consent.grant`.
    #[must_use]
    pub fn event_name(self, prefix: &str) -> String {
        format!("{}{}", prefix, self.as_str())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One publish: a kind and the ordered batch of ids it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentEvent {
    pub kind: EventKind,
    pub ids: Vec<ConsentId>,
}

impl ConsentEvent {
    pub fn new(kind: EventKind, ids: impl Into<ConsentIds>) -> Self {
        Self {
            kind,
            ids: ids.into().into_vec(),
        }
    }

    pub fn request(ids: impl Into<ConsentIds>) -> Self {
        Self::new(EventKind::Request, ids)
    }

    pub fn grant(ids: impl Into<ConsentIds>) -> Self {
        Self::new(EventKind::Grant, ids)
    }

    pub fn deny(ids: impl Into<ConsentIds>) -> Self {
        Self::new(EventKind::Deny, ids)
    }

    /// Channel event name under `prefix`.
    #[must_use]
    pub fn name(&self, prefix: &str) -> String {
        self.kind.event_name(prefix)
    }

    /// Whether the batch contains `id`.
    #[must_use]
    pub fn covers(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i.as_str() == id)
    }

    /// The payload as dispatched to listeners: `{ "ids": [...] }`.
    #[must_use]
    pub fn detail(&self) -> EventDetail {
        EventDetail {
            ids: self.ids.clone(),
        }
    }
}

/// Wire payload of a consent event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    pub ids: Vec<ConsentId>,
}

/// Filter for stream observers.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Kinds to include. Empty means all kinds.
    pub kinds: Vec<EventKind>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific kinds.
    #[must_use]
    pub fn kinds(kinds: Vec<EventKind>) -> Self {
        Self { kinds }
    }

    /// Create a filter for a single kind.
    #[must_use]
    pub fn kind(kind: EventKind) -> Self {
        Self { kinds: vec![kind] }
    }

    #[must_use]
    pub fn matches(&self, event: &ConsentEvent) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&event.kind)
    }
}
