//! # Consent Channel
//!
//! Defines the publishing side of the bus and its in-memory implementation.

use crate::events::{ConsentEvent, EventFilter, EventKind};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use consent_types::config::DEFAULT_EVENT_PREFIX;
use consent_types::ConsentId;
use parking_lot::RwLock;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Callback run for every publish of the kind it was registered for.
///
/// Returning `ControlFlow::Break(())` detaches the listener once the current
/// dispatch is over.
pub type Listener = Arc<dyn Fn(&ConsentEvent) -> ControlFlow<()> + Send + Sync>;

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Named-event publish/subscribe channel.
///
/// Publish and subscribe never fail. Publishing with no listeners is a no-op.
pub trait ConsentChannel: Send + Sync {
    /// Run every current listener of `kind` with the full batch, in
    /// registration order, before returning.
    ///
    /// # Returns
    ///
    /// The number of listeners that ran.
    fn publish(&self, kind: EventKind, ids: &[ConsentId]) -> usize;

    /// Register `listener` for every future publish of `kind`.
    fn subscribe(&self, kind: EventKind, listener: Listener) -> SubscriptionId;

    /// Detach a listener. Returns `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Number of listeners currently registered for `kind`.
    fn listener_count(&self, kind: EventKind) -> usize;

    /// Total number of publish calls.
    fn events_published(&self) -> u64;
}

struct Registration {
    id: SubscriptionId,
    kind: EventKind,
    active: AtomicBool,
    listener: Listener,
}

/// In-memory implementation of the consent channel.
///
/// Listeners are called inline by `publish`. The registration lock is never
/// held while a listener runs, so listeners may publish, subscribe or
/// unsubscribe themselves. A listener detached during a dispatch is not
/// called for the remainder of it; a listener added during a dispatch first
/// sees the next publish.
///
/// Every published event is also forwarded to a `tokio::sync::broadcast`
/// channel for async stream observers.
pub struct InMemoryConsentChannel {
    /// Listeners in registration order.
    registrations: RwLock<Vec<Arc<Registration>>>,

    next_id: AtomicU64,

    /// Broadcast sender feeding `EventStream`s.
    sender: broadcast::Sender<ConsentEvent>,

    /// Total events published.
    events_published: AtomicU64,

    /// Prefix used when naming events in logs.
    event_prefix: String,

    capacity: usize,
}

impl InMemoryConsentChannel {
    /// Create a channel with the default event prefix and stream capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a channel whose stream observers buffer `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            registrations: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            sender,
            events_published: AtomicU64::new(0),
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            capacity: capacity.max(1),
        }
    }

    /// Name events as `<prefix><kind>` in logs.
    #[must_use]
    pub fn with_event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.event_prefix = prefix.into();
        self
    }

    /// Observe every published event matching `filter` asynchronously.
    ///
    /// Observers only see events published after this call.
    #[must_use]
    pub fn watch(&self, filter: EventFilter) -> Subscription {
        debug!(kinds = ?filter.kinds, "New stream observer");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Stream form of [`InMemoryConsentChannel::watch`].
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Number of live stream observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total listeners across all kinds.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.registrations.read().len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn event_prefix(&self) -> &str {
        &self.event_prefix
    }

    fn detach(&self, ids: &[SubscriptionId]) {
        self.registrations.write().retain(|r| !ids.contains(&r.id));
    }
}

impl Default for InMemoryConsentChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsentChannel for InMemoryConsentChannel {
    fn publish(&self, kind: EventKind, ids: &[ConsentId]) -> usize {
        let event = ConsentEvent {
            kind,
            ids: ids.to_vec(),
        };
        self.events_published.fetch_add(1, Ordering::Relaxed);
        let name = event.name(&self.event_prefix);

        // Observers get the event before any listener can publish a nested one.
        let observers = self.sender.send(event.clone()).unwrap_or(0);

        // Snapshot so listeners can touch the registry while we dispatch.
        let targets: Vec<Arc<Registration>> = self
            .registrations
            .read()
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect();

        let mut delivered = 0;
        let mut finished = Vec::new();
        for registration in &targets {
            if !registration.active.load(Ordering::Acquire) {
                continue;
            }
            delivered += 1;
            if (registration.listener)(&event).is_break() {
                registration.active.store(false, Ordering::Release);
                finished.push(registration.id);
            }
        }
        if !finished.is_empty() {
            self.detach(&finished);
        }

        debug!(
            event = %name,
            ids = ?ids,
            listeners = delivered,
            detached = finished.len(),
            observers,
            "Event published"
        );

        delivered
    }

    fn subscribe(&self, kind: EventKind, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations.write().push(Arc::new(Registration {
            id,
            kind,
            active: AtomicBool::new(true),
            listener,
        }));
        debug!(event = %kind.event_name(&self.event_prefix), subscription = %id, "Listener registered");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registrations = self.registrations.write();
        let Some(position) = registrations.iter().position(|r| r.id == id) else {
            return false;
        };
        let registration = registrations.remove(position);
        registration.active.store(false, Ordering::Release);
        debug!(subscription = %id, "Listener detached");
        true
    }

    fn listener_count(&self, kind: EventKind) -> usize {
        self.registrations
            .read()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
