//! The shared store and channel.

use consent_bus::{ConsentChannel, InMemoryConsentChannel};
use consent_store::{ConsentStore, CookieJarStore, InMemoryConsentStore};
use consent_types::ConsentConfig;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::sync::Arc;

/// The store and channel one process shares.
///
/// Build it once and hand clones to every coordinator; clones share the same
/// store and channel, and the same decision lock. A decision publishes and
/// persists under that lock, and a wait subscribes and reads the store under
/// it, so no decision can fall between a wait's store check and its listener.
/// The lock is reentrant: listeners may decide or wait again on the same
/// thread, but must not block on another thread that does.
#[derive(Clone)]
pub struct ConsentContext {
    store: Arc<dyn ConsentStore>,
    channel: Arc<dyn ConsentChannel>,
    decisions: Arc<ReentrantMutex<()>>,
}

impl ConsentContext {
    pub fn new(store: Arc<dyn ConsentStore>, channel: Arc<dyn ConsentChannel>) -> Self {
        Self {
            store,
            channel,
            decisions: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// In-memory store and channel with the default layout.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryConsentStore::new()),
            Arc::new(InMemoryConsentChannel::new()),
        )
    }

    /// Cookie-jar store and in-memory channel laid out per `config`.
    pub fn from_config(config: &ConsentConfig) -> Self {
        Self::new(
            Arc::new(CookieJarStore::from_config(config)),
            Arc::new(InMemoryConsentChannel::new().with_event_prefix(config.event_prefix.clone())),
        )
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn ConsentStore> {
        &self.store
    }

    #[must_use]
    pub fn channel(&self) -> &Arc<dyn ConsentChannel> {
        &self.channel
    }

    pub(crate) fn lock_decisions(&self) -> ReentrantMutexGuard<'_, ()> {
        self.decisions.lock()
    }
}
