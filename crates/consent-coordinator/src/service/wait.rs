//! Awaitable consent outcomes.

use crate::domain::AwaitSet;
use crate::error::WaitError;
use consent_bus::{ConsentChannel, ConsentEvent, EventKind, Listener, ListenerGuard};
use consent_types::ConsentId;
use parking_lot::Mutex;
use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

struct WaitState {
    pending: AwaitSet,
    resolver: Option<oneshot::Sender<()>>,
}

enum Inner {
    Resolved,
    Pending {
        state: Arc<Mutex<WaitState>>,
        receiver: oneshot::Receiver<()>,
        _guard: ListenerGuard,
    },
}

/// Future that completes once every awaited id has seen a matching event.
///
/// The channel listener backing a wait detaches itself when the wait
/// resolves. Dropping an unresolved wait detaches it as well.
#[must_use = "a consent wait does nothing unless awaited or polled"]
pub struct ConsentWait {
    kind: EventKind,
    inner: Inner,
}

impl ConsentWait {
    /// A wait with nothing left to match.
    pub(crate) fn resolved(kind: EventKind) -> Self {
        Self {
            kind,
            inner: Inner::Resolved,
        }
    }

    /// Listen on `channel` for `kind` events until every target matched.
    ///
    /// Targets for which `settled` holds are dropped once the listener is in
    /// place, so a decision made while the wait is being built is either seen
    /// by `settled` or delivered to the listener.
    pub(crate) fn listen<F>(
        channel: &Arc<dyn ConsentChannel>,
        kind: EventKind,
        targets: Vec<ConsentId>,
        settled: F,
    ) -> Self
    where
        F: Fn(&ConsentId) -> bool,
    {
        let pending = AwaitSet::new(targets);
        if pending.is_empty() {
            return Self::resolved(kind);
        }
        let candidates = pending.pending().to_vec();

        let (resolver, receiver) = oneshot::channel();
        let state = Arc::new(Mutex::new(WaitState {
            pending,
            resolver: Some(resolver),
        }));

        let shared = state.clone();
        let listener: Listener = Arc::new(move |event: &ConsentEvent| {
            let mut state = shared.lock();
            if !state.pending.observe(&event.ids) {
                return if state.resolver.is_some() {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                };
            }
            if let Some(resolver) = state.resolver.take() {
                // The receiver may already be gone if the wait was dropped.
                let _ = resolver.send(());
            }
            debug!(kind = %event.kind, "Consent wait resolved");
            ControlFlow::Break(())
        });

        let id = channel.subscribe(kind, listener);
        let guard = ListenerGuard::new(channel.clone(), id);

        // `settled` may reach into the store, which may publish; the state
        // lock is not held while it runs.
        let already: Vec<ConsentId> = candidates.into_iter().filter(|id| settled(id)).collect();
        if !already.is_empty() {
            let mut locked = state.lock();
            if locked.pending.observe(&already) {
                locked.resolver = None;
                debug!(kind = %kind, "Consent already settled");
                return Self::resolved(kind);
            }
        }

        debug!(kind = %kind, subscription = %id, pending = ?state.lock().pending.pending(), "Consent wait registered");
        Self {
            kind,
            inner: Inner::Pending {
                state,
                receiver,
                _guard: guard,
            },
        }
    }

    /// Event kind this wait listens for.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Ids still unmatched.
    #[must_use]
    pub fn pending(&self) -> Vec<ConsentId> {
        match &self.inner {
            Inner::Resolved => Vec::new(),
            Inner::Pending { state, .. } => state.lock().pending.pending().to_vec(),
        }
    }

    /// Whether every id has been matched. The future completes on its next
    /// poll once this is true.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match &self.inner {
            Inner::Resolved => true,
            Inner::Pending { state, .. } => state.lock().pending.is_empty(),
        }
    }

    /// Await with an upper bound. On timeout the listener is detached and the
    /// unmatched ids are reported.
    pub async fn timeout(mut self, after: Duration) -> Result<(), WaitError> {
        match tokio::time::timeout(after, &mut self).await {
            Ok(()) => Ok(()),
            Err(_) => {
                let pending = self.pending();
                warn!(kind = %self.kind, pending = ?pending, after = ?after, "Consent wait timed out");
                Err(WaitError::TimedOut {
                    kind: self.kind,
                    pending,
                    after,
                })
            }
        }
    }
}

impl Future for ConsentWait {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        let Inner::Pending { receiver, .. } = &mut this.inner else {
            return Poll::Ready(());
        };

        match ready!(Pin::new(receiver).poll(cx)) {
            Ok(()) => {
                this.inner = Inner::Resolved;
                Poll::Ready(())
            }
            // The listener was dropped by the channel without resolving, so
            // nothing can complete this wait any more.
            Err(_) => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for ConsentWait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentWait")
            .field("kind", &self.kind)
            .field("pending", &self.pending())
            .finish()
    }
}
