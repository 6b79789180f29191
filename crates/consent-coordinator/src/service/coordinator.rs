//! Consent Coordinator
//!
//! Turns caller intent into channel events and store writes, and builds the
//! waits that observe them.

use std::future::{ready, Ready};

use consent_bus::EventKind;
use consent_types::{ConsentConfig, ConsentId, ConsentIds, ConsentValue, Decision};
use tracing::{debug, info, warn};

use crate::domain::DecisionOptions;
use crate::service::context::ConsentContext;
use crate::service::wait::ConsentWait;

/// Public consent API.
///
/// Every operation accepts one id or a batch (`impl Into<ConsentIds>`).
/// Cloning is cheap; clones share the same context.
#[derive(Clone)]
pub struct ConsentCoordinator {
    context: ConsentContext,
    config: ConsentConfig,
}

impl ConsentCoordinator {
    pub fn new(context: ConsentContext, config: ConsentConfig) -> Self {
        info!(
            site_id = ?config.site_id,
            key_prefix = %config.key_prefix,
            event_prefix = %config.event_prefix,
            "Consent coordinator ready"
        );
        Self { context, config }
    }

    /// Coordinator over a cookie-jar context laid out by `config`, so the
    /// store, the channel and the coordinator agree on every prefix.
    pub fn from_config(config: ConsentConfig) -> Self {
        Self::new(ConsentContext::from_config(&config), config)
    }

    /// Coordinator with the default layout, identified by `site_id`.
    pub fn with_site_id(context: ConsentContext, site_id: impl Into<String>) -> Self {
        let config = ConsentConfig {
            site_id: Some(site_id.into()),
            ..ConsentConfig::default()
        };
        Self::new(context, config)
    }

    /// Site identifier given at construction. Retained, not interpreted.
    #[must_use]
    pub fn site_id(&self) -> Option<&str> {
        self.config.site_id.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    #[must_use]
    pub fn context(&self) -> &ConsentContext {
        &self.context
    }

    /// Already-completed future; lets a consumer confirm the coordinator is
    /// loaded.
    pub fn ready(&self) -> Ready<()> {
        ready(())
    }

    /// Current stored value of a single id.
    #[must_use]
    pub fn status(&self, id: impl Into<ConsentId>) -> ConsentValue {
        self.context.store().get(&id.into())
    }

    /// Ask for a decision on `ids`. Nothing is stored.
    pub fn request(&self, ids: impl Into<ConsentIds>) {
        let ids = ids.into();
        let listeners = self
            .context
            .channel()
            .publish(EventKind::Request, ids.as_slice());
        debug!(
            event = %self.config.event_name(EventKind::Request.as_str()),
            ids = %ids,
            listeners,
            "Consent requested"
        );
    }

    /// Grant `ids`, then persist unless `options` mark it one-time.
    pub fn grant(&self, ids: impl Into<ConsentIds>, options: DecisionOptions) {
        self.decide(EventKind::Grant, Decision::Granted, ids.into(), options);
    }

    /// Deny `ids`, then persist unless `options` mark it one-time.
    pub fn deny(&self, ids: impl Into<ConsentIds>, options: DecisionOptions) {
        self.decide(EventKind::Deny, Decision::Denied, ids.into(), options);
    }

    fn decide(&self, kind: EventKind, decision: Decision, ids: ConsentIds, options: DecisionOptions) {
        let persisted = options.persists();
        let listeners = {
            let _decisions = self.context.lock_decisions();

            // Publish first: listeners reacting inline still see the old store.
            let listeners = self.context.channel().publish(kind, ids.as_slice());
            if persisted {
                if let Err(e) = self.context.store().set(ids.as_slice(), decision) {
                    warn!(ids = %ids, decision = %decision, error = %e, "Failed to persist consent decision");
                }
            }
            listeners
        };

        info!(
            event = %self.config.event_name(kind.as_str()),
            ids = %ids,
            listeners,
            persisted,
            "Consent decision published"
        );
    }

    /// Resolves once `request` events have covered every id. There is no
    /// stored counterpart to check first.
    pub fn requested(&self, ids: impl Into<ConsentIds>) -> ConsentWait {
        ConsentWait::listen(
            self.context.channel(),
            EventKind::Request,
            ids.into().into_vec(),
            |_| false,
        )
    }

    /// Resolves once every id is granted, counting ids already stored as
    /// granted.
    pub fn granted(&self, ids: impl Into<ConsentIds>) -> ConsentWait {
        self.await_decision(EventKind::Grant, Decision::Granted, ids.into())
    }

    /// Resolves once every id is denied, counting ids already stored as
    /// denied.
    pub fn denied(&self, ids: impl Into<ConsentIds>) -> ConsentWait {
        self.await_decision(EventKind::Deny, Decision::Denied, ids.into())
    }

    fn await_decision(&self, kind: EventKind, target: Decision, ids: ConsentIds) -> ConsentWait {
        let _decisions = self.context.lock_decisions();
        let store = self.context.store();
        let target = ConsentValue::from(target);
        ConsentWait::listen(self.context.channel(), kind, ids.into_vec(), |id| {
            store.get(id) == target
        })
    }
}
