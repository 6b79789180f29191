//! # Integration Test Flows
//!
//! Independent parties sharing one `ConsentContext`:
//!
//! 1. **Tag loader → CMP → tag loader**: a script requests consent, a consent
//!    manager answers, the gated script runs
//! 2. **Cookie layout**: decisions land as `consent-<id>=0|1; path=/` flags
//! 3. **Durable decisions**: a file-backed store survives a restart
//! 4. **Observers**: async event streams see the same signals as listeners
//! 5. **Threads**: decisions racing a gate on a multi-threaded runtime

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use consent_bus::{ConsentChannel, ConsentEvent, EventFilter, EventKind, InMemoryConsentChannel};
    use consent_coordinator::{
        ConsentConfig, ConsentContext, ConsentCoordinator, ConsentValue, DecisionOptions,
    };
    use consent_store::{ConsentStore, CookieJarStore, FileConsentStore};
    use consent_telemetry::{init_tracing, TelemetryConfig};
    use consent_types::ConsentConfigBuilder;
    use futures::FutureExt;
    use parking_lot::Mutex;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    const STEP: Duration = Duration::from_millis(200);

    fn quiet_tracing() {
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
            console_output: false,
            ..TelemetryConfig::default()
        };
        // Another test may have installed the subscriber already.
        let _ = init_tracing(&config);
    }

    // =========================================================================
    // MULTI-PARTY FLOWS
    // =========================================================================

    /// A tag loader requests consent and waits; a consent manager answers the
    /// request from another task.
    #[tokio::test]
    async fn test_request_answered_by_other_party() {
        quiet_tracing();
        let context = ConsentContext::in_memory();
        let loader = ConsentCoordinator::with_site_id(context.clone(), "site-1");
        let manager = ConsentCoordinator::with_site_id(context.clone(), "site-1");

        // The manager answers every request once it sees one.
        let requested = manager.requested("analytics");
        let answer = tokio::spawn(async move {
            requested.await;
            manager.grant("analytics", DecisionOptions::default());
        });

        let gate = loader.granted("analytics");
        loader.request("analytics");

        timeout(STEP, gate).await.expect("gate opened");
        answer.await.expect("manager task");
        assert_eq!(loader.status("analytics"), ConsentValue::Granted);
    }

    /// Gated code awaiting several purposes runs once the last one is decided,
    /// regardless of which party decides it.
    #[tokio::test]
    async fn test_gate_opens_after_last_purpose() {
        let context = ConsentContext::in_memory();
        let gated = ConsentCoordinator::with_site_id(context.clone(), "site-1");
        let banner = ConsentCoordinator::with_site_id(context.clone(), "site-1");
        let settings = ConsentCoordinator::with_site_id(context, "site-1");

        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();
        let gate = gated.granted(["ads", "analytics"]);
        let task = tokio::spawn(async move {
            gate.await;
            *flag.lock() = true;
        });

        banner.grant("ads", DecisionOptions::default());
        tokio::task::yield_now().await;
        assert!(!*ran.lock());

        settings.grant("analytics", DecisionOptions::default());
        timeout(STEP, task).await.expect("timeout").expect("task");
        assert!(*ran.lock());
    }

    /// A grant issued from another worker thread while the gate is being
    /// built either satisfies the store check or reaches the gate's listener.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_grant_never_strands_a_gate() {
        for round in 0..500 {
            let consent = crate::integration::coordinator();
            let manager = consent.clone();
            let barrier = Arc::new(std::sync::Barrier::new(2));
            let start = barrier.clone();

            let decision = tokio::task::spawn_blocking(move || {
                start.wait();
                manager.grant("a", DecisionOptions::default());
            });
            barrier.wait();
            let gate = consent.granted("a");

            decision.await.expect("grant task");
            assert_eq!(consent.status("a"), ConsentValue::Granted);
            timeout(STEP, gate)
                .await
                .unwrap_or_else(|_| panic!("gate stranded in round {round}"));
        }
    }

    /// Several parties decide on separate worker threads; one gate covers
    /// all of them.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_gate_collects_decisions_from_many_threads() {
        let consent = crate::integration::coordinator();
        let purposes: Vec<String> = (0..16).map(|n| format!("purpose-{n}")).collect();
        let gate = consent.granted(purposes.clone());

        let parties: Vec<_> = purposes
            .into_iter()
            .map(|purpose| {
                let party = consent.clone();
                tokio::spawn(async move { party.grant(purpose, DecisionOptions::one_time()) })
            })
            .collect();
        for party in parties {
            party.await.expect("party task");
        }

        timeout(STEP, gate).await.expect("all purposes granted");
        assert_eq!(consent.context().channel().listener_count(EventKind::Grant), 0);
    }

    /// A deny does not open a grant gate; the gate stays pending and is
    /// released when dropped.
    #[tokio::test]
    async fn test_deny_keeps_grant_gate_closed() {
        let consent = crate::integration::coordinator();
        let mut gate = consent.granted("ads");
        let mut refusal = consent.denied("ads");

        consent.deny("ads", DecisionOptions::default());

        assert_eq!((&mut refusal).now_or_never(), Some(()));
        assert!(timeout(Duration::from_millis(20), &mut gate).await.is_err());
        assert_eq!(consent.status("ads"), ConsentValue::Denied);

        drop(gate);
        assert_eq!(consent.context().channel().listener_count(EventKind::Grant), 0);
    }

    /// A listener reacting synchronously to a grant sees the store before the
    /// decision is written.
    #[test]
    fn test_listener_sees_store_before_write() {
        let context = ConsentContext::in_memory();
        let consent = ConsentCoordinator::new(context.clone(), ConsentConfig::default());

        let observed = Arc::new(Mutex::new(Vec::new()));
        let store = context.store().clone();
        let sink = observed.clone();
        context.channel().subscribe(
            EventKind::Grant,
            Arc::new(move |event: &ConsentEvent| {
                for id in &event.ids {
                    sink.lock().push(store.get(id));
                }
                std::ops::ControlFlow::Continue(())
            }),
        );

        consent.deny("a", DecisionOptions::default());
        consent.grant("a", DecisionOptions::default());

        assert_eq!(*observed.lock(), vec![ConsentValue::Denied]);
        assert_eq!(consent.status("a"), ConsentValue::Granted);
    }

    // =========================================================================
    // PERSISTENCE SUBSTRATES
    // =========================================================================

    #[test]
    fn test_cookie_layout_from_config() {
        let config = ConsentConfigBuilder::new()
            .site_id("site-9")
            .build()
            .expect("valid config");
        let store = Arc::new(CookieJarStore::from_config(&config));
        let channel = Arc::new(InMemoryConsentChannel::new().with_event_prefix(config.event_prefix.clone()));
        let consent = ConsentCoordinator::new(ConsentContext::new(store.clone(), channel), config);

        consent.grant(["analytics", "ads"], DecisionOptions::default());
        consent.deny("ads", DecisionOptions::default());
        consent.grant("video", DecisionOptions::one_time());

        assert_eq!(
            store.set_cookie_lines(),
            vec![
                "consent-analytics=1; path=/".to_string(),
                "consent-ads=0; path=/".to_string(),
            ]
        );
        assert_eq!(consent.site_id(), Some("site-9"));
    }

    /// Another script on the page expires or corrupts a cookie; the
    /// coordinator reads whatever the substrate holds now.
    #[tokio::test]
    async fn test_external_cookie_changes_are_visible() {
        let store = Arc::new(CookieJarStore::new());
        let context = ConsentContext::new(store.clone(), Arc::new(InMemoryConsentChannel::new()));
        let consent = ConsentCoordinator::new(context, ConsentConfig::default());

        consent.grant("ads", DecisionOptions::default());
        assert_eq!(consent.granted("ads").now_or_never(), Some(()));

        store.set_raw("consent-ads", "garbage");
        assert_eq!(consent.status("ads"), ConsentValue::Unknown);

        store.expire("consent-ads");
        let mut gate = consent.granted("ads");
        assert!((&mut gate).now_or_never().is_none());

        consent.grant("ads", DecisionOptions::default());
        assert_eq!(gate.now_or_never(), Some(()));
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("consent.json");

        {
            let store = Arc::new(FileConsentStore::open(&path).expect("open"));
            let consent = ConsentCoordinator::new(
                ConsentContext::new(store, Arc::new(InMemoryConsentChannel::new())),
                ConsentConfig::default(),
            );
            consent.grant("analytics", DecisionOptions::default());
            consent.deny("ads", DecisionOptions::default());
            consent.grant("video", DecisionOptions::one_time());
        }

        let store = Arc::new(FileConsentStore::open(&path).expect("reopen"));
        let consent = ConsentCoordinator::new(
            ConsentContext::new(store, Arc::new(InMemoryConsentChannel::new())),
            ConsentConfig::default(),
        );
        assert_eq!(consent.status("analytics"), ConsentValue::Granted);
        assert_eq!(consent.status("ads"), ConsentValue::Denied);
        assert_eq!(consent.status("video"), ConsentValue::Unknown);
        assert_eq!(consent.granted("analytics").now_or_never(), Some(()));
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    #[tokio::test]
    async fn test_stream_observer_sees_decisions() {
        let channel = Arc::new(InMemoryConsentChannel::new());
        let decisions = channel.event_stream(EventFilter::kinds(vec![EventKind::Grant, EventKind::Deny]));
        let consent = ConsentCoordinator::new(
            ConsentContext::new(Arc::new(CookieJarStore::new()), channel.clone()),
            ConsentConfig::default(),
        );

        consent.request("ads");
        consent.grant(["ads", "analytics"], DecisionOptions::default());
        consent.deny("video", DecisionOptions::one_time());

        let seen: Vec<ConsentEvent> = timeout(STEP, decisions.take(2).collect())
            .await
            .expect("two decisions");
        assert_eq!(
            seen,
            vec![
                ConsentEvent::grant(["ads", "analytics"]),
                ConsentEvent::deny("video"),
            ]
        );
        assert_eq!(channel.events_published(), 3);
        assert_eq!(
            seen[0].name(channel.event_prefix()),
            "consent.grant".to_string()
        );
    }
}
