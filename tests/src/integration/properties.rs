//! # Coordinator Guarantees
//!
//! Observable behaviour every consumer of the coordinator relies on:
//!
//! 1. Unknown until decided, and one-time decisions never persist
//! 2. Waits resolve on the fast path, or only once every id is covered
//! 3. Independent waiters resolve independently from a single publish

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use consent_bus::ConsentChannel;
    use consent_coordinator::{ConsentValue, DecisionOptions, EventKind};
    use futures::FutureExt;
    use tokio::time::timeout;

    use crate::integration::coordinator;

    const PENDING_WINDOW: Duration = Duration::from_millis(50);

    // =========================================================================
    // STATUS
    // =========================================================================

    #[test]
    fn test_never_persisted_ids_are_unknown() {
        let consent = coordinator();
        for id in ["analytics", "ads", "", "consent-ads", "a;b"] {
            assert_eq!(consent.status(id), ConsentValue::Unknown, "id = {id:?}");
        }
    }

    #[test]
    fn test_grant_batch_persists_every_id() {
        let consent = coordinator();
        consent.grant(["a", "b"], DecisionOptions::default());

        assert_eq!(consent.status("a"), ConsentValue::Granted);
        assert_eq!(consent.status("b"), ConsentValue::Granted);
    }

    #[test]
    fn test_one_time_grant_leaves_status_unknown() {
        let consent = coordinator();
        consent.grant(["a", "b"], DecisionOptions::one_time());

        assert_eq!(consent.status("a"), ConsentValue::Unknown);
        assert_eq!(consent.status("b"), ConsentValue::Unknown);
    }

    #[test]
    fn test_later_decision_overwrites() {
        let consent = coordinator();
        consent.grant("a", DecisionOptions::default());
        consent.deny("a", DecisionOptions::default());
        assert_eq!(consent.status("a"), ConsentValue::Denied);

        // One-time decisions leave the stored value alone.
        consent.grant("a", DecisionOptions::one_time());
        assert_eq!(consent.status("a"), ConsentValue::Denied);
    }

    // =========================================================================
    // WAITS
    // =========================================================================

    #[tokio::test]
    async fn test_granted_resolves_immediately_when_already_granted() {
        let consent = coordinator();
        consent.grant("a", DecisionOptions::default());

        assert_eq!(consent.granted("a").now_or_never(), Some(()));
    }

    #[tokio::test]
    async fn test_granted_waits_for_grant_event() {
        let consent = coordinator();
        let mut wait = consent.granted("a");

        assert!(timeout(PENDING_WINDOW, &mut wait).await.is_err());

        // Events of other kinds or for other ids do not count.
        consent.deny("a", DecisionOptions::default());
        consent.request("a");
        consent.grant("b", DecisionOptions::default());
        assert!(timeout(PENDING_WINDOW, &mut wait).await.is_err());

        consent.grant("a", DecisionOptions::default());
        timeout(PENDING_WINDOW, wait).await.expect("resolved");
    }

    #[tokio::test]
    async fn test_partially_granted_set_waits_for_the_rest() {
        let consent = coordinator();
        consent.grant("a", DecisionOptions::default());

        let mut wait = consent.granted(["a", "b"]);
        assert!(timeout(PENDING_WINDOW, &mut wait).await.is_err());

        consent.grant(["c", "b"], DecisionOptions::default());
        timeout(PENDING_WINDOW, wait).await.expect("resolved");
    }

    #[tokio::test]
    async fn test_separate_grants_resolve_only_after_the_second() {
        let consent = coordinator();
        let mut wait = consent.granted(["a", "b"]);

        consent.grant("a", DecisionOptions::default());
        assert!((&mut wait).now_or_never().is_none());
        assert_eq!(wait.pending().len(), 1);

        consent.grant("b", DecisionOptions::default());
        assert_eq!(wait.now_or_never(), Some(()));
    }

    #[tokio::test]
    async fn test_which_grant_supplies_an_id_does_not_matter() {
        for order in [["a", "b"], ["b", "a"]] {
            let consent = coordinator();
            consent.grant("a", DecisionOptions::default());
            let mut wait = consent.granted(["a", "b"]);

            consent.grant(order[0], DecisionOptions::default());
            consent.grant(order[1], DecisionOptions::default());

            assert_eq!((&mut wait).now_or_never(), Some(()), "order = {order:?}");
        }
    }

    #[tokio::test]
    async fn test_one_time_deny_still_resolves_waiters() {
        let consent = coordinator();
        let wait = consent.denied("a");

        consent.deny("a", DecisionOptions { expires: Some(0) });

        assert_eq!(consent.status("a"), ConsentValue::Unknown);
        timeout(PENDING_WINDOW, wait).await.expect("resolved");
    }

    #[tokio::test]
    async fn test_two_requested_waiters_share_one_publish() {
        let consent = coordinator();
        let first = consent.requested("x");
        let second = consent.requested("x");
        assert_eq!(consent.context().channel().listener_count(EventKind::Request), 2);

        consent.request("x");

        timeout(PENDING_WINDOW, async {
            first.await;
            second.await;
        })
        .await
        .expect("both resolved");
        assert_eq!(consent.context().channel().listener_count(EventKind::Request), 0);
    }

    #[tokio::test]
    async fn test_requested_ignores_stored_decisions() {
        let consent = coordinator();
        consent.grant("x", DecisionOptions::default());

        let mut wait = consent.requested("x");
        assert!((&mut wait).now_or_never().is_none());

        consent.request(["x", "y"]);
        assert_eq!(wait.now_or_never(), Some(()));
    }

    #[tokio::test]
    async fn test_resolved_wait_ignores_further_events() {
        let consent = coordinator();
        let wait = consent.granted("a");
        consent.grant("a", DecisionOptions::one_time());
        wait.await;

        consent.grant("a", DecisionOptions::one_time());
        assert_eq!(consent.context().channel().listener_count(EventKind::Grant), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecided_wait_can_be_bounded() {
        let consent = coordinator();
        let err = consent
            .denied(["a", "b"])
            .timeout(Duration::from_secs(30))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("deny"));
        assert_eq!(consent.context().channel().listener_count(EventKind::Deny), 0);
    }
}
