//! End-to-end continuation chains: one session spanning several chained
//! executions, with exactly one terminal response.

mod common;

use cfn_resource_sdk::{
    HandlerError, HandlerRegistry, ResourcePhase, ResourceResponse, ResponseStatus,
    RouterConfig, RouterOutcome,
};
use cfn_resource_sdk_testing::{create_event, delete_event, TEST_REQUEST_ID, TEST_STACK_ID};
use common::{far_future, Fixture, START};
use serde_json::json;

/// A registry whose create handler checkpoints immediately and whose poll
/// handler counts up through `state.n`, completing at `finish_at`.
fn counting_registry(finish_at: i64) -> HandlerRegistry {
    HandlerRegistry::new()
        .on_create(|_event, _remaining| async move {
            Err(HandlerError::checkpoint(json!({"n": 1})))
        })
        .on_poll(move |event, _remaining| async move {
            let n = event
                .event_state
                .as_ref()
                .and_then(|state| state.get("n"))
                .and_then(|n| n.as_i64())
                .unwrap_or(0);
            if n < finish_at {
                Err(HandlerError::checkpoint(json!({"n": n + 1})))
            } else {
                Ok(ResourceResponse::new()
                    .with_physical_resource_id("r-chained")
                    .with_data_entry("Hops", n))
            }
        })
}

#[tokio::test]
async fn chain_completes_with_exactly_one_report() {
    let fixture = Fixture::new();
    let router = fixture.router(counting_registry(3), RouterConfig::default());

    let mut outcome = router.route(create_event(), far_future()).await;
    // Each continuation hop consumes the newest recorded envelope.
    while outcome == RouterOutcome::Continued {
        let next = fixture.invoker.calls().last().cloned().expect("envelope");
        outcome = router.route(next, far_future()).await;
    }

    assert_eq!(outcome, RouterOutcome::Reported(ResponseStatus::Success));
    assert_eq!(fixture.invoker.calls().len(), 3);
    let call = fixture.reporter.only_call();
    assert_eq!(call.response.physical_resource_id, "r-chained");
    assert_eq!(
        call.response.data.unwrap().get("Hops"),
        Some(&json!(3))
    );
}

#[tokio::test]
async fn session_fields_carry_forward_unchanged_across_the_chain() {
    let fixture = Fixture::new();
    let router = fixture.router(counting_registry(2), RouterConfig::default());

    let mut outcome = router.route(create_event(), far_future()).await;
    while outcome == RouterOutcome::Continued {
        fixture.clock.advance(30);
        let next = fixture.invoker.calls().last().cloned().expect("envelope");
        outcome = router.route(next, far_future()).await;
    }

    let envelopes = fixture.invoker.calls();
    assert!(envelopes.len() >= 2);
    for envelope in &envelopes {
        // The start time stamped on first sight is echoed back verbatim,
        // even though the clock moved between executions.
        assert_eq!(envelope.creation_time, Some(START));
        assert_eq!(envelope.timeout, Some(300));
        assert_eq!(envelope.stack_id, TEST_STACK_ID);
        assert_eq!(envelope.request_id, TEST_REQUEST_ID);
        assert_eq!(envelope.response_url, create_event().response_url);
        assert_eq!(envelope.phase(), ResourcePhase::Poll);
    }
}

#[tokio::test]
async fn checkpoint_state_advances_hop_by_hop() {
    let fixture = Fixture::new();
    let router = fixture.router(counting_registry(3), RouterConfig::default());

    let mut outcome = router.route(create_event(), far_future()).await;
    while outcome == RouterOutcome::Continued {
        let next = fixture.invoker.calls().last().cloned().expect("envelope");
        outcome = router.route(next, far_future()).await;
    }

    let states: Vec<_> = fixture
        .invoker
        .calls()
        .iter()
        .map(|e| e.event_state.clone().unwrap())
        .collect();
    assert_eq!(states, vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 3})]);
}

#[tokio::test]
async fn chain_that_outlives_its_budget_fails_exactly_once() {
    let fixture = Fixture::new();
    // The poll handler never completes; only the deadline can end this.
    let registry = HandlerRegistry::new()
        .on_create(|_event, _remaining| async move {
            Err::<ResourceResponse, _>(HandlerError::checkpoint(json!({"n": 1})))
        })
        .on_poll(|event, _remaining| async move {
            Err::<ResourceResponse, _>(HandlerError::checkpoint(
                event.event_state.unwrap_or_default(),
            ))
        });
    let router = fixture.router(registry, RouterConfig::default());

    let mut outcome = router.route(create_event(), far_future()).await;
    let mut hops = 0;
    while outcome == RouterOutcome::Continued {
        hops += 1;
        assert!(hops < 100, "chain failed to terminate");
        // Each execution burns 120 seconds of the 300 second budget.
        fixture.clock.advance(120);
        let next = fixture.invoker.calls().last().cloned().expect("envelope");
        outcome = router.route(next, far_future()).await;
    }

    assert_eq!(outcome, RouterOutcome::Reported(ResponseStatus::Failed));
    let call = fixture.reporter.only_call();
    let reason = call.response.reason.unwrap();
    assert!(reason.contains("timeout of 300 seconds"), "reason: {reason}");
    // Hops at 120s and 240s elapsed still fit the budget; the execution at
    // 360s fails the entry check before its handler runs.
    assert_eq!(fixture.invoker.calls().len(), 3);
}

#[tokio::test]
async fn delete_session_with_continuation_keeps_enrichment_and_identity() {
    let fixture = Fixture::new();
    let registry = HandlerRegistry::new()
        .on_delete(|_event, _remaining| async move {
            Err::<ResourceResponse, _>(HandlerError::checkpoint(json!({"phase": "draining"})))
        })
        .on_poll(|event, _remaining| async move {
            // Continuations of a Delete still see stack status enrichment.
            assert_eq!(event.stack_status.as_deref(), Some("UPDATE_IN_PROGRESS"));
            Ok(ResourceResponse::new())
        });
    let router = fixture.router(registry, RouterConfig::default());

    let outcome = router.route(delete_event(), far_future()).await;
    assert_eq!(outcome, RouterOutcome::Continued);

    let next = fixture.invoker.only_call();
    let outcome = router.route(next, far_future()).await;
    assert_eq!(outcome, RouterOutcome::Reported(ResponseStatus::Success));
    assert_eq!(
        fixture.reporter.only_call().response.physical_resource_id,
        "r-existing"
    );
}
