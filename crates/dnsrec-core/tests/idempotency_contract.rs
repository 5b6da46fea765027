//! Contract Test: Idempotency
//!
//! Repeating a call with the same arguments converges: the second call
//! performs its lookup but no write, and provider state stays the same.

mod common;

use common::*;
use dnsrec_core::UpdateOutcome;
use std::sync::Arc;

#[tokio::test]
async fn second_identical_call_is_a_noop() {
    let api = test_api();
    let (reconciler, _sink) = reconciler(&api).await;

    let first = reconciler
        .update_a_record("www.example.com", ip("10.0.0.1"), 300)
        .await
        .unwrap();
    assert!(first.changed());
    let after_first = api.records(ZONE_ID).await;
    let writes_after_first = api.calls().writes();

    let second = reconciler
        .update_a_record("www.example.com", ip("10.0.0.1"), 300)
        .await
        .unwrap();

    assert!(matches!(second, UpdateOutcome::Unchanged { .. }));
    assert_eq!(api.calls().writes(), writes_after_first);
    assert_eq!(api.calls().list, 2);
    assert_eq!(api.records(ZONE_ID).await, after_first);
}

#[tokio::test]
async fn repeated_calls_never_duplicate_records() {
    let api = test_api();
    let (reconciler, _sink) = reconciler(&api).await;

    for _ in 0..5 {
        reconciler
            .update_a_record("www.example.com", ip("10.0.0.1"), 300)
            .await
            .unwrap();
    }

    assert_eq!(api.records(ZONE_ID).await.len(), 1);
    assert_eq!(api.calls().create, 1);
    assert_eq!(api.calls().update, 0);
}

#[tokio::test]
async fn address_change_then_repeat() {
    let api = test_api();
    let (reconciler, _sink) = reconciler(&api).await;

    reconciler
        .update_a_record("www.example.com", ip("10.0.0.1"), 300)
        .await
        .unwrap();
    reconciler
        .update_a_record("www.example.com", ip("10.0.0.2"), 300)
        .await
        .unwrap();
    reconciler
        .update_a_record("www.example.com", ip("10.0.0.2"), 300)
        .await
        .unwrap();

    let calls = api.calls();
    assert_eq!((calls.create, calls.update), (1, 1));
    assert_eq!(api.records(ZONE_ID).await[0].content, "10.0.0.2");
}

#[tokio::test]
async fn shared_reconciler_handles_distinct_names_concurrently() {
    let api = test_api();
    let (reconciler, _sink) = reconciler(&api).await;
    let reconciler = Arc::new(reconciler);

    let mut handles = Vec::new();
    for i in 1..=4 {
        let reconciler = Arc::clone(&reconciler);
        handles.push(tokio::spawn(async move {
            reconciler
                .update_a_record(&format!("host{}.example.com", i), ip("10.1.1.1"), 60)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(api.records(ZONE_ID).await.len(), 4);
    assert_eq!(api.calls().create, 4);
}
