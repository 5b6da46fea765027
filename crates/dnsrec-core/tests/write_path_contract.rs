//! Contract Test: Create / Update / No-op
//!
//! Verifies the three branches taken after the lookup:
//! - No matching record → exactly one create
//! - A record with other content → exactly one update of that record ID
//! - A record with the same content → no writes at all

mod common;

use common::*;
use dnsrec_core::{RecordType, UpdateOutcome};

#[tokio::test]
async fn missing_record_is_created() {
    let api = test_api();
    let (reconciler, sink) = reconciler(&api).await;

    let outcome = reconciler
        .update_a_record("sub.example.com", ip("1.2.3.4"), 300)
        .await
        .expect("create succeeds");

    let calls = api.calls();
    assert_eq!(calls.list, 1);
    assert_eq!(calls.create, 1);
    assert_eq!(calls.update, 0);

    let records = api.records(ZONE_ID).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, RecordType::A);
    assert_eq!(records[0].name, "sub.example.com");
    assert_eq!(records[0].content, "1.2.3.4");
    assert_eq!(records[0].ttl, 300);

    assert_eq!(
        outcome,
        UpdateOutcome::Created {
            record_name: "sub.example.com".to_string(),
            record_id: records[0].id.clone(),
            ip: ip("1.2.3.4"),
            ttl: 300,
        }
    );
    assert_eq!(
        sink.at(Level::Info),
        vec!["Created new A record: sub.example.com -> 1.2.3.4".to_string()]
    );
}

#[tokio::test]
async fn stale_record_is_updated_in_place() {
    let api = test_api();
    api.insert_record(ZONE_ID, a_record("rec-existing", "sub.example.com", "9.9.9.9", 60))
        .await;
    let (reconciler, sink) = reconciler(&api).await;

    let outcome = reconciler
        .update_a_record("sub.example.com", ip("1.2.3.4"), 300)
        .await
        .expect("update succeeds");

    let calls = api.calls();
    assert_eq!(calls.create, 0);
    assert_eq!(calls.update, 1);

    let records = api.records(ZONE_ID).await;
    assert_eq!(
        records,
        vec![a_record("rec-existing", "sub.example.com", "1.2.3.4", 300)]
    );

    match outcome {
        UpdateOutcome::Updated {
            record_id,
            previous_content,
            ttl,
            ..
        } => {
            assert_eq!(record_id, "rec-existing");
            assert_eq!(previous_content, "9.9.9.9");
            assert_eq!(ttl, 300);
        }
        other => panic!("expected Updated, got {:?}", other),
    }

    let info = sink.at(Level::Info);
    assert_eq!(info.len(), 1);
    assert!(info[0].starts_with("Updated A record: sub.example.com -> 1.2.3.4"));
}

#[tokio::test]
async fn current_record_is_left_alone() {
    let api = test_api();
    api.insert_record(ZONE_ID, a_record("rec-1", "sub.example.com", "1.2.3.4", 3600))
        .await;
    let (reconciler, sink) = reconciler(&api).await;

    let outcome = reconciler
        .update_a_record("sub.example.com", ip("1.2.3.4"), 300)
        .await
        .expect("no-op succeeds");

    assert_eq!(api.calls().writes(), 0);
    assert!(!outcome.changed());
    assert!(matches!(outcome, UpdateOutcome::Unchanged { .. }));

    // Content match wins even though the TTL differs
    assert_eq!(api.records(ZONE_ID).await[0].ttl, 3600);
    assert_eq!(
        sink.at(Level::Debug).last().map(String::as_str),
        Some("A record sub.example.com already up-to-date")
    );
    assert!(sink.at(Level::Info).is_empty());
}

#[tokio::test]
async fn only_first_match_is_inspected() {
    let api = test_api();
    api.insert_record(ZONE_ID, a_record("first", "sub.example.com", "9.9.9.9", 60))
        .await;
    api.insert_record(ZONE_ID, a_record("second", "sub.example.com", "1.2.3.4", 60))
        .await;
    let (reconciler, _sink) = reconciler(&api).await;

    let outcome = reconciler
        .update_a_record("sub.example.com", ip("1.2.3.4"), 60)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        UpdateOutcome::Updated { ref record_id, .. } if record_id == "first"
    ));
    assert_eq!(api.calls().update, 1);
}

#[tokio::test]
async fn ttl_below_one_defaults_to_sixty() {
    for requested in [0, -5] {
        let api = test_api();
        let (reconciler, _sink) = reconciler(&api).await;

        reconciler
            .update_a_record("sub.example.com", ip("1.2.3.4"), requested)
            .await
            .unwrap();

        assert_eq!(api.records(ZONE_ID).await[0].ttl, 60, "ttl {}", requested);
    }

    let api = test_api();
    let (reconciler, _sink) = reconciler(&api).await;
    reconciler
        .update_a_record("sub.example.com", ip("1.2.3.4"), 120)
        .await
        .unwrap();
    assert_eq!(api.records(ZONE_ID).await[0].ttl, 120);
}

#[tokio::test]
async fn update_writes_defaulted_ttl() {
    let api = test_api();
    api.insert_record(ZONE_ID, a_record("rec-1", "sub.example.com", "9.9.9.9", 300))
        .await;
    let (reconciler, _sink) = reconciler(&api).await;

    reconciler
        .update_a_record("sub.example.com", ip("1.2.3.4"), 0)
        .await
        .unwrap();

    assert_eq!(api.records(ZONE_ID).await[0].ttl, 60);
}
