//! End-to-end indexing runs through the test environment

mod support;

use indexer_testkit::infrastructure::pipeline::{FnHandler, PayloadKindHandler, StoreWrite};
use indexer_testkit::{EventBuildError, EventBuilder, ProcessingPipeline, TestEnvironment};
use serde_json::json;
use support::event_fixtures::{approval, transfer, transfer_record};

#[tokio::test]
async fn should_process_basic_transfer_events() {
    let mut env = TestEnvironment::new();

    env.mock_event(transfer(1, 100)).await;
    env.mock_event(transfer(2, 50)).await;
    env.run_indexer().await;

    env.assert_state(&json!({
        "events": [
            {"blockNumber": 1, "data": {"type": "Transfer", "amount": 100}},
            {"blockNumber": 2, "data": {"type": "Transfer", "amount": 50}}
        ]
    }))
    .await
    .unwrap();
}

#[tokio::test]
async fn get_state_matches_the_expected_snapshot() {
    let mut env = TestEnvironment::new();
    env.mock_event(transfer(1, 100))
        .await
        .mock_event(transfer(2, 50))
        .await;
    env.run_indexer().await;

    let state = env.get_state().await;
    assert_eq!(
        serde_json::to_value(&state).unwrap(),
        json!({"events": [transfer_record(1, 100), transfer_record(2, 50)]})
    );
}

#[tokio::test]
async fn events_keep_queued_order_even_when_blocks_go_backwards() {
    let mut env = TestEnvironment::new();
    env.mock_events([transfer(3, 1), transfer(1, 2), transfer(2, 3)])
        .await;
    env.run_indexer().await;

    env.assert_state(&json!({
        "events": [transfer_record(3, 1), transfer_record(1, 2), transfer_record(2, 3)]
    }))
    .await
    .unwrap();
}

#[tokio::test]
async fn running_without_events_leaves_an_empty_store() {
    let mut env = TestEnvironment::new();
    let summary = env.run_indexer().await;

    assert_eq!(summary.events, 0);
    env.assert_state(&json!({})).await.unwrap();
}

#[tokio::test]
async fn mismatch_error_includes_expected_and_actual() {
    let mut env = TestEnvironment::new();
    env.mock_event(transfer(1, 100)).await;
    env.run_indexer().await;

    let err = env
        .assert_state(&json!({"events": [transfer_record(1, 999)]}))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains(r#""amount":999"#), "{message}");
    assert!(message.contains(r#""amount":100"#), "{message}");
}

#[test]
fn build_without_data_is_a_construction_error() {
    let result = EventBuilder::new().block(1).with_address("0x123").build();

    assert!(matches!(result, Err(EventBuildError::Incomplete { .. })));
}

#[tokio::test]
async fn kind_handlers_split_events_without_touching_the_events_collection() {
    let pipeline = ProcessingPipeline::default()
        .with_handler(PayloadKindHandler::new("Transfer", "transfers"))
        .with_handler(PayloadKindHandler::new("Approval", "approvals"));
    let mut env = TestEnvironment::new().with_pipeline(pipeline);

    env.mock_events([transfer(1, 10), approval(2, "0xbeef"), transfer(3, 20)])
        .await;
    env.run_indexer().await;

    let state = env.get_state().await;
    assert_eq!(state.collection("events").map(<[_]>::len), Some(3));
    assert_eq!(state.collection("transfers").map(<[_]>::len), Some(2));
    assert_eq!(
        state.collection("approvals"),
        Some(
            &[json!({
                "blockNumber": 2,
                "address": "0x123",
                "data": {"type": "Approval", "spender": "0xbeef"}
            })][..]
        )
    );
}

#[tokio::test]
async fn closure_handlers_can_maintain_derived_collections() {
    let pipeline = ProcessingPipeline::empty().with_handler(FnHandler::new("balances", |event| {
        match event.data().as_value().get("amount") {
            Some(amount) => vec![StoreWrite::new(
                "balances",
                json!({"block": event.block().into_inner(), "delta": amount}),
            )],
            None => Vec::new(),
        }
    }));
    let mut env = TestEnvironment::new().with_pipeline(pipeline);

    env.mock_events([transfer(1, 5), approval(2, "0x1"), transfer(3, 7)])
        .await;
    env.run_indexer().await;

    env.assert_state(&json!({
        "balances": [{"block": 1, "delta": 5}, {"block": 3, "delta": 7}]
    }))
    .await
    .unwrap();
}
