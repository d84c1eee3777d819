//! proptest strategies for events

use indexer_testkit::{BlockEvent, EventBuilder};
use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Payloads that are always accepted by the builder
pub fn payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<u32>().prop_map(|amount| json!({"type": "Transfer", "amount": amount})),
        "[a-z]{1,8}".prop_map(|spender| json!({"type": "Approval", "spender": spender})),
        vec(any::<i16>(), 0..4).prop_map(|items| json!(items)),
        "[a-zA-Z0-9]{1,12}".prop_map(Value::String),
    ]
}

pub fn address() -> impl Strategy<Value = String> {
    "0x[0-9a-f]{1,40}"
}

pub fn block_event() -> impl Strategy<Value = BlockEvent> {
    (1u64..1_000_000, address(), payload()).prop_map(|(block, address, data)| {
        EventBuilder::new()
            .block(block)
            .with_address(address)
            .with_data(data)
            .build()
            .unwrap()
    })
}

pub fn event_list() -> impl Strategy<Value = Vec<BlockEvent>> {
    vec(block_event(), 0..20)
}
