//! Event builders for the integration tests

use indexer_testkit::{BlockEvent, EventBuilder};
use serde_json::{json, Value};

pub const TOKEN: &str = "0x123";

/// A `Transfer` event at `block` emitted by [`TOKEN`]
pub fn transfer(block: u64, amount: u64) -> BlockEvent {
    EventBuilder::new()
        .block(block)
        .with_address(TOKEN)
        .with_data(json!({"type": "Transfer", "amount": amount}))
        .build()
        .unwrap()
}

/// An `Approval` event at `block` emitted by [`TOKEN`]
pub fn approval(block: u64, spender: &str) -> BlockEvent {
    EventBuilder::new()
        .block(block)
        .with_address(TOKEN)
        .with_data(json!({"type": "Approval", "spender": spender}))
        .build()
        .unwrap()
}

/// The record the reference handler writes for a transfer
pub fn transfer_record(block: u64, amount: u64) -> Value {
    json!({"blockNumber": block, "data": {"type": "Transfer", "amount": amount}})
}
