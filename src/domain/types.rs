//! Value types for indexed events
//!
//! These newtypes validate at the boundary so that a `BlockEvent` can only
//! ever hold a positive block height and a non-empty address.

use derive_more::{From, Into};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Height of the block an event was emitted in
///
/// Block zero is rejected: a harness event always refers to a real block.
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        Display,
        AsRef,
        Into
    )
)]
pub struct BlockNumber(u64);

/// Address of the contract or account that emitted an event
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct Address(String);

/// Arbitrary structured payload carried by an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct EventPayload(Value);

impl EventPayload {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Whether the payload counts as "set" for event construction.
    ///
    /// `null`, `false`, `0` and `""` are empty; objects and arrays never are.
    pub fn is_present(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Reads a string discriminator such as `{"type": "Transfer"}`
    pub fn kind(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}
