//! The event value fed to an indexing run

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::builder::{EventBuildError, EventBuilder};
use crate::domain::types::{Address, BlockNumber, EventPayload};

/// One occurrence to be indexed: something that happened at a block height,
/// tied to an address, carrying a payload.
///
/// Only [`EventBuilder`] (or deserialization, which goes through the
/// builder) can produce a `BlockEvent`, so every instance is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlockEvent")]
pub struct BlockEvent {
    block: BlockNumber,
    address: Address,
    data: EventPayload,
}

impl BlockEvent {
    pub(crate) fn from_parts(block: BlockNumber, address: Address, data: EventPayload) -> Self {
        Self {
            block,
            address,
            data,
        }
    }

    pub fn block(&self) -> BlockNumber {
        self.block
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn data(&self) -> &EventPayload {
        &self.data
    }
}

/// Unvalidated wire shape; every field is optional so that missing fields are
/// reported by the builder instead of by serde.
#[derive(Debug, Deserialize)]
struct RawBlockEvent {
    #[serde(default)]
    block: Option<u64>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

impl TryFrom<RawBlockEvent> for BlockEvent {
    type Error = EventBuildError;

    fn try_from(raw: RawBlockEvent) -> Result<Self, Self::Error> {
        let mut builder = EventBuilder::new();
        if let Some(block) = raw.block {
            builder = builder.block(block);
        }
        if let Some(address) = raw.address {
            builder = builder.with_address(address);
        }
        if let Some(data) = raw.data {
            builder = builder.with_data(data);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_plain_field_names() {
        let event = EventBuilder::new()
            .block(3)
            .with_address("0xabc")
            .with_data(json!({"type": "Mint"}))
            .build()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"block": 3, "address": "0xabc", "data": {"type": "Mint"}})
        );
    }

    #[test]
    fn deserialization_validates_like_the_builder() {
        let event: BlockEvent =
            serde_json::from_value(json!({"block": 9, "address": "0x1", "data": [1, 2]})).unwrap();
        assert_eq!(event.block().into_inner(), 9);
        assert_eq!(event.address().as_ref(), "0x1");
        assert_eq!(event.data().as_value(), &json!([1, 2]));

        let missing_data =
            serde_json::from_value::<BlockEvent>(json!({"block": 9, "address": "0x1"}));
        let message = missing_data.unwrap_err().to_string();
        assert!(message.contains("data"), "unexpected error: {message}");

        assert!(serde_json::from_value::<BlockEvent>(
            json!({"block": 0, "address": "0x1", "data": {}})
        )
        .is_err());
    }
}
