//! Fluent construction of [`BlockEvent`] values
//!
//! The builder never substitutes defaults. Every field has to be set to a
//! non-empty value before [`EventBuilder::build`] hands out an event.

use serde_json::Value;
use std::fmt;

use crate::domain::event::BlockEvent;
use crate::domain::types::{Address, BlockNumber, EventPayload};

/// Fields an event must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    Block,
    Address,
    Data,
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Block => "block",
            Self::Address => "address",
            Self::Data => "data",
        };
        f.write_str(name)
    }
}

/// Errors raised when building an event
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBuildError {
    #[error("Incomplete event: missing {}", join_fields(.missing))]
    Incomplete { missing: Vec<EventField> },
}

impl EventBuildError {
    pub fn missing_fields(&self) -> &[EventField] {
        match self {
            Self::Incomplete { missing } => missing,
        }
    }
}

fn join_fields(fields: &[EventField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builder for [`BlockEvent`]
///
/// ```
/// use indexer_testkit::domain::builder::EventBuilder;
/// use serde_json::json;
///
/// let event = EventBuilder::new()
///     .block(1)
///     .with_address("0x123")
///     .with_data(json!({"type": "Transfer", "amount": 100}))
///     .build()
///     .unwrap();
/// assert_eq!(event.block().into_inner(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventBuilder {
    block: Option<u64>,
    address: Option<String>,
    data: Option<Value>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block height
    pub fn block(mut self, number: u64) -> Self {
        self.block = Some(number);
        self
    }

    /// Set the emitting address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the event payload
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Validate and produce the event
    ///
    /// Fails with [`EventBuildError::Incomplete`] listing every field that is
    /// unset or empty (block zero, empty address, `null`/`false`/`0`/`""`
    /// payload).
    pub fn build(&self) -> Result<BlockEvent, EventBuildError> {
        let block = self
            .block
            .and_then(|number| BlockNumber::try_new(number).ok());
        let address = self
            .address
            .as_ref()
            .and_then(|address| Address::try_new(address.clone()).ok());
        let data = self
            .data
            .as_ref()
            .map(|data| EventPayload::from(data.clone()))
            .filter(EventPayload::is_present);

        match (block, address, data) {
            (Some(block), Some(address), Some(data)) => {
                Ok(BlockEvent::from_parts(block, address, data))
            }
            (block, address, data) => {
                let missing = [
                    (block.is_none(), EventField::Block),
                    (address.is_none(), EventField::Address),
                    (data.is_none(), EventField::Data),
                ]
                .into_iter()
                .filter_map(|(absent, field)| absent.then_some(field))
                .collect();
                Err(EventBuildError::Incomplete { missing })
            }
        }
    }
}
