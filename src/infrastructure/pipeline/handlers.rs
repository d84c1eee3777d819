//! Event handlers used by the processing pipeline
//!
//! A handler turns one event into zero or more [`StoreWrite`]s. Handlers are
//! pure; the pipeline is the only thing that touches the store.

use serde_json::json;
use std::fmt;

use crate::domain::event::BlockEvent;
use crate::domain::state::Record;

/// Collection written to by the reference handler
pub const DEFAULT_EVENTS_COLLECTION: &str = "events";

/// Payload field inspected by [`PayloadKindHandler`] unless overridden
pub const DEFAULT_KIND_FIELD: &str = "type";

/// A record to append to a named collection
#[derive(Debug, Clone, PartialEq)]
pub struct StoreWrite {
    pub collection: String,
    pub record: Record,
}

impl StoreWrite {
    pub fn new(collection: impl Into<String>, record: Record) -> Self {
        Self {
            collection: collection.into(),
            record,
        }
    }
}

/// Translates an event into store writes
pub trait EventHandler: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Writes produced for `event`; empty when the handler does not apply
    fn handle(&self, event: &BlockEvent) -> Vec<StoreWrite>;
}

/// Records every event as `{"blockNumber", "data"}`
#[derive(Debug, Clone)]
pub struct RecordEventHandler {
    collection: String,
}

impl RecordEventHandler {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl Default for RecordEventHandler {
    fn default() -> Self {
        Self::new(DEFAULT_EVENTS_COLLECTION)
    }
}

impl EventHandler for RecordEventHandler {
    fn name(&self) -> &str {
        "record-event"
    }

    fn handle(&self, event: &BlockEvent) -> Vec<StoreWrite> {
        vec![StoreWrite::new(
            self.collection.clone(),
            json!({
                "blockNumber": event.block().into_inner(),
                "data": event.data().as_value(),
            }),
        )]
    }
}

/// Routes events of one payload kind into their own collection
///
/// An event matches when `data[field] == kind`. Matching events are written
/// as `{"blockNumber", "address", "data"}`.
#[derive(Debug, Clone)]
pub struct PayloadKindHandler {
    name: String,
    field: String,
    kind: String,
    collection: String,
}

impl PayloadKindHandler {
    pub fn new(kind: impl Into<String>, collection: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            name: format!("payload-kind:{kind}"),
            field: DEFAULT_KIND_FIELD.to_string(),
            kind,
            collection: collection.into(),
        }
    }

    /// Match on a different payload field
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl EventHandler for PayloadKindHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event: &BlockEvent) -> Vec<StoreWrite> {
        if event.data().kind(&self.field) != Some(self.kind.as_str()) {
            return Vec::new();
        }

        vec![StoreWrite::new(
            self.collection.clone(),
            json!({
                "blockNumber": event.block().into_inner(),
                "address": event.address().to_string(),
                "data": event.data().as_value(),
            }),
        )]
    }
}

/// Type alias for a handler closure
pub type HandlerFn = Box<dyn Fn(&BlockEvent) -> Vec<StoreWrite> + Send + Sync>;

/// A named closure acting as a handler
pub struct FnHandler {
    name: String,
    handler: HandlerFn,
}

impl FnHandler {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&BlockEvent) -> Vec<StoreWrite> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(handler),
        }
    }
}

impl fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl EventHandler for FnHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event: &BlockEvent) -> Vec<StoreWrite> {
        (self.handler)(event)
    }
}
