//! Event-to-state processing
//!
//! The pipeline walks the queued events in order and applies every
//! registered handler to each one, appending the resulting writes to the
//! store. With no extra handlers it reproduces the reference indexer: one
//! `{"blockNumber", "data"}` record per event in the `events` collection.

pub mod handlers;

use tracing::{debug, instrument};

use crate::domain::event::BlockEvent;
use crate::infrastructure::store::StateStore;

pub use handlers::{
    EventHandler, FnHandler, HandlerFn, PayloadKindHandler, RecordEventHandler, StoreWrite,
    DEFAULT_EVENTS_COLLECTION, DEFAULT_KIND_FIELD,
};

/// Counts reported after a pipeline pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    pub events: usize,
    pub writes: usize,
}

/// Ordered list of event handlers
pub struct ProcessingPipeline {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl ProcessingPipeline {
    /// A pipeline with no handlers at all
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// The reference pipeline writing to a custom events collection
    pub fn recording_to(collection: impl Into<String>) -> Self {
        Self::empty().with_handler(RecordEventHandler::new(collection))
    }

    /// Register another handler after the existing ones
    pub fn with_handler(mut self, handler: impl EventHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Writes produced for a single event, in handler registration order
    pub fn writes_for(&self, event: &BlockEvent) -> Vec<StoreWrite> {
        self.handlers
            .iter()
            .flat_map(|handler| {
                let writes = handler.handle(event);
                debug!(
                    handler = handler.name(),
                    block = %event.block(),
                    writes = writes.len(),
                    "Handled event"
                );
                writes
            })
            .collect()
    }

    /// Apply `events` to `store` strictly in order
    #[instrument(skip_all, fields(events = events.len(), handlers = self.handlers.len()))]
    pub async fn process<S>(&self, events: &[BlockEvent], store: &S) -> ProcessingSummary
    where
        S: StateStore + ?Sized,
    {
        let mut summary = ProcessingSummary::default();

        for event in events {
            for write in self.writes_for(event) {
                store.save(&write.collection, write.record).await;
                summary.writes += 1;
            }
            summary.events += 1;
        }

        summary
    }
}

impl Default for ProcessingPipeline {
    fn default() -> Self {
        Self::recording_to(DEFAULT_EVENTS_COLLECTION)
    }
}

impl std::fmt::Debug for ProcessingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingPipeline")
            .field("handlers", &self.handler_names())
            .finish()
    }
}
