//! Test environment orchestrating indexing runs
//!
//! A [`TestEnvironment`] owns a pending event queue, a processing pipeline and
//! a state store. Tests queue events, run the indexer, then inspect or assert
//! on the resulting state. `get_state` followed later by `set_state` is the
//! rollback primitive.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

use crate::config::HarnessSettings;
use crate::domain::event::BlockEvent;
use crate::domain::state::StoreState;
use crate::error::{Error, Result, StateMismatch};
use crate::infrastructure::pipeline::{ProcessingPipeline, ProcessingSummary};
use crate::infrastructure::store::{MockStore, StateStore};

/// Harness for one logical indexing run
#[derive(Debug)]
pub struct TestEnvironment<S = MockStore> {
    store: S,
    pipeline: ProcessingPipeline,
    pending: Vec<BlockEvent>,
    pretty_diagnostics: bool,
}

impl TestEnvironment<MockStore> {
    /// Empty mock store with the reference pipeline
    pub fn new() -> Self {
        Self::with_store(MockStore::new())
    }

    pub fn from_settings(settings: &HarnessSettings) -> Self {
        Self::new()
            .with_pipeline(ProcessingPipeline::recording_to(
                settings.events_collection.clone(),
            ))
            .with_pretty_diagnostics(settings.pretty_diagnostics)
    }
}

impl Default for TestEnvironment<MockStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateStore> TestEnvironment<S> {
    /// Use a caller-supplied store; it must start out empty
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            pipeline: ProcessingPipeline::default(),
            pending: Vec::new(),
            pretty_diagnostics: false,
        }
    }

    pub fn with_pipeline(mut self, pipeline: ProcessingPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_pretty_diagnostics(mut self, pretty: bool) -> Self {
        self.pretty_diagnostics = pretty;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pending_events(&self) -> &[BlockEvent] {
        &self.pending
    }

    /// Queue an event for the next run
    pub async fn mock_event(&mut self, event: BlockEvent) -> &mut Self {
        debug!(block = %event.block(), address = %event.address(), "Queued event");
        self.pending.push(event);
        self
    }

    /// Queue several events in order
    pub async fn mock_events(
        &mut self,
        events: impl IntoIterator<Item = BlockEvent>,
    ) -> &mut Self {
        for event in events {
            debug!(block = %event.block(), address = %event.address(), "Queued event");
            self.pending.push(event);
        }
        self
    }

    /// Clear the store, then replay the whole queue through the pipeline.
    ///
    /// The queue is kept, so running twice yields the same state.
    #[instrument(skip_all)]
    pub async fn run_indexer(&mut self) -> ProcessingSummary {
        self.store.clear().await;
        let summary = self.pipeline.process(&self.pending, &self.store).await;
        info!(
            pending = self.pending.len(),
            events = summary.events,
            writes = summary.writes,
            "Indexer run complete"
        );
        summary
    }

    /// Deep copy of the current store state
    pub async fn get_state(&self) -> StoreState {
        self.store.get_state().await
    }

    /// Drop the pending queue and replace store state wholesale.
    ///
    /// Entries of `state` that are not arrays are skipped.
    #[instrument(skip_all)]
    pub async fn set_state<T>(&mut self, state: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(state)?;
        self.pending.clear();
        self.store.set_state(&value).await;
        Ok(())
    }

    /// Compare the current state with `expected` by value
    pub async fn assert_state<T>(&self, expected: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let expected = serde_json::to_value(expected)?;
        let actual = self.get_state().await.to_value();

        if values_equal(&actual, &expected) {
            return Ok(());
        }

        let mismatch = StateMismatch {
            collections: differing_collections(&expected, &actual),
            expected: self.render(&expected)?,
            actual: self.render(&actual)?,
        };
        debug!(collections = ?mismatch.collections, "State assertion failed");
        Err(Error::state_mismatch(mismatch))
    }

    /// Clear both the queue and the store
    #[instrument(skip(self))]
    pub async fn reset(&mut self) {
        self.pending.clear();
        self.store.clear().await;
    }

    fn render(&self, value: &Value) -> Result<String> {
        let rendered = if self.pretty_diagnostics {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }
}

/// Value equality over JSON where `100` and `100.0` are the same number
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) if l.is_f64() || r.is_f64() => {
            matches!((l.as_f64(), r.as_f64()), (Some(l), Some(r)) if l == r)
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(key, l)| r.get(key).is_some_and(|r| values_equal(l, r)))
        }
        _ => left == right,
    }
}

/// Top-level keys whose values differ; a non-object side counts as a
/// difference in every key of the other side
fn differing_collections(expected: &Value, actual: &Value) -> Vec<String> {
    let empty = serde_json::Map::new();
    let expected = expected.as_object().unwrap_or(&empty);
    let actual = actual.as_object().unwrap_or(&empty);

    expected
        .keys()
        .chain(actual.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|name| {
            match (expected.get(name.as_str()), actual.get(name.as_str())) {
                (Some(expected), Some(actual)) => !values_equal(expected, actual),
                _ => true,
            }
        })
        .cloned()
        .collect()
}
