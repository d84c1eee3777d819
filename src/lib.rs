//! Indexer Testkit - a test harness for event-driven indexers
//!
//! Build synthetic block events, queue them in a [`TestEnvironment`], run the
//! indexer against an in-memory mock store and assert on the stored state.
//! State can be captured and restored to exercise rollback behaviour.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{Fixture, TestEnvironment};
pub use domain::{BlockEvent, EventBuildError, EventBuilder, StoreState};
pub use error::{Error, Result};
pub use infrastructure::{MockStore, ProcessingPipeline, StateStore};
