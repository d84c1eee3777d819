//! Infrastructure for the indexing harness
//!
//! The mock state store and the pipeline that writes events into it.

pub mod pipeline;
pub mod store;

pub use pipeline::{ProcessingPipeline, ProcessingSummary};
pub use store::{MockStore, StateStore};
