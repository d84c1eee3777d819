//! Domain types for the indexing harness
//!
//! Events, their builder, and the store state exchanged by snapshot and
//! restore.

pub mod builder;
pub mod event;
pub mod state;
pub mod types;

pub use builder::{EventBuildError, EventBuilder, EventField};
pub use event::BlockEvent;
pub use state::{Record, StoreState};
pub use types::{Address, BlockNumber, EventPayload};
