//! Harness orchestration
//!
//! The test environment and the helpers built on top of it.

pub mod environment;
pub mod fixture;
pub mod test_utils;

pub use environment::TestEnvironment;
pub use fixture::Fixture;
pub use test_utils::{assert_event_sequence, repeat_test};
