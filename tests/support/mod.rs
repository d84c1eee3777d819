//! Shared fixtures for the integration tests
//!
//! Each test binary pulls in only what it needs.
#![allow(dead_code)]

pub mod event_fixtures;
pub mod generators;
