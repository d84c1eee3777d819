//! JSON fixtures: a named event list plus the state it should index into
//!
//! ```json
//! {
//!   "name": "basic transfers",
//!   "events": [{"block": 1, "address": "0x123", "data": {"type": "Transfer"}}],
//!   "expected": {"events": [{"blockNumber": 1, "data": {"type": "Transfer"}}]}
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument};

use crate::application::environment::TestEnvironment;
use crate::domain::event::BlockEvent;
use crate::domain::state::StoreState;
use crate::error::Result;
use crate::infrastructure::store::StateStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub events: Vec<BlockEvent>,
    pub expected: Value,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Record the current outcome of `events` as the expected state
    pub fn capture(name: Option<String>, events: Vec<BlockEvent>, expected: &StoreState) -> Self {
        Self {
            name,
            events,
            expected: expected.to_value(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed fixture")
    }

    /// Reset `env`, queue the fixture's events, run once and assert
    #[instrument(skip_all, fields(fixture = self.display_name()))]
    pub async fn run<S: StateStore>(&self, env: &mut TestEnvironment<S>) -> Result<StoreState> {
        env.reset().await;
        env.mock_events(self.events.iter().cloned()).await;
        env.run_indexer().await;
        env.assert_state(&self.expected).await?;
        info!(events = self.events.len(), "Fixture passed");
        Ok(env.get_state().await)
    }
}
