//! Store state and snapshots
//!
//! A [`StoreState`] is the full set of collections held by a store at one
//! point in time. Values of this type are always owned deep copies, so a
//! captured snapshot stays valid no matter what the live store does next.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single stored record
pub type Record = Value;

/// Mapping from collection name to its ordered records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct StoreState(BTreeMap<String, Vec<Record>>);

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, name: &str) -> Option<&[Record]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Vec<Record>> {
        self.0.get_mut(name)
    }

    /// Iterate collections in name order
    pub fn collections(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.0
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn insert_collection(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.0.insert(name.into(), records);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Plain JSON object form, as exchanged with `set_state`/`assert_state`
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, records)| (name.clone(), Value::Array(records.clone())))
                .collect(),
        )
    }
}

impl FromIterator<(String, Vec<Record>)> for StoreState {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Record>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
