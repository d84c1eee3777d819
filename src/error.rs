use crate::domain::builder::EventBuildError;
use thiserror::Error;

/// Indexer testkit error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Event construction error: {0}")]
    Build(#[from] EventBuildError),

    #[error(transparent)]
    StateMismatch(Box<StateMismatch>),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Test failed on iteration {iteration}: {source}")]
    IterationFailed {
        iteration: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Event sequence mismatch:\n  Expected: {expected}\n  Got: {actual}")]
    EventSequenceMismatch { expected: String, actual: String },
}

impl Error {
    pub fn state_mismatch(mismatch: StateMismatch) -> Self {
        Self::StateMismatch(Box::new(mismatch))
    }

    /// The mismatch details if this is an assertion failure
    pub fn as_state_mismatch(&self) -> Option<&StateMismatch> {
        match self {
            Self::StateMismatch(mismatch) => Some(mismatch),
            _ => None,
        }
    }
}

/// Diagnostic carried by a failed state assertion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "State mismatch in [{}]:\n  Expected: {expected}\n  Got: {actual}",
    .collections.join(", ")
)]
pub struct StateMismatch {
    /// Serialized expected state
    pub expected: String,
    /// Serialized actual state
    pub actual: String,
    /// Collections whose contents differ, in name order
    pub collections: Vec<String>,
}

pub type Result<T> = std::result::Result<T, Error>;
