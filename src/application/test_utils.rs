//! Helpers for writing harness tests

use serde_json::Value;
use std::future::Future;

use crate::domain::event::BlockEvent;
use crate::error::{Error, Result};

/// Run `test` `times` times, stopping at the first failure.
///
/// The closure receives the zero-based iteration index; a failure is reported
/// as [`Error::IterationFailed`] wrapping the original error.
pub async fn repeat_test<F, Fut>(times: usize, mut test: F) -> Result<()>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    for iteration in 0..times {
        test(iteration)
            .await
            .map_err(|source| Error::IterationFailed {
                iteration,
                source: Box::new(source),
            })?;
    }
    Ok(())
}

/// Check that the payloads of `events` equal `expected`, in order
pub fn assert_event_sequence(events: &[BlockEvent], expected: &[Value]) -> Result<()> {
    let actual: Vec<&Value> = events.iter().map(|event| event.data().as_value()).collect();

    if actual.len() == expected.len() && actual.iter().zip(expected).all(|(a, e)| *a == e) {
        return Ok(());
    }

    Err(Error::EventSequenceMismatch {
        expected: serde_json::to_string(expected)?,
        actual: serde_json::to_string(&actual)?,
    })
}
