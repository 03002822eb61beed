// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Failure of an engine operation, wrapping the error of the underlying store.
///
/// The engine never retries, the caller decides whether to run the operation again.
#[derive(Debug, Error)]
pub enum EngineError<E> {
    /// A lookup or list query failed. Nothing was written for the step which needed the data.
    #[error("failed reading from store: {0}")]
    Read(E),

    /// Creating, updating or deleting a record failed. Writes made before stay in place.
    #[error("failed writing to store: {0}")]
    Write(E),
}

impl<E> EngineError<E> {
    pub fn into_inner(self) -> E {
        match self {
            EngineError::Read(err) | EngineError::Write(err) => err,
        }
    }
}
