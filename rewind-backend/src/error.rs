//! Error types for backend operations.

use rewind_core::BoxError;
use thiserror::Error;

/// Error type for backend operations.
///
/// A lookup that simply finds nothing is not an error; these variants only
/// cover failures that must abort the round trip.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request body could not be read while matching.
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] BoxError),

    /// Internal backend error, state or storage failure.
    #[error(transparent)]
    Internal(BoxError),
}

/// Error produced while exporting or importing a store snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot is not valid JSON or does not have the entry shape.
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
