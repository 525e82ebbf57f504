//! Backend error types and their mapping onto [`StoreError`].

use submittal_core::StoreError;
use thiserror::Error;

/// Internal error type for store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage backend failure.
    #[error("storage error: {0}")]
    Backend(#[from] opendal::Error),
    /// Metadata record (de)serialization failure.
    #[error("record serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Backend(e) => match e.kind() {
                opendal::ErrorKind::NotFound => StoreError::not_found(e.to_string()),
                opendal::ErrorKind::PermissionDenied => {
                    StoreError::backend(format!("permission denied: {e}")).with_source(e)
                }
                _ => StoreError::backend(e.to_string()).with_source(e),
            },
            Error::Serde(e) => {
                StoreError::backend(format!("corrupt metadata record: {e}")).with_source(e)
            }
        }
    }
}
