//! Presentation errors.

use std::io;

use thiserror::Error;

/// Result type alias for presentation operations.
pub type Result<T, E = PresentationError> = std::result::Result<T, E>;

/// Errors raised while handing a packet to the operator.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// There are no bytes to present.
    #[error("packet is empty; nothing to present")]
    EmptyArtifact,

    /// The packet could not be written out.
    #[error("failed to materialize packet: {0}")]
    Materialize(#[source] io::Error),

    /// Neither a new nor the current viewer could show the packet.
    #[error("failed to open packet preview: {0}")]
    Open(#[source] io::Error),

    /// The packet could not be saved under its final name.
    #[error("failed to save packet: {0}")]
    Save(#[source] io::Error),

    /// The requested file name is empty or names a path.
    #[error("invalid file name '{0}'")]
    InvalidFileName(String),
}
