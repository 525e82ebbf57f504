//! Client construction errors.

use thiserror::Error;

/// Result type alias for renderer client setup.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or building the renderer client.
#[derive(Debug, Error)]
pub enum Error {
    /// The renderer URL is unusable.
    #[error("invalid renderer URL {0}")]
    InvalidUrl(String),
    /// An endpoint could not be derived from the base URL.
    #[error("invalid renderer endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
