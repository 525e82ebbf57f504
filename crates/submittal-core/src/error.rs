//! Error taxonomy for packet assembly and its collaborators.

use std::time::Duration;

use strum::IntoStaticStr;
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with the packet [`Error`] type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Type alias for Results with the [`StoreError`] type.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced while assembling and rendering a packet.
///
/// Every failure reaches the caller; nothing is retried or silently dropped.
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Error {
    /// No document was selected; raised before any I/O happens.
    #[error("no documents selected for the packet")]
    EmptySelection,

    /// The content of one selected document could not be resolved.
    #[error("failed to process document '{document}': {source}")]
    DocumentProcessing {
        /// Display name of the failing document.
        document: String,
        #[source]
        source: BoxedError,
    },

    /// The renderer host could not be reached at all.
    #[error("cannot reach the packet renderer at {endpoint}; check the renderer URL and that the service is running")]
    RendererUnreachable {
        /// The configured renderer endpoint.
        endpoint: String,
        #[source]
        source: BoxedError,
    },

    /// The exchange with the renderer broke after a connection was made,
    /// e.g. the response body was cut short.
    #[error("transport failure talking to the packet renderer at {endpoint}: {source}")]
    Transport {
        /// The configured renderer endpoint.
        endpoint: String,
        #[source]
        source: BoxedError,
    },

    /// The renderer answered with a non-success status.
    #[error("packet renderer failed with status {status}: {message}")]
    Render {
        /// HTTP status code returned by the renderer.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The renderer reported success but returned no bytes.
    #[error("packet renderer returned an empty document")]
    EmptyArtifact,

    /// A network call exceeded its deadline and was cancelled.
    #[error("{operation} timed out after {}s", after.as_secs_f32())]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,
        /// The deadline that was exceeded.
        after: Duration,
    },

    /// The document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a document processing error for the named document.
    pub fn document_processing(
        document: impl Into<String>,
        source: impl Into<BoxedError>,
    ) -> Self {
        Self::DocumentProcessing {
            document: document.into(),
            source: source.into(),
        }
    }

    /// Creates a renderer unreachable error for the given endpoint.
    pub fn renderer_unreachable(
        endpoint: impl Into<String>,
        source: impl Into<BoxedError>,
    ) -> Self {
        Self::RendererUnreachable {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// Creates a transport error for the given endpoint.
    pub fn transport(endpoint: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// Creates a render error from a status code and message.
    pub fn render(status: u16, message: impl Into<String>) -> Self {
        Self::Render {
            status,
            message: message.into(),
        }
    }

    /// Returns the error kind as a snake_case string.
    pub fn kind_str(&self) -> &'static str {
        self.into()
    }

    /// Check if this error is typically retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RendererUnreachable { .. } | Self::Transport { .. } | Self::Timeout { .. } => {
                true
            }
            Self::Render { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }
}

/// Errors reported by a document store.
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StoreError {
    /// Document or content not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected input (empty name, non-PDF content, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A content locator that does not belong to the store.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Backend-specific failure.
    #[error("storage backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },
}

impl StoreError {
    /// Creates a new not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a new invalid path error.
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Creates a new backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend {
            message: msg.into(),
            source: None,
        }
    }

    /// Sets the source of a backend error.
    pub fn with_source(self, source: impl Into<BoxedError>) -> Self {
        match self {
            Self::Backend { message, .. } => Self::Backend {
                message,
                source: Some(source.into()),
            },
            other => other,
        }
    }

    /// Returns the error kind as a snake_case string.
    pub fn kind_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_str() {
        assert_eq!(Error::EmptySelection.kind_str(), "empty_selection");
        assert_eq!(Error::EmptyArtifact.kind_str(), "empty_artifact");
        assert_eq!(Error::render(500, "boom").kind_str(), "render");
        assert_eq!(
            Error::transport("http://r/generate-packet", std::io::Error::other("eof")).kind_str(),
            "transport"
        );
        assert_eq!(StoreError::not_found("x").kind_str(), "not_found");
    }

    #[test]
    fn test_render_display_contains_message() {
        let error = Error::render(500, "boom");
        let display = error.to_string();
        assert!(display.contains("500"));
        assert!(display.contains("boom"));
    }

    #[test]
    fn test_document_processing_names_document() {
        let source = std::io::Error::other("connection reset");
        let error = Error::document_processing("Warranty.pdf", source);
        assert!(error.to_string().contains("Warranty.pdf"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_unreachable_carries_endpoint() {
        let error = Error::renderer_unreachable(
            "http://localhost:3001/generate-packet",
            std::io::Error::other("refused"),
        );
        assert!(error.to_string().contains("localhost:3001"));
    }

    #[test]
    fn test_store_error_is_transparent() {
        let error = Error::from(StoreError::not_found("document 42"));
        assert_eq!(error.to_string(), "not found: document 42");
        assert_eq!(error.kind_str(), "store");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::render(503, "").is_retryable());
        assert!(Error::render(429, "").is_retryable());
        assert!(!Error::render(400, "").is_retryable());
        assert!(!Error::EmptySelection.is_retryable());
        assert!(!Error::EmptyArtifact.is_retryable());
        assert!(
            Error::Timeout {
                operation: "render",
                after: Duration::from_secs(1)
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_backend_with_source() {
        let error = StoreError::backend("read failed").with_source(std::io::Error::other("eof"));
        assert!(std::error::Error::source(&error).is_some());

        let untouched = StoreError::not_found("a").with_source(std::io::Error::other("eof"));
        assert!(matches!(untouched, StoreError::NotFound(_)));
    }
}
