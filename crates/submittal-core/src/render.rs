//! Remote renderer collaborator contract.

use std::sync::Arc;

use bytes::Bytes;
use derive_more::Deref;

use crate::error::Result;
use crate::health::ServiceHealth;
use crate::types::PacketRequest;

/// Turns a composed [`PacketRequest`] into PDF bytes.
///
/// Implementations must map connection failures to
/// [`Error::RendererUnreachable`](crate::Error::RendererUnreachable), other
/// broken exchanges to [`Error::Transport`](crate::Error::Transport),
/// non-success replies to [`Error::Render`](crate::Error::Render) and empty
/// success bodies to [`Error::EmptyArtifact`](crate::Error::EmptyArtifact).
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Renders the packet and returns the PDF body.
    async fn render(&self, request: &PacketRequest) -> Result<Bytes>;

    /// The endpoint packets are submitted to.
    fn endpoint(&self) -> &str;

    /// Performs a health check on the renderer.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

/// Shared handle to a [`Renderer`] implementation.
#[derive(Clone, Deref)]
pub struct RendererService(Arc<dyn Renderer>);

impl RendererService {
    /// Wraps a renderer implementation.
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self(Arc::new(renderer))
    }
}

impl std::fmt::Debug for RendererService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererService")
            .field("endpoint", &self.0.endpoint())
            .finish()
    }
}
