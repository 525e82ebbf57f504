//! Mock packet renderer for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use submittal_core::{Error, PacketRequest, Renderer, Result, ServiceHealth};

/// Body returned when no response has been scripted.
pub const MOCK_PDF: &[u8] = b"%PDF-1.7\n%mock submittal packet\n%%EOF\n";

const MOCK_ENDPOINT: &str = "mock://renderer/generate-packet";

#[derive(Default)]
struct RendererState {
    responses: VecDeque<Result<Bytes>>,
    requests: Vec<PacketRequest>,
}

/// Renderer that replays scripted responses.
///
/// Once the script is exhausted every call succeeds with [`MOCK_PDF`].
#[derive(Clone, Default)]
pub struct MockRenderer {
    state: Arc<Mutex<RendererState>>,
    calls: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MockRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRenderer")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl MockRenderer {
    /// Creates a renderer with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RendererState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queues a successful response.
    pub fn respond_with(&self, body: impl Into<Bytes>) -> &Self {
        self.state().responses.push_back(Ok(body.into()));
        self
    }

    /// Queues a failure.
    pub fn fail_with(&self, error: Error) -> &Self {
        self.state().responses.push_back(Err(error));
        self
    }

    /// Number of render calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<PacketRequest> {
        self.state().requests.clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<PacketRequest> {
        self.state().requests.last().cloned()
    }
}

#[async_trait::async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, request: &PacketRequest) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state();
        state.requests.push(request.clone());
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(Bytes::from_static(MOCK_PDF)))
    }

    fn endpoint(&self) -> &str {
        MOCK_ENDPOINT
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use submittal_core::ProjectData;

    use super::*;

    #[tokio::test]
    async fn test_scripted_responses() {
        let renderer = MockRenderer::new();
        renderer
            .fail_with(Error::render(500, "boom"))
            .respond_with(Bytes::new());

        let request = PacketRequest::new(&ProjectData::default(), Vec::new(), Vec::new());
        assert!(matches!(
            renderer.render(&request).await,
            Err(Error::Render { status: 500, .. })
        ));
        assert!(renderer.render(&request).await.unwrap().is_empty());
        assert_eq!(renderer.render(&request).await.unwrap(), MOCK_PDF);

        assert_eq!(renderer.calls(), 3);
        assert_eq!(renderer.requests().len(), 3);
        assert_eq!(renderer.last_request(), Some(request));
    }
}
