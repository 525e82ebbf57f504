//! Mock implementations of the packet collaborators for testing.
//!
//! The store and renderer mocks share their state between clones, so a test
//! can hand one clone to the code under test and inspect the other.

mod renderer;
mod store;

pub use renderer::{MOCK_PDF, MockRenderer};
pub use store::MockDocumentStore;
use submittal_core::{DocumentStoreService, RendererService};

/// Creates a mock store and renderer pair, plus the services wrapping them.
pub fn create_mock_services() -> (
    MockDocumentStore,
    MockRenderer,
    DocumentStoreService,
    RendererService,
) {
    let store = MockDocumentStore::new();
    let renderer = MockRenderer::new();
    let store_service = DocumentStoreService::new(store.clone());
    let renderer_service = RendererService::new(renderer.clone());
    (store, renderer, store_service, renderer_service)
}

#[cfg(test)]
mod tests {
    use submittal_core::{DocumentType, PacketRequest, ProductType, ProjectData};

    use super::*;

    #[tokio::test]
    async fn test_services_share_mock_state() {
        let (store, renderer, store_service, renderer_service) = create_mock_services();
        store.insert_pdf("TDS", DocumentType::TechnicalDataSheet, "underlayment", b"%PDF-1.7");

        let catalog = store_service
            .documents_by_product_type(&ProductType::new("underlayment"))
            .await
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(store.catalog_calls(), 1);

        let request = PacketRequest::new(&ProjectData::default(), Vec::new(), Vec::new());
        renderer_service.render(&request).await.unwrap();
        assert_eq!(renderer.calls(), 1);
    }
}
