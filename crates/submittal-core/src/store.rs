//! Document store collaborator contract.

use std::sync::Arc;

use derive_more::Deref;
use url::Url;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::health::ServiceHealth;
use crate::types::{Document, DocumentPatch, DocumentUpload, ProductType};

/// Persists document metadata and binary content.
///
/// Implement this trait to plug a storage backend into packet assembly.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a single document record.
    async fn document(&self, id: Uuid) -> StoreResult<Document>;

    /// Lists every document associated with a product type.
    async fn documents_by_product_type(
        &self,
        product_type: &ProductType,
    ) -> StoreResult<Vec<Document>>;

    /// Retrieves the binary content behind a content locator.
    async fn fetch_content(&self, url: &Url) -> StoreResult<Vec<u8>>;

    /// Stores a new document and its content.
    async fn create(&self, upload: DocumentUpload) -> StoreResult<Document>;

    /// Applies a metadata update to an existing document.
    async fn update(&self, id: Uuid, patch: DocumentPatch) -> StoreResult<Document>;

    /// Deletes a document and its binary content.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Performs a health check on the store.
    async fn health_check(&self) -> StoreResult<ServiceHealth>;
}

/// Shared handle to a [`DocumentStore`] implementation.
#[derive(Clone, Deref)]
pub struct DocumentStoreService(Arc<dyn DocumentStore>);

impl DocumentStoreService {
    /// Wraps a store implementation.
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self(Arc::new(store))
    }
}

impl std::fmt::Debug for DocumentStoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStoreService").finish_non_exhaustive()
    }
}
