//! Mock document store for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use jiff::Timestamp;
use submittal_core::{
    Document, DocumentPatch, DocumentStore, DocumentType, DocumentUpload, ProductType,
    ServiceHealth, StoreError, StoreResult,
};
use url::Url;
use uuid::Uuid;

const CONTENT_BASE: &str = "https://mock.store/content/";

#[derive(Default)]
struct StoreState {
    documents: Vec<Document>,
    content: HashMap<Url, Vec<u8>>,
    failing_content: HashSet<Url>,
    failing_catalog: bool,
    content_delay: Option<Duration>,
}

#[derive(Default)]
struct Counters {
    document: AtomicUsize,
    catalog: AtomicUsize,
    content: AtomicUsize,
}

/// In-memory document store.
///
/// Records keep insertion order. Content retrieval can be made to fail per
/// document, or to stall for a fixed delay.
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    state: Arc<Mutex<StoreState>>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for MockDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDocumentStore")
            .field("documents", &self.state().documents.len())
            .finish_non_exhaustive()
    }
}

impl MockDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        // A panicking test thread must not hide the state from the others.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores a document with content, without touching the call counters.
    pub fn insert(&self, upload: DocumentUpload) -> Document {
        let id = Uuid::now_v7();
        let url = content_url(id, &upload.file_name);
        let now = Timestamp::now();

        let document = Document {
            id,
            name: upload.name,
            description: upload.description,
            file_name: upload.file_name,
            url: url.clone(),
            size: upload.content.len() as u64,
            document_type: upload.document_type,
            required: upload.required,
            product_type: upload.product_type,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state();
        if let Some(url) = url {
            state.content.insert(url, upload.content);
        }
        state.documents.push(document.clone());
        document
    }

    /// Stores a PDF document under a product type.
    pub fn insert_pdf(
        &self,
        name: &str,
        document_type: DocumentType,
        product_type: &str,
        content: impl Into<Vec<u8>>,
    ) -> Document {
        self.insert(DocumentUpload::new(
            name,
            format!("{name}.pdf"),
            document_type,
            product_type,
            content.into(),
        ))
    }

    /// Stores a record that has no content locator.
    pub fn insert_without_content(
        &self,
        name: &str,
        document_type: DocumentType,
        product_type: &str,
    ) -> Document {
        let document = self.insert_pdf(name, document_type, product_type, Vec::new());
        let mut state = self.state();
        if let Some(url) = &document.url {
            state.content.remove(url);
        }

        let stored = state
            .documents
            .iter_mut()
            .find(|d| d.id == document.id)
            .map(|d| {
                d.url = None;
                d.clone()
            });
        stored.unwrap_or(document)
    }

    /// Makes content retrieval fail for the given document.
    pub fn fail_content(&self, id: Uuid) {
        let mut state = self.state();
        let url = state
            .documents
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.url.clone());
        if let Some(url) = url {
            state.failing_content.insert(url);
        }
    }

    /// Makes product type listings fail.
    pub fn fail_catalog(&self) {
        self.state().failing_catalog = true;
    }

    /// Delays every content retrieval.
    pub fn delay_content(&self, delay: Duration) {
        self.state().content_delay = Some(delay);
    }

    /// Number of single-record lookups.
    pub fn document_calls(&self) -> usize {
        self.counters.document.load(Ordering::SeqCst)
    }

    /// Number of product type listings.
    pub fn catalog_calls(&self) -> usize {
        self.counters.catalog.load(Ordering::SeqCst)
    }

    /// Number of content retrievals.
    pub fn content_calls(&self) -> usize {
        self.counters.content.load(Ordering::SeqCst)
    }

    /// Number of read calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.document_calls() + self.catalog_calls() + self.content_calls()
    }
}

fn content_url(id: Uuid, file_name: &str) -> Option<Url> {
    Url::parse(CONTENT_BASE)
        .and_then(|base| base.join(&format!("{id}/{file_name}")))
        .ok()
}

#[async_trait::async_trait]
impl DocumentStore for MockDocumentStore {
    async fn document(&self, id: Uuid) -> StoreResult<Document> {
        self.counters.document.fetch_add(1, Ordering::SeqCst);
        self.state()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("document {id}")))
    }

    async fn documents_by_product_type(
        &self,
        product_type: &ProductType,
    ) -> StoreResult<Vec<Document>> {
        self.counters.catalog.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if state.failing_catalog {
            return Err(StoreError::backend("catalog unavailable"));
        }

        Ok(state
            .documents
            .iter()
            .filter(|d| &d.product_type == product_type)
            .cloned()
            .collect())
    }

    async fn fetch_content(&self, url: &Url) -> StoreResult<Vec<u8>> {
        self.counters.content.fetch_add(1, Ordering::SeqCst);

        let delay = self.state().content_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if state.failing_content.contains(url) {
            return Err(StoreError::backend(format!("failed to download {url}")));
        }

        state
            .content
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::not_found(url.to_string()))
    }

    async fn create(&self, upload: DocumentUpload) -> StoreResult<Document> {
        if upload.name.trim().is_empty() {
            return Err(StoreError::invalid_input("document name is empty"));
        }
        Ok(self.insert(upload))
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> StoreResult<Document> {
        let mut state = self.state();
        let document = state
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found(format!("document {id}")))?;

        patch.apply(document);
        Ok(document.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state();
        let position = state
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found(format!("document {id}")))?;

        let document = state.documents.remove(position);
        if let Some(url) = document.url {
            state.content.remove(&url);
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
