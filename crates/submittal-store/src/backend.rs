//! OpenDAL-backed [`DocumentStore`] implementation.

use std::time::Instant;

use jiff::Timestamp;
use opendal::{Operator, services};
use submittal_core::{
    Document, DocumentPatch, DocumentStore, DocumentStoreService, DocumentUpload, ProductType,
    ServiceHealth, StoreError, StoreResult,
};
use url::Url;
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::config::{BackendType, StoreConfig};
use crate::error::Error;

/// Leading bytes every accepted upload must carry.
const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Directory holding one JSON record per document.
const RECORDS_DIR: &str = "documents/";

/// Directory holding binary content.
const CONTENT_DIR: &str = "content/";

/// Document store that keeps metadata records and content in one operator.
#[derive(Clone)]
pub struct ObjectDocumentStore {
    operator: Operator,
    public_base: Url,
    config: StoreConfig,
}

impl ObjectDocumentStore {
    /// Creates a store from configuration.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let operator = Self::create_operator(&config)?;
        let public_base = config.public_base_url()?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.store_backend,
            root = %config.store_root,
            public_base = %public_base,
            "Document store initialized"
        );

        Ok(Self {
            operator,
            public_base,
            config,
        })
    }

    /// Creates an in-memory store, mostly useful for tests.
    pub fn memory() -> StoreResult<Self> {
        Self::new(StoreConfig::memory())
    }

    /// Returns the configuration for this store.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Converts this store into a [`DocumentStoreService`].
    pub fn into_service(self) -> DocumentStoreService {
        DocumentStoreService::new(self)
    }

    fn create_operator(config: &StoreConfig) -> StoreResult<Operator> {
        let operator = match config.store_backend {
            BackendType::Memory => Operator::new(services::Memory::default()).map(|op| op.finish()),
            BackendType::Fs => {
                let root = std::path::absolute(&config.store_root).map_err(|e| {
                    StoreError::invalid_input(format!(
                        "invalid store root '{}': {e}",
                        config.store_root
                    ))
                })?;
                let root = root.to_string_lossy();
                Operator::new(services::Fs::default().root(&root)).map(|op| op.finish())
            }
        };

        operator.map_err(|e| {
            StoreError::backend(format!("storage initialization failed: {e}")).with_source(e)
        })
    }

    fn record_path(id: Uuid) -> String {
        format!("{RECORDS_DIR}{id}.json")
    }

    fn content_path(product_type: &ProductType, id: Uuid, file_name: &str) -> String {
        format!(
            "{CONTENT_DIR}{}/{id}/{}",
            sanitize_segment(product_type.as_str()),
            sanitize_segment(file_name)
        )
    }

    /// Maps a content locator back to its storage path.
    fn locate(&self, url: &Url) -> StoreResult<String> {
        url.as_str()
            .strip_prefix(self.public_base.as_str())
            .filter(|path| path.starts_with(CONTENT_DIR) && !path.split('/').any(|s| s == ".."))
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                StoreError::invalid_path(format!("{url} is not served by this store"))
            })
    }

    async fn read_record(&self, id: Uuid) -> StoreResult<Document> {
        let buffer = self
            .operator
            .read(&Self::record_path(id))
            .await
            .map_err(Error::from)
            .map_err(|e| match StoreError::from(e) {
                StoreError::NotFound(_) => StoreError::not_found(format!("document {id}")),
                other => other,
            })?;

        let document = serde_json::from_slice(&buffer.to_vec()).map_err(Error::from)?;
        Ok(document)
    }

    async fn write_record(&self, document: &Document) -> StoreResult<()> {
        let record = serde_json::to_vec(document).map_err(Error::from)?;
        self.operator
            .write(&Self::record_path(document.id), record)
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn remove_content(&self, document: &Document) {
        let Some(path) = document.url.as_ref().and_then(|url| self.locate(url).ok()) else {
            return;
        };

        if let Err(err) = self.operator.delete(&path).await {
            tracing::warn!(
                target: TRACING_TARGET,
                document_id = %document.id,
                path = %path,
                error = %err,
                "Failed to remove document content"
            );
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for ObjectDocumentStore {
    async fn document(&self, id: Uuid) -> StoreResult<Document> {
        tracing::debug!(target: TRACING_TARGET, document_id = %id, "Reading document record");
        self.read_record(id).await
    }

    async fn documents_by_product_type(
        &self,
        product_type: &ProductType,
    ) -> StoreResult<Vec<Document>> {
        let entries = self.operator.list(RECORDS_DIR).await.map_err(Error::from);
        let entries = match entries {
            Ok(entries) => entries,
            // An untouched store has no records directory yet.
            Err(Error::Backend(e)) if e.kind() == opendal::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        for entry in entries {
            if !entry.path().ends_with(".json") {
                continue;
            }

            let buffer = self.operator.read(entry.path()).await.map_err(Error::from)?;
            let document: Document =
                serde_json::from_slice(&buffer.to_vec()).map_err(Error::from)?;
            if &document.product_type == product_type {
                documents.push(document);
            }
        }

        documents.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        tracing::debug!(
            target: TRACING_TARGET,
            product_type = %product_type,
            count = documents.len(),
            "Listed documents by product type"
        );

        Ok(documents)
    }

    async fn fetch_content(&self, url: &Url) -> StoreResult<Vec<u8>> {
        let path = self.locate(url)?;
        let data = self
            .operator
            .read(&path)
            .await
            .map_err(Error::from)?
            .to_vec();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = data.len(),
            "Content read complete"
        );

        Ok(data)
    }

    async fn create(&self, upload: DocumentUpload) -> StoreResult<Document> {
        if upload.name.trim().is_empty() {
            return Err(StoreError::invalid_input("document name must not be empty"));
        }
        if upload.content.is_empty() {
            return Err(StoreError::invalid_input("document content must not be empty"));
        }
        if !upload.content.starts_with(PDF_SIGNATURE) {
            return Err(StoreError::invalid_input(format!(
                "'{}' is not a PDF document",
                upload.file_name
            )));
        }

        let id = Uuid::now_v7();
        let path = Self::content_path(&upload.product_type, id, &upload.file_name);
        let url = self.public_base.join(&path).map_err(|e| {
            StoreError::invalid_path(format!("cannot build content URL for '{path}': {e}"))
        })?;
        let size = upload.content.len() as u64;

        self.operator
            .write(&path, upload.content)
            .await
            .map_err(Error::from)?;

        let now = Timestamp::now();
        let document = Document {
            id,
            name: upload.name,
            description: upload.description,
            file_name: upload.file_name,
            url: Some(url),
            size,
            document_type: upload.document_type,
            required: upload.required,
            product_type: upload.product_type,
            created_at: now,
            updated_at: now,
        };

        if let Err(err) = self.write_record(&document).await {
            self.remove_content(&document).await;
            return Err(err);
        }

        tracing::info!(
            target: TRACING_TARGET,
            document_id = %document.id,
            name = %document.name,
            size,
            "Document stored"
        );

        Ok(document)
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> StoreResult<Document> {
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(StoreError::invalid_input("document name must not be empty"));
        }

        let mut document = self.read_record(id).await?;
        patch.apply(&mut document);
        self.write_record(&document).await?;

        tracing::debug!(target: TRACING_TARGET, document_id = %id, "Document metadata updated");

        Ok(document)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let document = self.read_record(id).await?;

        self.operator
            .delete(&Self::record_path(id))
            .await
            .map_err(Error::from)?;
        self.remove_content(&document).await;

        tracing::info!(target: TRACING_TARGET, document_id = %id, "Document deleted");

        Ok(())
    }

    async fn health_check(&self) -> StoreResult<ServiceHealth> {
        let started = Instant::now();
        let health = match self.operator.exists(RECORDS_DIR).await {
            Ok(_) => ServiceHealth::healthy(),
            Err(err) => ServiceHealth::unhealthy(err.to_string()),
        };

        Ok(health.with_response_time(started.elapsed()))
    }
}

impl std::fmt::Debug for ObjectDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDocumentStore")
            .field("backend", &self.config.store_backend)
            .field("root", &self.config.store_root)
            .field("public_base", &self.public_base.as_str())
            .finish()
    }
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`, so storage
/// paths survive a round trip through a URL unchanged.
fn sanitize_segment(segment: &str) -> String {
    let sanitized: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match sanitized.trim_start_matches('.') {
        "" => "_".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use submittal_core::DocumentType;

    use super::*;
    use crate::config::DEFAULT_PUBLIC_BASE_URL as DEFAULT_BASE;

    fn pdf(body: &str) -> Vec<u8> {
        format!("%PDF-1.7\n{body}").into_bytes()
    }

    fn upload(name: &str, product_type: &str) -> DocumentUpload {
        DocumentUpload::new(
            name,
            format!("{name}.pdf"),
            DocumentType::TechnicalDataSheet,
            product_type,
            pdf(name),
        )
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("Data Sheet (v2).pdf"), "Data_Sheet__v2_.pdf");
        assert_eq!(sanitize_segment("../etc"), "_etc");
        assert_eq!(sanitize_segment(".hidden"), "hidden");
        assert_eq!(sanitize_segment(".."), "_");
        assert_eq!(sanitize_segment("structural-floor"), "structural-floor");
    }

    #[tokio::test]
    async fn test_create_and_fetch_content() {
        let store = ObjectDocumentStore::memory().unwrap();
        let document = store.create(upload("TDS Sheet", "structural-floor")).await.unwrap();

        let url = document.url.clone().unwrap();
        assert!(url.as_str().starts_with(DEFAULT_BASE));
        assert!(url.as_str().ends_with("/TDS_Sheet.pdf"));
        assert_eq!(document.size, pdf("TDS Sheet").len() as u64);

        let content = store.fetch_content(&url).await.unwrap();
        assert_eq!(content, pdf("TDS Sheet"));

        let stored = store.document(document.id).await.unwrap();
        assert_eq!(stored, document);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_uploads() {
        let store = ObjectDocumentStore::memory().unwrap();

        let mut empty_name = upload("x", "floor");
        empty_name.name = "  ".to_owned();
        assert!(matches!(
            store.create(empty_name).await,
            Err(StoreError::InvalidInput(_))
        ));

        let mut empty = upload("x", "floor");
        empty.content.clear();
        assert!(matches!(store.create(empty).await, Err(StoreError::InvalidInput(_))));

        let mut not_pdf = upload("x", "floor");
        not_pdf.content = b"PK\x03\x04 zip archive".to_vec();
        assert!(matches!(store.create(not_pdf).await, Err(StoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_documents_by_product_type() {
        let store = ObjectDocumentStore::memory().unwrap();
        assert!(
            store
                .documents_by_product_type(&ProductType::new("floor"))
                .await
                .unwrap()
                .is_empty()
        );

        store.create(upload("Warranty", "floor")).await.unwrap();
        store.create(upload("Acoustic", "floor")).await.unwrap();
        store.create(upload("Other", "underlayment")).await.unwrap();

        let documents = store
            .documents_by_product_type(&ProductType::new("floor"))
            .await
            .unwrap();
        let names: Vec<_> = documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Acoustic", "Warranty"]);
    }

    #[tokio::test]
    async fn test_update_metadata() {
        let store = ObjectDocumentStore::memory().unwrap();
        let document = store.create(upload("Guide", "floor")).await.unwrap();

        let patch = DocumentPatch {
            name: Some("Install Guide".to_owned()),
            document_type: Some(DocumentType::InstallationGuide),
            ..Default::default()
        };
        let updated = store.update(document.id, patch).await.unwrap();

        assert_eq!(updated.name, "Install Guide");
        assert_eq!(updated.document_type, DocumentType::InstallationGuide);
        assert_eq!(updated.url, document.url);
        assert_eq!(store.document(document.id).await.unwrap(), updated);

        let blank = DocumentPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(document.id, blank).await,
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_content() {
        let store = ObjectDocumentStore::memory().unwrap();
        let document = store.create(upload("Report", "floor")).await.unwrap();
        let url = document.url.clone().unwrap();

        store.delete(document.id).await.unwrap();

        assert!(matches!(
            store.document(document.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.fetch_content(&url).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(document.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_content_rejects_foreign_urls() {
        let store = ObjectDocumentStore::memory().unwrap();

        let foreign = Url::parse("https://elsewhere.example.com/content/a.pdf").unwrap();
        assert!(matches!(
            store.fetch_content(&foreign).await,
            Err(StoreError::InvalidPath(_))
        ));

        let record = Url::parse(DEFAULT_BASE)
            .unwrap()
            .join("documents/x.json")
            .unwrap();
        assert!(matches!(
            store.fetch_content(&record).await,
            Err(StoreError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_fs_backend_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::fs(dir.path().to_string_lossy());

        let document = ObjectDocumentStore::new(config.clone())
            .unwrap()
            .create(upload("Spec", "floor"))
            .await
            .unwrap();

        let reopened = ObjectDocumentStore::new(config).unwrap();
        assert_eq!(reopened.document(document.id).await.unwrap(), document);
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = ObjectDocumentStore::memory().unwrap();
        assert!(store.health_check().await.unwrap().is_healthy());
    }
}
