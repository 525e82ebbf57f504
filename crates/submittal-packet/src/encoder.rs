//! Text encoding of stored document content.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use submittal_core::{Document, DocumentStoreService, Result};
use uuid::Uuid;

use crate::TRACING_TARGET;

/// Turns stored document content into standard base64 text.
#[derive(Debug, Clone)]
pub struct DocumentEncoder {
    store: DocumentStoreService,
}

impl DocumentEncoder {
    /// Creates an encoder reading from the given store.
    pub fn new(store: DocumentStoreService) -> Self {
        Self { store }
    }

    /// Looks up the document and encodes its content.
    ///
    /// Returns `Ok(None)` when the record exists but has no content locator.
    /// A missing record or a failed retrieval is an error.
    pub async fn encode_as_text(&self, id: Uuid) -> Result<Option<String>> {
        let document = self.store.document(id).await?;
        self.encode_document(&document).await
    }

    /// Encodes the content behind an already resolved record.
    pub async fn encode_document(&self, document: &Document) -> Result<Option<String>> {
        let Some(url) = &document.url else {
            tracing::debug!(
                target: TRACING_TARGET,
                document_id = %document.id,
                "Document has no content locator"
            );
            return Ok(None);
        };

        let content = self.store.fetch_content(url).await?;
        let encoded = STANDARD.encode(&content);

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document.id,
            size = content.len(),
            encoded_size = encoded.len(),
            "Encoded document content"
        );

        Ok(Some(encoded))
    }
}
