//! Packet assembly orchestration.

use std::time::{Duration, Instant};

use futures::future::try_join_all;
use submittal_core::{
    Document, DocumentStoreService, Error, PacketArtifact, PacketDocument, PacketRequest,
    ProjectData, RendererService, Result, SelectedDocument,
};

use crate::TRACING_TARGET;
use crate::config::AssemblerConfig;
use crate::encoder::DocumentEncoder;

/// Assembles submittal packets from a document selection.
///
/// Each call is independent; the assembler holds no per-call state and can be
/// shared freely.
///
/// # Examples
///
/// ```rust,ignore
/// let assembler = PacketAssembler::new(store, renderer, AssemblerConfig::default());
/// let artifact = assembler.assemble(&project, &selection).await?;
/// println!("{} ({} bytes)", artifact.file_name(), artifact.len());
/// ```
#[derive(Debug, Clone)]
pub struct PacketAssembler {
    encoder: DocumentEncoder,
    store: DocumentStoreService,
    renderer: RendererService,
    config: AssemblerConfig,
}

impl PacketAssembler {
    /// Creates an assembler over the given collaborators.
    pub fn new(
        store: DocumentStoreService,
        renderer: RendererService,
        config: AssemblerConfig,
    ) -> Self {
        Self {
            encoder: DocumentEncoder::new(store.clone()),
            store,
            renderer,
            config,
        }
    }

    /// Gets the assembler configuration.
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Builds the packet and renders it.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptySelection`] when nothing is selected, before any I/O.
    /// - [`Error::DocumentProcessing`] naming the first document whose content
    ///   could not be resolved. The renderer is not called.
    /// - [`Error::Store`] when the product type catalog cannot be listed.
    /// - Whatever the renderer reports, unchanged.
    pub async fn assemble(
        &self,
        project: &ProjectData,
        selection: &[SelectedDocument],
    ) -> Result<PacketArtifact> {
        let started_at = Instant::now();
        let request = self.build_request(project, selection).await?;

        tracing::info!(
            target: TRACING_TARGET,
            endpoint = self.renderer.endpoint(),
            documents = request.documents.len(),
            encoded_bytes = request.encoded_len(),
            "Submitting packet for rendering"
        );

        let bytes = self.renderer.render(&request).await.inspect_err(|error| {
            tracing::warn!(
                target: TRACING_TARGET,
                kind = error.kind_str(),
                error = %error,
                "Packet rendering failed"
            );
        })?;

        if bytes.is_empty() {
            return Err(Error::EmptyArtifact);
        }

        let artifact = PacketArtifact::new(bytes, project.project_name());

        tracing::info!(
            target: TRACING_TARGET,
            size = artifact.len(),
            file_name = artifact.file_name(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Packet assembled"
        );

        Ok(artifact)
    }

    /// Composes the renderer request without rendering it.
    pub async fn build_request(
        &self,
        project: &ProjectData,
        selection: &[SelectedDocument],
    ) -> Result<PacketRequest> {
        let arranged = SelectedDocument::arrange(selection);
        let Some(first) = arranged.first() else {
            tracing::debug!(
                target: TRACING_TARGET,
                offered = selection.len(),
                "Rejecting packet with no selected documents"
            );
            return Err(Error::EmptySelection);
        };

        tracing::debug!(
            target: TRACING_TARGET,
            offered = selection.len(),
            selected = arranged.len(),
            "Resolving selected documents"
        );

        let product_type = project
            .product_type()
            .unwrap_or_else(|| first.document.product_type.clone());

        let documents = self.encode_all(&arranged).await?;

        let catalog = self.store.documents_by_product_type(&product_type).await?;
        let all_available: Vec<String> = catalog.into_iter().map(|d| d.name).collect();

        tracing::debug!(
            target: TRACING_TARGET,
            product_type = %product_type,
            available = all_available.len(),
            "Resolved product type catalog"
        );

        Ok(PacketRequest::new(project, documents, all_available))
    }

    /// Resolves every entry concurrently, keeping selection order.
    async fn encode_all(&self, arranged: &[&SelectedDocument]) -> Result<Vec<PacketDocument>> {
        let deadline = self.config.effective_fetch_timeout();
        let fetches = arranged
            .iter()
            .map(|entry| self.encode_entry(&entry.document, deadline));

        // The first failure drops the remaining fetches.
        try_join_all(fetches).await
    }

    async fn encode_entry(
        &self,
        document: &Document,
        deadline: Duration,
    ) -> Result<PacketDocument> {
        let encoded = tokio::time::timeout(deadline, self.encoder.encode_as_text(document.id))
            .await
            .unwrap_or(Err(Error::Timeout {
                operation: "document retrieval",
                after: deadline,
            }))
            .map_err(|error| {
                tracing::warn!(
                    target: TRACING_TARGET,
                    document_id = %document.id,
                    document = %document.name,
                    error = %error,
                    "Failed to resolve document content"
                );
                Error::document_processing(&document.name, error)
            })?;

        Ok(PacketDocument::new(document, encoded))
    }
}
