//! Document maintenance commands.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Args;
use submittal_core::{DocumentPatch, DocumentType, DocumentUpload, ProductType};
use uuid::Uuid;

use super::print_json;
use crate::TRACING_TARGET_COMMAND;
use crate::config::Services;

/// Arguments of the `upload` command.
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// PDF file to store
    #[arg(long)]
    pub file: PathBuf,

    /// Display name of the document
    #[arg(long)]
    pub name: String,

    /// Document category, e.g. `technical-data-sheet` or `warranty`
    #[arg(long = "type")]
    pub document_type: DocumentType,

    /// Product type the document belongs to
    #[arg(long)]
    pub product_type: String,

    /// Optional description
    #[arg(long)]
    pub description: Option<String>,

    /// Mark the document as required
    #[arg(long)]
    pub required: bool,
}

/// Arguments of the `update` command.
#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Document to update
    #[arg(long)]
    pub id: Uuid,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "type")]
    pub document_type: Option<DocumentType>,

    #[arg(long)]
    pub product_type: Option<String>,

    #[arg(long)]
    pub required: Option<bool>,
}

impl UpdateArgs {
    fn patch(&self) -> DocumentPatch {
        DocumentPatch {
            name: self.name.clone(),
            description: self.description.clone(),
            document_type: self.document_type,
            required: self.required,
            product_type: self.product_type.as_deref().map(ProductType::from),
        }
    }
}

/// Arguments of the `catalog` command.
#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    /// Product type to list documents for
    #[arg(long)]
    pub product_type: String,
}

/// Arguments of the `delete` command.
#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// Document to delete
    #[arg(long)]
    pub id: Uuid,
}

/// Stores a new document.
pub async fn upload(args: &UploadArgs, services: &Services) -> anyhow::Result<()> {
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} does not name a file", args.file.display()))?;

    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut upload = DocumentUpload::new(
        args.name.as_str(),
        file_name,
        args.document_type,
        args.product_type.as_str(),
        content,
    )
    .with_required(args.required);
    if let Some(description) = &args.description {
        upload = upload.with_description(description.as_str());
    }

    let document = services
        .store
        .create(upload)
        .await
        .context("failed to store document")?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        document_id = %document.id,
        size = document.size,
        "Document stored"
    );

    print_json(&document)
}

/// Updates document metadata.
pub async fn update(args: &UpdateArgs, services: &Services) -> anyhow::Result<()> {
    let patch = args.patch();
    if patch.is_empty() {
        bail!("nothing to update; pass at least one field");
    }

    let document = services
        .store
        .update(args.id, patch)
        .await
        .with_context(|| format!("failed to update document {}", args.id))?;

    print_json(&document)
}

/// Lists the documents of a product type.
pub async fn catalog(args: &CatalogArgs, services: &Services) -> anyhow::Result<()> {
    let product_type = ProductType::new(args.product_type.as_str());
    let documents = services
        .store
        .documents_by_product_type(&product_type)
        .await
        .with_context(|| format!("failed to list documents for {product_type}"))?;

    print_json(&documents)
}

/// Deletes a document and its content.
pub async fn delete(args: &DeleteArgs, services: &Services) -> anyhow::Result<()> {
    services
        .store
        .delete(args.id)
        .await
        .with_context(|| format!("failed to delete document {}", args.id))?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        document_id = %args.id,
        "Document deleted"
    );

    Ok(())
}
