//! The `assemble` command.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use submittal_core::{DocumentStoreService, ProjectData, SelectedDocument};
use uuid::Uuid;

use crate::TRACING_TARGET_COMMAND;
use crate::config::Services;

/// Arguments of the `assemble` command.
#[derive(Debug, Clone, Args)]
pub struct AssembleArgs {
    /// JSON file holding the project data and the document selection
    #[arg(long, short)]
    pub input: PathBuf,

    /// Open the packet in a viewer instead of saving it
    #[arg(long, conflicts_with = "output")]
    pub preview: bool,

    /// File name to save the packet under (defaults to one derived from the project name)
    #[arg(long, short)]
    pub output: Option<String>,
}

/// Contents of the `--input` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PacketInput {
    #[serde(default)]
    project: ProjectData,
    #[serde(default)]
    selection: Vec<SelectionInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionInput {
    document_id: Uuid,
    #[serde(default = "selected_by_default")]
    selected: bool,
    #[serde(default)]
    order: i32,
}

fn selected_by_default() -> bool {
    true
}

async fn read_input(path: &Path) -> anyhow::Result<PacketInput> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Looks up every referenced document, keeping the caller's flags.
async fn resolve_selection(
    store: &DocumentStoreService,
    entries: &[SelectionInput],
) -> anyhow::Result<Vec<SelectedDocument>> {
    let mut selection = Vec::with_capacity(entries.len());
    for entry in entries {
        let document = store
            .document(entry.document_id)
            .await
            .with_context(|| format!("failed to resolve document {}", entry.document_id))?;
        selection.push(SelectedDocument::new(document, entry.selected, entry.order));
    }
    Ok(selection)
}

/// Assembles a packet and previews or saves it.
pub async fn assemble(args: &AssembleArgs, services: &Services) -> anyhow::Result<()> {
    let input = read_input(&args.input).await?;
    let selection = resolve_selection(&services.store, &input.selection).await?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        input = %args.input.display(),
        entries = selection.len(),
        "Assembling packet"
    );

    let artifact = services
        .assembler
        .assemble(&input.project, &selection)
        .await
        .context("failed to assemble packet")?;

    if args.preview {
        let preview = services
            .presenter
            .preview(artifact.bytes())
            .await
            .context("failed to preview packet")?;
        println!("{}", preview.path().display());
        preview.released().await;
        return Ok(());
    }

    let file_name = args.output.as_deref().unwrap_or(artifact.file_name());
    let saved = services
        .presenter
        .download(artifact.bytes(), file_name)
        .context("failed to save packet")?;
    println!("{}", saved.display());

    Ok(())
}
