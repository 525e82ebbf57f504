//! Construction of the services a command runs against.

use anyhow::Context;
use submittal_core::{DocumentStoreService, RendererService};
use submittal_packet::PacketAssembler;
use submittal_present::ArtifactPresenter;
use submittal_reqwest::ReqwestRenderer;
use submittal_store::ObjectDocumentStore;

use super::Cli;
use crate::TRACING_TARGET_CONFIG;

/// Everything a command needs, built once from configuration.
#[derive(Debug, Clone)]
pub struct Services {
    pub store: DocumentStoreService,
    pub renderer: RendererService,
    pub assembler: PacketAssembler,
    pub presenter: ArtifactPresenter,
}

/// Creates the store, renderer, assembler and presenter.
pub fn create_services(cli: &Cli) -> anyhow::Result<Services> {
    let store = ObjectDocumentStore::new(cli.store.clone())
        .context("failed to open document store")?
        .into_service();

    let renderer = ReqwestRenderer::new(cli.renderer.clone())
        .context("failed to create renderer client")?
        .into_service();

    let assembler = PacketAssembler::new(store.clone(), renderer.clone(), cli.assembler.clone());
    let presenter = ArtifactPresenter::new(cli.presenter.clone());

    tracing::debug!(
        target: TRACING_TARGET_CONFIG,
        renderer = renderer.endpoint(),
        store_backend = %cli.store.store_backend,
        "Services created"
    );

    Ok(Services {
        store,
        renderer,
        assembler,
        presenter,
    })
}
