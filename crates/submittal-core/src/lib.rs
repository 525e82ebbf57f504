#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod health;
mod render;
mod store;

pub mod types;

pub use error::{BoxedError, Error, Result, StoreError, StoreResult};
pub use health::{ServiceHealth, ServiceStatus};
pub use render::{Renderer, RendererService};
pub use store::{DocumentStore, DocumentStoreService};
pub use types::{
    Document, DocumentPatch, DocumentType, DocumentUpload, PacketArtifact, PacketDocument,
    PacketRequest, ProductType, ProjectData, SelectedDocument, StatusFlags, SubmittalTypeFlags,
};

/// Tracing target for core operations.
pub const TRACING_TARGET: &str = "submittal_core";
