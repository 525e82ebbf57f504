//! Data model shared by the packet assembler and its collaborators.

mod artifact;
mod document;
mod project;
mod request;
mod selection;

pub use artifact::PacketArtifact;
pub use document::{Document, DocumentPatch, DocumentType, DocumentUpload, ProductType};
pub use project::{ProjectData, StatusFlags, SubmittalTypeFlags};
pub use request::{PacketDocument, PacketRequest};
pub use selection::SelectedDocument;
