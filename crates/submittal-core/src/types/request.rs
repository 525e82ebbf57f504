//! Request payload submitted to the remote renderer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Document, DocumentType, ProjectData};

/// A single document entry of a [`PacketRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketDocument {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    /// Standard base64 of the document content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
}

impl PacketDocument {
    /// Builds an entry from a stored document and its encoded content.
    pub fn new(document: &Document, file_data: Option<String>) -> Self {
        Self {
            id: document.id,
            name: document.name.clone(),
            url: document
                .url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            document_type: document.document_type,
            file_data,
        }
    }
}

/// Everything the renderer needs to compose a packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketRequest {
    /// Project metadata with both flag groups present.
    pub project_data: ProjectData,
    /// Selected documents in packet order.
    pub documents: Vec<PacketDocument>,
    /// Display names of the selected documents, in packet order.
    pub selected_document_names: Vec<String>,
    /// Display names of every document available for the product type.
    pub all_available_documents: Vec<String>,
}

impl PacketRequest {
    /// Creates a request, completing the project flag groups.
    pub fn new(
        project_data: &ProjectData,
        documents: Vec<PacketDocument>,
        all_available_documents: Vec<String>,
    ) -> Self {
        let selected_document_names = documents.iter().map(|d| d.name.clone()).collect();

        Self {
            project_data: project_data.complete(),
            documents,
            selected_document_names,
            all_available_documents,
        }
    }

    /// Total length of the encoded content carried by the request.
    pub fn encoded_len(&self) -> usize {
        self.documents
            .iter()
            .filter_map(|d| d.file_data.as_ref())
            .map(String::len)
            .sum()
    }
}
