//! Stored document records.

use derive_more::{Deref, Display, From};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use url::Url;
use uuid::Uuid;

/// Category of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, StrumDisplay, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DocumentType {
    TechnicalDataSheet,
    EvaluationReport,
    SafetyDataSheet,
    LeedGuide,
    InstallationGuide,
    Warranty,
    AcousticReport,
    PartSpec,
}

/// Product category scoping which documents are relevant to a project,
/// e.g. `structural-floor` or `underlayment`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Deref, Display, From)]
#[serde(transparent)]
pub struct ProductType(String);

impl ProductType {
    /// Creates a product type from its identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProductType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A stored document and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Original upload file name.
    pub file_name: String,
    /// Locator of the binary content, when one is available.
    #[serde(default)]
    pub url: Option<Url>,
    /// Content size in bytes.
    pub size: u64,
    /// Document category.
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    /// Whether the document must be part of every packet for its product.
    #[serde(default)]
    pub required: bool,
    /// Product type the document belongs to.
    pub product_type: ProductType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for storing a new document.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub name: String,
    pub description: Option<String>,
    pub file_name: String,
    pub document_type: DocumentType,
    pub required: bool,
    pub product_type: ProductType,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl DocumentUpload {
    /// Creates an upload with the mandatory fields.
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        document_type: DocumentType,
        product_type: impl Into<ProductType>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            file_name: file_name.into(),
            document_type,
            required: false,
            product_type: product_type.into(),
            content,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the document as required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Metadata update for an existing document; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub document_type: Option<DocumentType>,
    pub required: Option<bool>,
    pub product_type: Option<ProductType>,
}

impl DocumentPatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.document_type.is_none()
            && self.required.is_none()
            && self.product_type.is_none()
    }

    /// Applies the patch to a document, bumping `updated_at` when anything changed.
    pub fn apply(self, document: &mut Document) {
        if self.is_empty() {
            return;
        }

        if let Some(name) = self.name {
            document.name = name;
        }
        if let Some(description) = self.description {
            document.description = Some(description);
        }
        if let Some(document_type) = self.document_type {
            document.document_type = document_type;
        }
        if let Some(required) = self.required {
            document.required = required;
        }
        if let Some(product_type) = self.product_type {
            document.product_type = product_type;
        }

        document.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    fn document() -> Document {
        Document {
            id: Uuid::now_v7(),
            name: "Technical Data Sheet".to_owned(),
            description: None,
            file_name: "tds.pdf".to_owned(),
            url: None,
            size: 42,
            document_type: DocumentType::TechnicalDataSheet,
            required: true,
            product_type: ProductType::new("structural-floor"),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_document_type_names() {
        let names: Vec<&str> = DocumentType::iter().map(Into::into).collect();
        assert_eq!(
            names,
            [
                "technical-data-sheet",
                "evaluation-report",
                "safety-data-sheet",
                "leed-guide",
                "installation-guide",
                "warranty",
                "acoustic-report",
                "part-spec",
            ]
        );

        for document_type in DocumentType::iter() {
            let json = serde_json::to_string(&document_type).unwrap();
            assert_eq!(json, format!("\"{document_type}\""));
        }
    }

    #[test]
    fn test_document_type_from_str() {
        assert_eq!(
            DocumentType::from_str("leed-guide").unwrap(),
            DocumentType::LeedGuide
        );
        assert!(DocumentType::from_str("brochure").is_err());
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let value = serde_json::to_value(document()).unwrap();
        assert_eq!(value["fileName"], "tds.pdf");
        assert_eq!(value["type"], "technical-data-sheet");
        assert_eq!(value["productType"], "structural-floor");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_patch_applies_present_fields() {
        let mut doc = document();
        let patch = DocumentPatch {
            name: Some("TDS v2".to_owned()),
            required: Some(false),
            ..Default::default()
        };

        patch.apply(&mut doc);

        assert_eq!(doc.name, "TDS v2");
        assert!(!doc.required);
        assert_eq!(doc.document_type, DocumentType::TechnicalDataSheet);
        assert!(doc.updated_at > Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn test_empty_patch_keeps_timestamp() {
        let mut doc = document();
        DocumentPatch::default().apply(&mut doc);
        assert_eq!(doc.updated_at, Timestamp::UNIX_EPOCH);
    }
}
