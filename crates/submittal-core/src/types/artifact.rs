//! Rendered packet output.

use bytes::Bytes;

/// Fallback file name when the project has no usable name.
const DEFAULT_FILE_NAME: &str = "submittal-packet.pdf";

/// The binary PDF returned by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketArtifact {
    bytes: Bytes,
    file_name: String,
}

impl PacketArtifact {
    /// Wraps rendered bytes, deriving a file name from the project name.
    pub fn new(bytes: Bytes, project_name: Option<&str>) -> Self {
        let file_name = project_name
            .map(sanitize_file_name)
            .filter(|name| !name.is_empty())
            .map(|name| format!("{name}-submittal.pdf"))
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned());

        Self { bytes, file_name }
    }

    /// The PDF bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Suggested file name for saving the artifact.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Keeps alphanumerics, dashes and underscores; whitespace runs become a dash.
fn sanitize_file_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
