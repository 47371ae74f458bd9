//! File Metadata and Attachment Collaborators
//!
//! Storage and extraction live upstream; this module defines the narrow
//! contracts the validator consumes and the gate applied before any
//! constraint is evaluated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one attached file.
///
/// Carried through error entries so a message can say which of several
/// attachments on the same attribute failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl FileRef {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4(), filename: None }
    }

    pub fn named(filename: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), filename: Some(filename.into()) }
    }
}

impl Default for FileRef {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracted metadata for one file.
///
/// Extractors report `0` or omit a dimension they could not read; both are
/// treated as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl FileMetadata {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: Some(width), height: Some(height) }
    }

    /// The metadata gate: both dimensions present and positive, or nothing.
    ///
    /// A file that fails the gate is reported as missing metadata before any
    /// constraint is consulted.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Resolves the files attached to a record's attribute, in attachment order.
pub trait AttachmentResolver<R> {
    fn attachments_for(&self, record: &R, attribute: &str) -> Vec<FileRef>;
}

/// Supplies already-extracted metadata for a file.
pub trait MetadataProvider {
    fn metadata_for(&self, file: &FileRef) -> FileMetadata;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_requires_both_positive_dimensions() {
        assert_eq!(FileMetadata::new(800, 600).dimensions(), Some((800, 600)));
        assert_eq!(FileMetadata::new(0, 600).dimensions(), None);
        assert_eq!(FileMetadata::new(800, 0).dimensions(), None);
        assert_eq!(FileMetadata::default().dimensions(), None);
        assert_eq!(
            FileMetadata { width: Some(800), height: None }.dimensions(),
            None
        );
    }

    #[test]
    fn test_metadata_parses_with_absent_fields() {
        let metadata: FileMetadata = serde_json::from_str(r#"{"width": 640}"#).unwrap();
        assert_eq!(metadata.width, Some(640));
        assert_eq!(metadata.height, None);
        assert_eq!(metadata.dimensions(), None);
    }
}
