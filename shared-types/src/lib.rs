//! Wire types for the document-management REST API
//!
//! These mirror the subset of the Mayan EDMS `/api/v4` payloads the console
//! reads. Unknown fields are ignored so newer servers stay compatible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentType {
    pub id: u64,
    pub label: String,
}

/// A stored document. Files are listed separately through
/// `/documents/{id}/files/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: u64,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub datetime_created: DateTime<Utc>,
    pub document_type: DocumentType,
    #[serde(default)]
    pub uuid: Option<uuid::Uuid>,
    #[serde(default)]
    pub file_latest: Option<DocumentFile>,
}

/// A file attached to a document, as returned by the files endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentFile {
    pub id: u64,
    pub filename: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Paginated list envelope (`count` / `next` / `previous` / `results`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

// ============================================================================
// Preview boundary
// ============================================================================

/// The fields the preview windows need from a file. Immutable once handed to
/// a window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDescriptor {
    pub id: u64,
    pub filename: String,
    pub size: Option<u64>,
    pub mimetype: Option<String>,
}

impl FileDescriptor {
    pub fn new(id: u64, filename: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            size: None,
            mimetype: None,
        }
    }

    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Lower-cased filename.
    pub fn normalized_name(&self) -> String {
        self.filename.to_ascii_lowercase()
    }

    /// Lower-cased mimetype, empty when the server did not report one.
    pub fn normalized_mimetype(&self) -> String {
        self.mimetype
            .as_deref()
            .map(|m| m.trim().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

impl From<&DocumentFile> for FileDescriptor {
    fn from(file: &DocumentFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            size: file.size,
            mimetype: file.mimetype.clone(),
        }
    }
}

impl From<DocumentFile> for FileDescriptor {
    fn from(file: DocumentFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            size: file.size,
            mimetype: file.mimetype,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_page_parses_server_payload() {
        let body = serde_json::json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 7,
                "label": "Quarterly scan",
                "description": "",
                "datetime_created": "2024-03-02T10:15:00.123456Z",
                "document_type": { "id": 1, "label": "Default", "delete_time_period": 30 },
                "uuid": "6b1d4a4e-52f0-4c3e-9f53-3c5d8f3d2f11",
                "language": "eng",
                "file_latest": {
                    "id": 11,
                    "filename": "scan.dcm",
                    "size": 5242880,
                    "mimetype": "application/dicom",
                    "encoding": "binary",
                    "checksum": "abc",
                    "timestamp": "2024-03-02T10:15:01Z"
                }
            }]
        });

        let page: Page<Document> = serde_json::from_value(body).unwrap();
        assert_eq!(page.count, 1);
        assert!(!page.has_next());
        let doc = &page.results[0];
        assert_eq!(doc.document_type.label, "Default");
        let file = doc.file_latest.as_ref().unwrap();
        assert_eq!(file.mimetype.as_deref(), Some("application/dicom"));
    }

    #[test]
    fn file_without_optional_fields_parses() {
        let file: DocumentFile =
            serde_json::from_value(serde_json::json!({ "id": 3, "filename": "notes" })).unwrap();
        assert_eq!(file.size, None);
        assert_eq!(file.mimetype, None);
    }

    #[test]
    fn page_without_results_defaults_to_empty() {
        let page: Page<DocumentFile> = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(page.results.is_empty());
    }

    #[test]
    fn descriptor_from_file_keeps_boundary_fields() {
        let file = DocumentFile {
            id: 4,
            filename: "Notes.TXT".to_string(),
            size: Some(12),
            mimetype: Some(" Text/Plain ".to_string()),
            encoding: None,
            checksum: None,
            timestamp: None,
        };
        let descriptor = FileDescriptor::from(&file);
        assert_eq!(descriptor.id, 4);
        assert_eq!(descriptor.normalized_name(), "notes.txt");
        assert_eq!(descriptor.normalized_mimetype(), "text/plain");
    }
}
