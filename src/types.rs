use crate::error::{Result, SplitterError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Endpoint the client posts to unless overridden.
pub const DEFAULT_API_URL: &str =
    "https://140ce3b927c1.ngrok-free.app/process/split-container-pdf";

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Fixed height of the inline preview frame.
pub const PREVIEW_HEIGHT_PX: u32 = 600;

pub const DATA_URI_PREFIX: &str = "data:application/pdf;base64,";

/// A user-selected file, held in memory for the duration of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a file the way the picker accepts it: anything with a `.pdf`
    /// extension. The content itself is left to the API to validate.
    pub async fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SplitterError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(SplitterError::NotAPdf {
                path: path.display().to_string(),
            });
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.pdf")
            .to_string();

        Ok(Self { file_name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decoded JSON envelope returned by the splitter API.
///
/// The raw value is kept as-is so it can always be shown for inspection,
/// whatever its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiResponse {
    pub raw: Value,
}

impl ApiResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Informational container count, `N/A` when the API leaves it out.
    pub fn containers_detected(&self) -> String {
        match self.raw.get("containers_detected") {
            None | Some(Value::Null) => "N/A".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// The `splits` sequence, if present and an array.
    pub fn splits(&self) -> Option<&Vec<Value>> {
        self.raw.get("splits").and_then(Value::as_array)
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

/// One renderable split: everything needed to save or preview a fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitArtifact {
    /// 1-based position in the response.
    pub index: usize,
    pub container: String,
    pub page_range: String,
    pub file_name: String,
    pub base64: String,
}

impl SplitArtifact {
    pub fn data_uri(&self) -> String {
        format!("{}{}", DATA_URI_PREFIX, self.base64)
    }

    pub fn download_label(&self) -> String {
        format!("Download {}", self.file_name)
    }

    pub fn preview_title(&self) -> String {
        format!("PDF Preview for {}", self.container)
    }
}

/// Per-entry result of rendering. A failed entry never affects its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Ready(SplitArtifact),
    MissingData {
        index: usize,
        container: String,
        page_range: String,
    },
    Failed {
        index: usize,
        container: String,
        reason: String,
    },
}

impl EntryOutcome {
    pub fn index(&self) -> usize {
        match self {
            EntryOutcome::Ready(artifact) => artifact.index,
            EntryOutcome::MissingData { index, .. } | EntryOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn container(&self) -> &str {
        match self {
            EntryOutcome::Ready(artifact) => &artifact.container,
            EntryOutcome::MissingData { container, .. } | EntryOutcome::Failed { container, .. } => {
                container
            }
        }
    }

    pub fn artifact(&self) -> Option<&SplitArtifact> {
        match self {
            EntryOutcome::Ready(artifact) => Some(artifact),
            _ => None,
        }
    }

    /// Warning or error text for entries that could not be rendered.
    pub fn message(&self) -> Option<String> {
        match self {
            EntryOutcome::Ready(_) => None,
            EntryOutcome::MissingData { container, .. } => {
                Some(format!("No Base64 PDF data found for {}.", container))
            }
            EntryOutcome::Failed {
                container, reason, ..
            } => Some(format!(
                "Error creating download/preview for {}: {}",
                container, reason
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderReport {
    Rendered {
        containers_detected: String,
        entries: Vec<EntryOutcome>,
    },
    /// `splits` was absent or not a sequence.
    UnexpectedStructure,
}

impl RenderReport {
    pub fn entries(&self) -> &[EntryOutcome] {
        match self {
            RenderReport::Rendered { entries, .. } => entries,
            RenderReport::UnexpectedStructure => &[],
        }
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &SplitArtifact> {
        self.entries().iter().filter_map(EntryOutcome::artifact)
    }

    pub fn warning_count(&self) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.artifact().is_none())
            .count()
    }
}

/// Result of saving one fragment to disk.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Saved {
        index: usize,
        path: PathBuf,
        bytes: usize,
    },
    Failed {
        index: usize,
        file_name: String,
        reason: String,
    },
}

impl ExportOutcome {
    pub fn saved_path(&self) -> Option<&Path> {
        match self {
            ExportOutcome::Saved { path, .. } => Some(path),
            ExportOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub write_report: bool,
    pub open_viewer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_containers_detected_accepts_int_or_string() {
        assert_eq!(
            ApiResponse::new(json!({"containers_detected": 3})).containers_detected(),
            "3"
        );
        assert_eq!(
            ApiResponse::new(json!({"containers_detected": "two"})).containers_detected(),
            "two"
        );
        assert_eq!(ApiResponse::new(json!({})).containers_detected(), "N/A");
    }

    #[test]
    fn test_splits_requires_array() {
        assert!(ApiResponse::new(json!({"splits": []})).splits().is_some());
        assert!(ApiResponse::new(json!({"splits": {"a": 1}})).splits().is_none());
        assert!(ApiResponse::new(json!([1, 2])).splits().is_none());
    }

    #[test]
    fn test_data_uri_keeps_payload_verbatim() {
        let artifact = SplitArtifact {
            index: 1,
            container: "A1".to_string(),
            page_range: "1-3".to_string(),
            file_name: "A1_1-3.pdf".to_string(),
            base64: "JVBERi0xLjQK".to_string(),
        };
        assert_eq!(artifact.data_uri(), "data:application/pdf;base64,JVBERi0xLjQK");
        assert_eq!(artifact.download_label(), "Download A1_1-3.pdf");
        assert_eq!(artifact.preview_title(), "PDF Preview for A1");
    }

    #[tokio::test]
    async fn test_from_path_applies_extension_filter() {
        let dir = tempfile::tempdir().unwrap();

        let txt = dir.path().join("notes.txt");
        tokio::fs::write(&txt, b"hello").await.unwrap();
        assert!(matches!(
            UploadedDocument::from_path(&txt).await,
            Err(SplitterError::NotAPdf { .. })
        ));

        // Content is not sniffed, only the extension.
        let pdf = dir.path().join("Scan.PDF");
        tokio::fs::write(&pdf, b"not really a pdf").await.unwrap();
        let doc = UploadedDocument::from_path(&pdf).await.unwrap();
        assert_eq!(doc.file_name, "Scan.PDF");
        assert_eq!(doc.len(), 16);

        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            UploadedDocument::from_path(&missing).await,
            Err(SplitterError::FileNotFound { .. })
        ));
    }
}
