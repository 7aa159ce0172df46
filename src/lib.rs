//! # PDF Container Splitter
//!
//! Client for a remote container-splitting API. A PDF is uploaded once, the
//! API answers with one base64 PDF per detected container, and each of those
//! is rendered into a download and a preview affordance on its own.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pdf_container_splitter::{ClientConfig, ResultRenderer, SplitterClient, UploadedDocument};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SplitterClient::new(ClientConfig::default())?;
//!     let document = UploadedDocument::from_path(Path::new("manifest.pdf")).await?;
//!
//!     let response = client.split(&document).await?;
//!     let report = ResultRenderer::render(&response);
//!
//!     for artifact in report.artifacts() {
//!         println!("{} -> {}", artifact.container, artifact.file_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

pub use error::{ResponseBody, Result, SplitterError};
pub use services::{ArtifactExporter, Phase, ProcessedResult, ResultRenderer, Session, SplitterClient};
pub use types::{
    ApiResponse, ClientConfig, EntryOutcome, ExportConfig, ExportOutcome, RenderReport,
    SplitArtifact, UploadedDocument,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_workflow() {
        let response = ApiResponse::new(json!({
            "containers_detected": 2,
            "splits": [
                {"container": "A1", "page_range": "1-3", "base64": "JVBERi0xLjQK"},
                {"container": "B2", "page_range": "4-4"}
            ]
        }));

        let report = ResultRenderer::render(&response);
        let artifact = report.artifacts().next().unwrap();

        assert_eq!(artifact.file_name, "A1_1-3.pdf");
        assert_eq!(artifact.data_uri(), "data:application/pdf;base64,JVBERi0xLjQK");
        assert_eq!(report.entries().len(), 2);
        assert_eq!(report.warning_count(), 1);
    }
}
