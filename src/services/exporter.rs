use crate::error::{Result, SplitterError};
use crate::types::{
    ApiResponse, EntryOutcome, ExportOutcome, RenderReport, SplitArtifact, PREVIEW_HEIGHT_PX,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use std::process::Command;
use tokio::fs;
use tracing::{debug, info, warn};

pub const REPORT_FILE_NAME: &str = "report.html";
pub const RAW_RESPONSE_FILE_NAME: &str = "raw_response.json";

/// Save-to-disk and viewer affordances for rendered splits.
pub struct ArtifactExporter;

impl ArtifactExporter {
    /// Decodes and writes every ready split. Each entry succeeds or fails on
    /// its own.
    pub async fn save_all(report: &RenderReport, output_dir: &Path) -> Result<Vec<ExportOutcome>> {
        Self::ensure_output_directory(output_dir).await?;

        let mut outcomes = Vec::new();
        for artifact in report.artifacts() {
            let outcome = match Self::save_artifact(artifact, output_dir).await {
                Ok((path, bytes)) => {
                    debug!("Saved split {} to {} ({} bytes)", artifact.index, path.display(), bytes);
                    ExportOutcome::Saved {
                        index: artifact.index,
                        path,
                        bytes,
                    }
                }
                Err(reason) => {
                    warn!("Could not save {}: {}", artifact.file_name, reason);
                    ExportOutcome::Failed {
                        index: artifact.index,
                        file_name: artifact.file_name.clone(),
                        reason,
                    }
                }
            };
            outcomes.push(outcome);
        }

        let saved = outcomes.iter().filter(|o| o.saved_path().is_some()).count();
        info!("Saved {}/{} splits to {}", saved, outcomes.len(), output_dir.display());

        Ok(outcomes)
    }

    async fn save_artifact(
        artifact: &SplitArtifact,
        output_dir: &Path,
    ) -> std::result::Result<(PathBuf, usize), String> {
        let bytes = STANDARD
            .decode(artifact.base64.trim())
            .map_err(|e| format!("invalid base64 payload: {}", e))?;

        let path = output_dir.join(Self::disk_file_name(&artifact.file_name));
        fs::write(&path, &bytes)
            .await
            .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;

        Ok((path, bytes.len()))
    }

    /// The synthesized name may contain path separators (e.g. a `N/A` page
    /// range); they must not escape the output directory.
    pub fn disk_file_name(file_name: &str) -> String {
        file_name.replace(['/', '\\'], "-")
    }

    pub async fn write_raw_response(response: &ApiResponse, output_dir: &Path) -> Result<PathBuf> {
        Self::ensure_output_directory(output_dir).await?;

        let path = output_dir.join(RAW_RESPONSE_FILE_NAME);
        fs::write(&path, response.pretty()).await?;
        debug!("Raw response written to {}", path.display());
        Ok(path)
    }

    pub async fn write_html_report(
        response: &ApiResponse,
        report: &RenderReport,
        path: &Path,
    ) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_output_directory(parent).await?;
        }

        fs::write(path, Self::html_report(response, report)).await?;
        info!("Generated report: {}", path.display());
        Ok(())
    }

    /// Standalone page with the raw response inspector and, per split, a
    /// download link and a fixed-height preview frame bound to its data URI.
    pub fn html_report(response: &ApiResponse, report: &RenderReport) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>PDF Container Splitter &amp; Viewer</title>\n");
        html.push_str(&format!(
            "<style>\n\
             .download-button-link {{ display: inline-flex; padding: 0.25rem 0.75rem; border-radius: 0.25rem; \
             margin: 0.5rem 0; color: white; background-color: rgb(14, 17, 23); text-decoration: none; }}\n\
             .download-button-link:hover {{ background-color: rgb(40, 40, 40); }}\n\
             .pdf-viewer-iframe {{ width: 100%; height: {}px; border: 1px solid #ccc; border-radius: 4px; margin-top: 10px; }}\n\
             .warning {{ color: #8a6d00; }}\n\
             .error {{ color: #b00020; }}\n\
             </style>\n",
            PREVIEW_HEIGHT_PX
        ));
        html.push_str("</head>\n<body>\n<h1>PDF Container Splitter &amp; Viewer</h1>\n");
        html.push_str(&format!(
            "<p>Generated {}</p>\n",
            chrono::Utc::now().to_rfc3339()
        ));

        let raw = escape_html(&response.pretty());

        match report {
            RenderReport::UnexpectedStructure => {
                html.push_str(
                    "<p class=\"error\">API response structure is unexpected. \
                     Please check the format of the returned data.</p>\n",
                );
                html.push_str(&format!(
                    "<details open>\n<summary>View Raw JSON Response (for debugging)</summary>\n<pre>{}</pre>\n</details>\n",
                    raw
                ));
            }
            RenderReport::Rendered {
                containers_detected,
                entries,
            } => {
                html.push_str(&format!(
                    "<details>\n<summary>View Raw JSON Response</summary>\n<pre>{}</pre>\n</details>\n",
                    raw
                ));
                html.push_str(&format!(
                    "<h2>Results: {} Containers Detected</h2>\n",
                    escape_html(containers_detected)
                ));
                for entry in entries {
                    html.push_str(&Self::entry_html(entry));
                }
            }
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn entry_html(entry: &EntryOutcome) -> String {
        let page_range = match entry {
            EntryOutcome::Ready(artifact) => artifact.page_range.as_str(),
            EntryOutcome::MissingData { page_range, .. } => page_range.as_str(),
            EntryOutcome::Failed { .. } => "N/A",
        };
        let mut html = format!(
            "<section class=\"split\">\n<h3>Container: <strong>{}</strong> (Pages: {})</h3>\n",
            escape_html(entry.container()),
            escape_html(page_range)
        );

        match entry {
            EntryOutcome::Ready(artifact) => {
                let uri = artifact.data_uri();
                html.push_str(&format!(
                    "<a href=\"{}\" download=\"{}\" class=\"download-button-link\">{}</a>\n",
                    escape_html(&uri),
                    escape_html(&artifact.file_name),
                    escape_html(&artifact.download_label())
                ));
                html.push_str(&format!(
                    "<iframe class=\"pdf-viewer-iframe\" src=\"{}\" title=\"{}\"></iframe>\n<hr>\n",
                    escape_html(&uri),
                    escape_html(&artifact.preview_title())
                ));
            }
            EntryOutcome::MissingData { .. } => {
                html.push_str(&format!(
                    "<p class=\"warning\">{}</p>\n",
                    escape_html(&entry.message().unwrap_or_default())
                ));
            }
            EntryOutcome::Failed { .. } => {
                html.push_str(&format!(
                    "<p class=\"error\">{}</p>\n",
                    escape_html(&entry.message().unwrap_or_default())
                ));
            }
        }

        html.push_str("</section>\n");
        html
    }

    /// Opens a saved fragment in the platform's default PDF viewer.
    pub fn launch_viewer(path: &Path) -> Result<()> {
        let mut command = Self::viewer_command(path);
        command.spawn()?;
        debug!("Launched viewer for {}", path.display());
        Ok(())
    }

    fn viewer_command(path: &Path) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }

    async fn ensure_output_directory(output_dir: &Path) -> Result<()> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).await.map_err(|e| {
                SplitterError::OutputDirectory {
                    reason: format!("Failed to create output directory: {}", e),
                }
            })?;
            info!("Created output directory: {}", output_dir.display());
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
