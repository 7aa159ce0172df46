use crate::error::{Result, SplitterError};
use crate::services::{ResultRenderer, SplitterClient};
use crate::types::{ApiResponse, RenderReport, UploadedDocument};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingFile,
    FileSelected,
    /// Set for the duration of `Session::process`. The call holds `&mut self`
    /// across the request, so no other caller can observe or interleave with it.
    Processing,
}

/// Outcome of the last successful call.
#[derive(Debug, Clone)]
pub struct ProcessedResult {
    pub response: ApiResponse,
    pub report: RenderReport,
}

/// State of one interactive session: the selected document and what the
/// last processing attempt produced.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    document: Option<UploadedDocument>,
    last_outcome: Option<Result<ProcessedResult>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingFile,
            document: None,
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&Result<ProcessedResult>> {
        self.last_outcome.as_ref()
    }

    /// Replaces any previous document and discards its results.
    pub fn select_file(&mut self, document: UploadedDocument) {
        info!(
            "File '{}' uploaded and ready for processing",
            document.file_name
        );
        self.document = Some(document);
        self.last_outcome = None;
        self.phase = Phase::FileSelected;
    }

    pub fn clear(&mut self) {
        self.document = None;
        self.last_outcome = None;
        self.phase = Phase::AwaitingFile;
    }

    /// Sends the selected document and renders the response. The outcome,
    /// success or failure, is kept on the session and the phase returns to
    /// `FileSelected` either way.
    pub async fn process(&mut self, client: &SplitterClient) -> &Result<ProcessedResult> {
        let outcome = match self.document.as_ref() {
            None => Err(SplitterError::NoFileSelected),
            Some(document) => {
                self.phase = Phase::Processing;
                let result = client.split(document).await;
                self.phase = Phase::FileSelected;

                result.map(|response| {
                    let report = ResultRenderer::render(&response);
                    ProcessedResult { response, report }
                })
            }
        };

        if let Err(e) = &outcome {
            warn!("Processing failed: {}", e);
        }

        self.last_outcome.insert(outcome)
    }
}
