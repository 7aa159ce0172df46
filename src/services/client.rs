use crate::error::{ResponseBody, Result, SplitterError};
use crate::types::{ApiResponse, ClientConfig, UploadedDocument};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

/// Sends one PDF to the splitter API per call. No retries: every failure is
/// returned once and the caller decides whether to try again.
pub struct SplitterClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SplitterClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Url::parse(&config.api_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.config.timeout.as_secs()
    }

    pub async fn split(&self, document: &UploadedDocument) -> Result<ApiResponse> {
        info!(
            "Sending '{}' ({} bytes) to API at {}",
            document.file_name,
            document.len(),
            self.config.api_url
        );

        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.config.api_url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!("API responded with status {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(SplitterError::EndpointNotFound {
                url: self.config.api_url.clone(),
            });
        }

        // Only an exact 200 counts as success.
        if status != StatusCode::OK {
            warn!("API call failed with status {}", status);
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    debug!("Could not read error body: {}", e);
                    String::new()
                }
            };
            return Err(SplitterError::HttpStatus {
                status: status.as_u16(),
                body: ResponseBody::from_text(text),
            });
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;

        let raw = serde_json::from_str(&text).map_err(|e| SplitterError::InvalidResponse {
            reason: e.to_string(),
        })?;

        Ok(ApiResponse::new(raw))
    }

    fn classify(&self, error: reqwest::Error) -> SplitterError {
        if error.is_timeout() {
            SplitterError::Timeout {
                secs: self.timeout_secs(),
            }
        } else {
            SplitterError::Request(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rejects_malformed_endpoint() {
        let config = ClientConfig {
            api_url: "not a url".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            SplitterClient::new(config),
            Err(SplitterError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let client = SplitterClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.timeout_secs(), 300);
        assert!(client.api_url().ends_with("/process/split-container-pdf"));
    }
}
