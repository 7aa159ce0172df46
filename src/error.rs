use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Body of a non-200 response, decoded as JSON when possible.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => write!(f, "{}", pretty),
                Err(_) => write!(f, "{}", value),
            },
            ResponseBody::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("An error occurred during the API request. Error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Not a PDF file: {path} (only .pdf files are accepted)")]
    NotAPdf { path: String },

    #[error("No file selected. Choose a PDF file before processing.")]
    NoFileSelected,

    #[error("API endpoint not found (Status 404). Please verify the URL: {url}")]
    EndpointNotFound { url: String },

    #[error("API call failed with status code: {status}")]
    HttpStatus { status: u16, body: ResponseBody },

    #[error("API request timed out after {secs} seconds. Please check your API's performance or increase the timeout.")]
    Timeout { secs: u64 },

    #[error("API returned an undecodable response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },
}

pub type Result<T> = std::result::Result<T, SplitterError>;
