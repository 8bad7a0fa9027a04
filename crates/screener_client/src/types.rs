use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// One parsed unit from the evaluation stream.
///
/// Exactly the fields present in the wire JSON are populated; unknown fields
/// are ignored. An absent field means not-present, never empty-string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EventRecord {
    pub filename: Option<String>,
    pub status: Option<String>,
    pub partial: Option<String>,
    pub verdict: Option<String>,
    pub reasons: Option<Vec<String>>,
    pub error: Option<String>,
    pub download_link: Option<String>,
}

/// Rubric identifiers usable as filter options plus previously uploaded
/// display names. Both lists load together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RubricLists {
    pub available: Vec<String>,
    pub saved: Vec<String>,
}

/// One item surfaced by the background IO runtime to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// One record completed in the evaluation stream.
    Record(EventRecord),
    /// The evaluation stream ended normally.
    StreamFinished,
    /// The submission failed before or during streaming.
    StreamFailed(ApiError),
    /// Both rubric list requests resolved (all-or-nothing).
    RubricLists(Result<RubricLists, ApiError>),
    /// The rubric upload finished; `Ok` carries the server status text.
    RubricUploaded(Result<String, ApiError>),
    /// The aggregate report finished downloading.
    ReportSaved(Result<PathBuf, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    /// The upload went out but no event stream came back.
    StreamingUnavailable { status: Option<u16> },
    Timeout,
    Network,
    FileRead { path: String },
    /// The response body was not the JSON shape the endpoint promises.
    MalformedResponse,
    ReportWrite { path: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::StreamingUnavailable { status } => match status {
                Some(code) => write!(f, "streaming unavailable (http {code})"),
                None => write!(f, "streaming unavailable"),
            },
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::FileRead { path } => write!(f, "cannot read file {path}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::ReportWrite { path } => write!(f, "cannot write report {path}"),
        }
    }
}
