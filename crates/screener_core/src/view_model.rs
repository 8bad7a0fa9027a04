use std::path::PathBuf;

use crate::rubric::RubricOption;
use crate::state::{FilePhase, StatusKind, View};

/// Render-ready snapshot of the application state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_view: View,
    pub rubric_lists: RubricListsView,
    pub resume_file_info: String,
    pub rubric_file_info: String,
    pub rubric_name: String,
    pub status: Option<StatusLine>,
    pub rubric_status: Option<StatusLine>,
    pub rubric_uploading: bool,
    pub files: Vec<FileRowView>,
    pub download_link: Option<String>,
    pub streaming: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RubricListsView {
    /// Both list requests are still in flight.
    #[default]
    Loading,
    Loaded {
        options: Vec<RubricOption>,
        saved: Vec<String>,
    },
    /// Either request failed; both lists render this error.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub filename: String,
    pub body: FileBodyView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBodyView {
    /// Status label plus the accumulated progress log (possibly empty).
    InProgress { phase: FilePhase, log: String },
    /// Terminal verdict; replaces any progress output.
    Verdict {
        verdict: String,
        reasons: Vec<String>,
    },
    /// Terminal failure for this file alone.
    Error(String),
}

/// Label shown next to a file input.
pub fn file_info_label(files: &[PathBuf]) -> String {
    match files {
        [] => "No files selected".to_string(),
        [single] => {
            let name = single
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_owned)
                .unwrap_or_else(|| single.display().to_string());
            format!("Selected: {name}")
        }
        many => format!("Selected {} files", many.len()),
    }
}
