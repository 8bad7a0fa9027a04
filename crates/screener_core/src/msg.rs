use std::path::PathBuf;

/// One decoded unit of server-sent progress data, free of transport detail.
///
/// Only the fields present in the wire record are populated; an absent field
/// means the record did not carry it, not that it was empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamRecord {
    pub filename: Option<String>,
    pub status: Option<RecordStatus>,
    pub partial: Option<String>,
    pub verdict: Option<String>,
    pub reasons: Option<Vec<String>>,
    pub error: Option<String>,
    pub download_link: Option<String>,
}

/// Lifecycle marker a record can carry. Unknown markers from the wire are
/// dropped before they reach the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// The server began evaluating this file.
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Shell finished initializing; load the rubric lists.
    Started,
    /// User switched between the resume checker and the rubric manager.
    ViewSelected(crate::View),
    /// Both rubric list requests resolved.
    RubricListsLoaded {
        available: Vec<String>,
        saved: Vec<String>,
    },
    /// Either rubric list request failed; both lists show the error.
    RubricListsFailed(String),
    /// User toggled one rubric checkbox.
    RubricToggled { id: String, selected: bool },
    /// User picked the resume files to upload.
    ResumeFilesChosen(Vec<PathBuf>),
    /// User submitted the resume form.
    ResumesSubmitted,
    /// One record completed in the evaluation stream.
    RecordReceived(StreamRecord),
    /// The evaluation stream ended normally.
    StreamCompleted,
    /// The submission failed before or during streaming.
    StreamFailed(String),
    /// User edited the rubric name input.
    RubricNameChanged(String),
    /// User picked a rubric advertisement file.
    RubricFileChosen(PathBuf),
    /// User submitted the rubric form.
    RubricSubmitted,
    /// The rubric upload finished; `status` is the server or transport text.
    RubricUploadCompleted { accepted: bool, status: String },
    /// UI tick used to expire transient status lines.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
