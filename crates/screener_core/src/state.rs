use std::path::PathBuf;

use crate::msg::{RecordStatus, StreamRecord};
use crate::rubric::{format_rubric_label, RubricOption};
use crate::view_model::{
    file_info_label, AppViewModel, FileBodyView, FileRowView, RubricListsView, StatusLine,
};

/// Cadence the shell is expected to drive `Msg::Tick` at.
pub const TICK_INTERVAL_MS: u64 = 250;

/// Success status lines disappear after five seconds of ticks.
pub(crate) const SUCCESS_TTL_TICKS: u32 = (5_000 / TICK_INTERVAL_MS) as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    ResumeChecker,
    RubricManager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    ttl_ticks: Option<u32>,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        // Only success lines expire; info and error persist until replaced.
        let ttl_ticks = match kind {
            StatusKind::Success => Some(SUCCESS_TTL_TICKS),
            StatusKind::Info | StatusKind::Error => None,
        };
        Self {
            text: text.into(),
            kind,
            ttl_ticks,
        }
    }
}

/// Displayed phase of a file that has no terminal outcome yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePhase {
    Starting,
    Evaluating,
}

impl FilePhase {
    pub fn label(self) -> &'static str {
        match self {
            FilePhase::Starting => "Starting...",
            FilePhase::Evaluating => "Evaluating...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FileOutcome {
    Verdict {
        verdict: String,
        reasons: Vec<String>,
    },
    Error(String),
}

/// Per-filename accumulated state, created lazily on the first record that
/// names the file. Entries live until the next submission clears the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileProgress {
    filename: String,
    phase: FilePhase,
    partial_log: String,
    outcome: Option<FileOutcome>,
}

impl FileProgress {
    fn new(filename: String) -> Self {
        Self {
            filename,
            phase: FilePhase::Starting,
            partial_log: String::new(),
            outcome: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum RubricListsState {
    #[default]
    Loading,
    Loaded {
        options: Vec<RubricOption>,
        saved: Vec<String>,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    active_view: View,
    rubric_lists: RubricListsState,
    resume_files: Vec<PathBuf>,
    rubric_name: String,
    rubric_file: Option<PathBuf>,
    rubric_uploading: bool,
    status: Option<StatusMessage>,
    rubric_status: Option<StatusMessage>,
    files: Vec<FileProgress>,
    download_link: Option<String>,
    streaming: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let rubric_lists = match &self.rubric_lists {
            RubricListsState::Loading => RubricListsView::Loading,
            RubricListsState::Loaded { options, saved } => RubricListsView::Loaded {
                options: options.clone(),
                saved: saved.clone(),
            },
            RubricListsState::Failed(message) => RubricListsView::Failed(message.clone()),
        };

        AppViewModel {
            active_view: self.active_view,
            rubric_lists,
            resume_file_info: file_info_label(&self.resume_files),
            rubric_file_info: file_info_label(self.rubric_file.as_slice()),
            rubric_name: self.rubric_name.clone(),
            status: self.status.as_ref().map(status_line),
            rubric_status: self.rubric_status.as_ref().map(status_line),
            rubric_uploading: self.rubric_uploading,
            files: self.files.iter().map(file_row).collect(),
            download_link: self.download_link.clone(),
            streaming: self.streaming,
        }
    }

    /// Returns whether the state changed since the last call, resetting the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_view(&mut self, view: View) {
        if self.active_view != view {
            self.active_view = view;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_rubric_lists_load(&mut self) {
        self.rubric_lists = RubricListsState::Loading;
        self.mark_dirty();
    }

    pub(crate) fn apply_rubric_lists(&mut self, available: Vec<String>, saved: Vec<String>) {
        let options = available
            .into_iter()
            .map(|id| {
                let label = format_rubric_label(&id);
                RubricOption {
                    id,
                    label,
                    selected: false,
                }
            })
            .collect();
        self.rubric_lists = RubricListsState::Loaded { options, saved };
        self.mark_dirty();
    }

    pub(crate) fn apply_rubric_lists_failed(&mut self, message: String) {
        // Neither list renders on partial success; the failure covers both.
        self.rubric_lists = RubricListsState::Failed(message);
        self.mark_dirty();
    }

    pub(crate) fn toggle_rubric(&mut self, id: &str, selected: bool) {
        if let RubricListsState::Loaded { options, .. } = &mut self.rubric_lists {
            if let Some(option) = options.iter_mut().find(|option| option.id == id) {
                if option.selected != selected {
                    option.selected = selected;
                    self.dirty = true;
                }
            }
        }
    }

    /// Selected rubric identifiers in list order.
    pub(crate) fn selected_rubrics(&self) -> Vec<String> {
        match &self.rubric_lists {
            RubricListsState::Loaded { options, .. } => options
                .iter()
                .filter(|option| option.selected)
                .map(|option| option.id.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn set_resume_files(&mut self, files: Vec<PathBuf>) {
        self.resume_files = files;
        self.mark_dirty();
    }

    pub(crate) fn resume_files(&self) -> &[PathBuf] {
        &self.resume_files
    }

    pub(crate) fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(kind, text));
        self.mark_dirty();
    }

    pub(crate) fn set_rubric_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.rubric_status = Some(StatusMessage::new(kind, text));
        self.mark_dirty();
    }

    /// Discards the previous session's results and download link.
    pub(crate) fn clear_session(&mut self) {
        self.files.clear();
        self.download_link = None;
        self.mark_dirty();
    }

    pub(crate) fn begin_streaming(&mut self) {
        self.streaming = true;
        self.mark_dirty();
    }

    pub(crate) fn finish_streaming(&mut self) {
        self.streaming = false;
        self.mark_dirty();
    }

    /// Applies one stream record to per-file state, in receipt order.
    pub(crate) fn apply_record(&mut self, record: StreamRecord) {
        if let Some(link) = record.download_link {
            // A later record with a link replaces the earlier one.
            self.download_link = Some(link);
        }

        if let Some(filename) = record.filename {
            let idx = match self.files.iter().position(|file| file.filename == filename) {
                Some(idx) => idx,
                None => {
                    self.files.push(FileProgress::new(filename));
                    self.files.len() - 1
                }
            };
            let file = &mut self.files[idx];

            if record.status == Some(RecordStatus::Start) {
                file.phase = FilePhase::Evaluating;
            }
            if let Some(fragment) = record.partial {
                // Fragments arriving after a terminal outcome are dropped.
                if file.outcome.is_none() {
                    file.partial_log.push_str(&fragment);
                }
            }
            if let Some(verdict) = record.verdict {
                file.partial_log.clear();
                file.outcome = Some(FileOutcome::Verdict {
                    verdict,
                    reasons: record.reasons.unwrap_or_default(),
                });
            }
            if let Some(error) = record.error {
                file.partial_log.clear();
                file.outcome = Some(FileOutcome::Error(error));
            }
        }

        self.mark_dirty();
    }

    pub(crate) fn set_rubric_name(&mut self, name: String) {
        self.rubric_name = name;
        self.mark_dirty();
    }

    pub(crate) fn rubric_name(&self) -> &str {
        &self.rubric_name
    }

    pub(crate) fn set_rubric_file(&mut self, file: PathBuf) {
        self.rubric_file = Some(file);
        self.mark_dirty();
    }

    pub(crate) fn rubric_file(&self) -> Option<&PathBuf> {
        self.rubric_file.as_ref()
    }

    pub(crate) fn begin_rubric_upload(&mut self) {
        self.rubric_uploading = true;
        self.mark_dirty();
    }

    pub(crate) fn finish_rubric_upload(&mut self) {
        self.rubric_uploading = false;
        self.mark_dirty();
    }

    pub(crate) fn reset_rubric_form(&mut self) {
        self.rubric_name.clear();
        self.rubric_file = None;
        self.mark_dirty();
    }

    /// Advances transient status lifetimes by one tick.
    pub(crate) fn tick(&mut self) {
        let mut changed = tick_status(&mut self.status);
        changed |= tick_status(&mut self.rubric_status);
        if changed {
            self.mark_dirty();
        }
    }
}

fn tick_status(slot: &mut Option<StatusMessage>) -> bool {
    let expire = match slot {
        Some(StatusMessage {
            ttl_ticks: Some(ttl),
            ..
        }) => {
            if *ttl > 1 {
                *ttl -= 1;
                false
            } else {
                true
            }
        }
        _ => false,
    };
    if expire {
        *slot = None;
    }
    expire
}

fn status_line(message: &StatusMessage) -> StatusLine {
    StatusLine {
        text: message.text.clone(),
        kind: message.kind,
    }
}

fn file_row(file: &FileProgress) -> FileRowView {
    let body = match &file.outcome {
        Some(FileOutcome::Verdict { verdict, reasons }) => FileBodyView::Verdict {
            verdict: verdict.clone(),
            reasons: reasons.clone(),
        },
        Some(FileOutcome::Error(message)) => FileBodyView::Error(message.clone()),
        None => FileBodyView::InProgress {
            phase: file.phase,
            log: file.partial_log.clone(),
        },
    };
    FileRowView {
        filename: file.filename.clone(),
        body,
    }
}
