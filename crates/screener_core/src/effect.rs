use std::path::PathBuf;

/// IO requests returned by `update`; the shell executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch both rubric lists concurrently (all-or-nothing).
    LoadRubricLists,
    /// Upload the resume batch and consume the evaluation stream.
    SubmitResumes {
        rubric_names: Vec<String>,
        files: Vec<PathBuf>,
    },
    /// Upload one rubric advertisement under the given name.
    UploadRubric { name: String, file: PathBuf },
}
