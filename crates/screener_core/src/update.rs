use crate::{AppState, Effect, Msg, StatusKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            state.begin_rubric_lists_load();
            vec![Effect::LoadRubricLists]
        }
        Msg::ViewSelected(view) => {
            state.set_view(view);
            Vec::new()
        }
        Msg::RubricListsLoaded { available, saved } => {
            state.apply_rubric_lists(available, saved);
            Vec::new()
        }
        Msg::RubricListsFailed(message) => {
            state.apply_rubric_lists_failed(message);
            Vec::new()
        }
        Msg::RubricToggled { id, selected } => {
            state.toggle_rubric(&id, selected);
            Vec::new()
        }
        Msg::ResumeFilesChosen(files) => {
            state.set_resume_files(files);
            Vec::new()
        }
        Msg::ResumesSubmitted => {
            // The previous session's results clear even when validation fails.
            state.clear_session();
            state.set_status(StatusKind::Info, "Checking resumes...");
            let rubric_names = state.selected_rubrics();
            let files = state.resume_files().to_vec();
            if rubric_names.is_empty() || files.is_empty() {
                state.set_status(
                    StatusKind::Error,
                    "Please select at least one rubric and upload resumes.",
                );
                Vec::new()
            } else {
                state.begin_streaming();
                vec![Effect::SubmitResumes {
                    rubric_names,
                    files,
                }]
            }
        }
        Msg::RecordReceived(record) => {
            state.apply_record(record);
            Vec::new()
        }
        Msg::StreamCompleted => {
            state.finish_streaming();
            state.set_status(StatusKind::Success, "Resume evaluation completed.");
            Vec::new()
        }
        Msg::StreamFailed(message) => {
            state.finish_streaming();
            state.set_status(StatusKind::Error, format!("Error: {message}"));
            Vec::new()
        }
        Msg::RubricNameChanged(name) => {
            state.set_rubric_name(name);
            Vec::new()
        }
        Msg::RubricFileChosen(file) => {
            state.set_rubric_file(file);
            Vec::new()
        }
        Msg::RubricSubmitted => {
            let name = state.rubric_name().trim().to_string();
            match state.rubric_file().cloned() {
                Some(file) if !name.is_empty() => {
                    state.begin_rubric_upload();
                    state.set_rubric_status(StatusKind::Info, "Uploading...");
                    vec![Effect::UploadRubric { name, file }]
                }
                _ => {
                    state.set_rubric_status(
                        StatusKind::Error,
                        "Please enter a name and select a file",
                    );
                    Vec::new()
                }
            }
        }
        Msg::RubricUploadCompleted { accepted, status } => {
            state.finish_rubric_upload();
            if accepted {
                state.reset_rubric_form();
                state.set_rubric_status(StatusKind::Success, status);
                state.begin_rubric_lists_load();
                vec![Effect::LoadRubricLists]
            } else {
                state.set_rubric_status(StatusKind::Error, status);
                Vec::new()
            }
        }
        Msg::Tick => {
            state.tick();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
