use std::sync::Once;

use screener_core::{
    update, AppState, Effect, FileBodyView, FilePhase, Msg, RecordStatus, StreamRecord,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn named(filename: &str) -> StreamRecord {
    StreamRecord {
        filename: Some(filename.to_string()),
        ..StreamRecord::default()
    }
}

fn receive(state: AppState, record: StreamRecord) -> AppState {
    let (state, effects) = update(state, Msg::RecordReceived(record));
    assert!(effects.is_empty());
    state
}

#[test]
fn records_create_rows_in_first_seen_order() {
    init_logging();
    let state = AppState::new();
    let state = receive(state, named("b.pdf"));
    let state = receive(state, named("a.pdf"));
    let mut state = receive(state, named("b.pdf"));

    let view = state.view();
    let names: Vec<_> = view.files.iter().map(|row| row.filename.clone()).collect();
    assert_eq!(names, vec!["b.pdf".to_string(), "a.pdf".to_string()]);
    assert_eq!(
        view.files[0].body,
        FileBodyView::InProgress {
            phase: FilePhase::Starting,
            log: String::new(),
        }
    );
    assert!(state.consume_dirty());
}

#[test]
fn start_status_moves_file_to_evaluating() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            status: Some(RecordStatus::Start),
            ..StreamRecord::default()
        },
    );

    assert_eq!(
        state.view().files[0].body,
        FileBodyView::InProgress {
            phase: FilePhase::Evaluating,
            log: String::new(),
        }
    );
}

#[test]
fn partial_fragments_accumulate_in_order() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            partial: Some("Good ".to_string()),
            ..StreamRecord::default()
        },
    );
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            partial: Some("fit".to_string()),
            ..StreamRecord::default()
        },
    );

    assert_eq!(
        state.view().files[0].body,
        FileBodyView::InProgress {
            phase: FilePhase::Starting,
            log: "Good fit".to_string(),
        }
    );
}

#[test]
fn verdict_supersedes_partial_log() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            status: Some(RecordStatus::Start),
            ..StreamRecord::default()
        },
    );
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            partial: Some("Good ".to_string()),
            ..StreamRecord::default()
        },
    );
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            partial: Some("fit".to_string()),
            ..StreamRecord::default()
        },
    );
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            verdict: Some("Accepted".to_string()),
            reasons: Some(vec!["strong match".to_string()]),
            ..StreamRecord::default()
        },
    );

    assert_eq!(
        state.view().files[0].body,
        FileBodyView::Verdict {
            verdict: "Accepted".to_string(),
            reasons: vec!["strong match".to_string()],
        }
    );
}

#[test]
fn verdict_without_reasons_renders_an_empty_list() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            verdict: Some("Rejected".to_string()),
            ..StreamRecord::default()
        },
    );

    assert_eq!(
        state.view().files[0].body,
        FileBodyView::Verdict {
            verdict: "Rejected".to_string(),
            reasons: Vec::new(),
        }
    );
}

#[test]
fn error_is_terminal_for_that_file_only() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            error: Some("could not read PDF".to_string()),
            ..StreamRecord::default()
        },
    );
    let state = receive(
        state,
        StreamRecord {
            filename: Some("b.pdf".to_string()),
            partial: Some("still going".to_string()),
            ..StreamRecord::default()
        },
    );

    let view = state.view();
    assert_eq!(
        view.files[0].body,
        FileBodyView::Error("could not read PDF".to_string())
    );
    assert_eq!(
        view.files[1].body,
        FileBodyView::InProgress {
            phase: FilePhase::Starting,
            log: "still going".to_string(),
        }
    );
}

#[test]
fn late_partial_after_terminal_outcome_is_ignored() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            verdict: Some("Accepted".to_string()),
            reasons: Some(Vec::new()),
            ..StreamRecord::default()
        },
    );
    let state = receive(
        state,
        StreamRecord {
            filename: Some("a.pdf".to_string()),
            partial: Some("late fragment".to_string()),
            ..StreamRecord::default()
        },
    );

    assert_eq!(
        state.view().files[0].body,
        FileBodyView::Verdict {
            verdict: "Accepted".to_string(),
            reasons: Vec::new(),
        }
    );
}

#[test]
fn download_link_is_replaced_by_later_records() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            download_link: Some("/resume/download-report/first.xlsx".to_string()),
            ..StreamRecord::default()
        },
    );
    // A link-only record creates no file row.
    assert!(state.view().files.is_empty());

    let state = receive(
        state,
        StreamRecord {
            download_link: Some("/resume/download-report/second.xlsx".to_string()),
            ..StreamRecord::default()
        },
    );
    assert_eq!(
        state.view().download_link.as_deref(),
        Some("/resume/download-report/second.xlsx")
    );
}

#[test]
fn new_submission_clears_previous_results() {
    init_logging();
    let state = AppState::new();
    let state = receive(
        state,
        StreamRecord {
            filename: Some("old.pdf".to_string()),
            download_link: Some("/resume/download-report/old.xlsx".to_string()),
            ..StreamRecord::default()
        },
    );
    let (state, _) = update(
        state,
        Msg::RubricListsLoaded {
            available: vec!["PAFIAST_School_of_Engineering".to_string()],
            saved: Vec::new(),
        },
    );
    let (state, _) = update(
        state,
        Msg::RubricToggled {
            id: "PAFIAST_School_of_Engineering".to_string(),
            selected: true,
        },
    );
    let (state, _) = update(
        state,
        Msg::ResumeFilesChosen(vec!["new.pdf".into()]),
    );
    let (state, effects) = update(state, Msg::ResumesSubmitted);

    let view = state.view();
    assert!(view.files.is_empty());
    assert_eq!(view.download_link, None);
    assert!(view.streaming);
    assert_eq!(
        effects,
        vec![Effect::SubmitResumes {
            rubric_names: vec!["PAFIAST_School_of_Engineering".to_string()],
            files: vec!["new.pdf".into()],
        }]
    );
}
