use screener_core::{update, AppState, Msg, StatusKind, TICK_INTERVAL_MS};

const FIVE_SECONDS_OF_TICKS: u32 = (5_000 / TICK_INTERVAL_MS) as u32;

fn tick_times(mut state: AppState, count: u32) -> AppState {
    for _ in 0..count {
        let (next, effects) = update(state, Msg::Tick);
        assert!(effects.is_empty());
        state = next;
    }
    state
}

#[test]
fn success_status_clears_after_five_seconds_of_ticks() {
    let (state, _) = update(AppState::new(), Msg::StreamCompleted);
    assert_eq!(
        state.view().status.expect("status line").kind,
        StatusKind::Success
    );

    let state = tick_times(state, FIVE_SECONDS_OF_TICKS - 1);
    assert!(state.view().status.is_some());

    let mut state = tick_times(state, 1);
    assert_eq!(state.view().status, None);
    assert!(state.consume_dirty());
}

#[test]
fn error_status_persists_through_ticks() {
    let (state, _) = update(
        AppState::new(),
        Msg::StreamFailed("connection reset".to_string()),
    );
    let state = tick_times(state, FIVE_SECONDS_OF_TICKS * 3);

    let status = state.view().status.expect("status line");
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "Error: connection reset");
}

#[test]
fn rubric_success_status_also_expires() {
    let (state, _) = update(
        AppState::new(),
        Msg::RubricNameChanged("pafiast".to_string()),
    );
    let (state, _) = update(state, Msg::RubricFileChosen("ad.pdf".into()));
    let (state, _) = update(state, Msg::RubricSubmitted);
    let (state, _) = update(
        state,
        Msg::RubricUploadCompleted {
            accepted: true,
            status: "Rubrics saved".to_string(),
        },
    );

    let state = tick_times(state, FIVE_SECONDS_OF_TICKS);
    assert_eq!(state.view().rubric_status, None);
}
