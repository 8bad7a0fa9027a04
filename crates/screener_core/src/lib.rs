//! Screener core: pure UI state machine and view-model helpers.
mod effect;
mod msg;
mod rubric;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, RecordStatus, StreamRecord};
pub use rubric::{format_rubric_label, RubricOption};
pub use state::{AppState, FilePhase, StatusKind, View, TICK_INTERVAL_MS};
pub use update::update;
pub use view_model::{
    file_info_label, AppViewModel, FileBodyView, FileRowView, RubricListsView, StatusLine,
};
