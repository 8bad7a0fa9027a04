use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::bail;
use client_logging::{client_info, client_warn};
use screener_client::{ClientEvent, ClientHandle, ClientSettings, EventRecord};
use screener_core::{
    update, AppState, AppViewModel, Effect, Msg, RecordStatus, RubricListsView, StatusKind,
    StatusLine, StreamRecord, TICK_INTERVAL_MS,
};

use crate::cli::{Cli, Command};
use crate::render::Renderer;

pub fn run(args: Cli) -> anyhow::Result<()> {
    let settings = ClientSettings {
        base_url: args.server.clone(),
        ..ClientSettings::default()
    };
    let client = ClientHandle::new(settings);
    let mut session = Session::new(&client);

    match args.command {
        Command::Rubrics => run_rubrics(&mut session),
        Command::AddRubric { name, file } => run_add_rubric(&mut session, name, file),
        Command::Check {
            rubrics,
            files,
            report_dir,
        } => run_check(&mut session, rubrics, files, report_dir),
    }
}

/// One command's worth of state-machine driving: owns the core state, maps
/// client events to messages, and executes effects against the handle.
struct Session<'a> {
    state: AppState,
    client: &'a ClientHandle,
    renderer: Renderer,
    report: Option<Result<PathBuf, String>>,
}

impl<'a> Session<'a> {
    fn new(client: &'a ClientHandle) -> Self {
        Self {
            state: AppState::new(),
            client,
            renderer: Renderer::new(),
            report: None,
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.renderer.render(&state.view())?;
        }
        self.state = state;
        self.run_effects(effects);
        Ok(())
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadRubricLists => self.client.load_rubric_lists(),
                Effect::SubmitResumes {
                    rubric_names,
                    files,
                } => {
                    client_info!(
                        "submitting {} file(s) against {} rubric(s)",
                        files.len(),
                        rubric_names.len()
                    );
                    self.client.submit_resumes(rubric_names, files);
                }
                Effect::UploadRubric { name, file } => {
                    client_info!("uploading rubric '{}'", name);
                    self.client.upload_rubric(name, file);
                }
            }
        }
    }

    fn apply_event(&mut self, event: ClientEvent) -> anyhow::Result<()> {
        match event {
            ClientEvent::ReportSaved(result) => {
                self.report = Some(result.map_err(|err| err.to_string()));
                Ok(())
            }
            other => self.dispatch(map_event(other)),
        }
    }

    /// Drains client events and ticks until the view satisfies `done`.
    fn pump_until(&mut self, done: impl Fn(&AppViewModel) -> bool) -> anyhow::Result<()> {
        loop {
            let mut saw_event = false;
            while let Some(event) = self.client.try_recv() {
                saw_event = true;
                self.apply_event(event)?;
            }
            if done(&self.view()) {
                return Ok(());
            }
            if !saw_event {
                thread::sleep(Duration::from_millis(TICK_INTERVAL_MS));
                self.dispatch(Msg::Tick)?;
            }
        }
    }

    /// Waits for the report download outcome requested earlier.
    fn pump_until_report(&mut self) -> anyhow::Result<Result<PathBuf, String>> {
        loop {
            if let Some(result) = self.report.take() {
                return Ok(result);
            }
            match self.client.try_recv() {
                Some(event) => self.apply_event(event)?,
                None => thread::sleep(Duration::from_millis(TICK_INTERVAL_MS)),
            }
        }
    }
}

fn run_rubrics(session: &mut Session<'_>) -> anyhow::Result<()> {
    session.dispatch(Msg::Started)?;
    session.pump_until(|view| !matches!(view.rubric_lists, RubricListsView::Loading))?;

    let view = session.view();
    if let RubricListsView::Failed(message) = &view.rubric_lists {
        bail!("{message}");
    }
    session.renderer.render_rubric_lists(&view)?;
    Ok(())
}

fn run_add_rubric(session: &mut Session<'_>, name: String, file: PathBuf) -> anyhow::Result<()> {
    session.dispatch(Msg::Started)?;
    session.dispatch(Msg::RubricNameChanged(name))?;
    session.dispatch(Msg::RubricFileChosen(file))?;
    session.dispatch(Msg::RubricSubmitted)?;

    if !session.view().rubric_uploading {
        // Local validation failed; the status line carries the message.
        bail!("{}", status_text(session.view().rubric_status));
    }
    session.pump_until(|view| !view.rubric_uploading)?;

    let view = session.view();
    if matches!(
        view.rubric_status,
        Some(StatusLine {
            kind: StatusKind::Error,
            ..
        })
    ) {
        bail!("{}", status_text(view.rubric_status));
    }

    // The successful upload triggered a list reload; show the updated lists.
    session.pump_until(|view| !matches!(view.rubric_lists, RubricListsView::Loading))?;
    let view = session.view();
    session.renderer.render_rubric_lists(&view)?;
    Ok(())
}

fn run_check(
    session: &mut Session<'_>,
    rubrics: Vec<String>,
    files: Vec<PathBuf>,
    report_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    session.dispatch(Msg::Started)?;
    session.pump_until(|view| !matches!(view.rubric_lists, RubricListsView::Loading))?;

    let view = session.view();
    if let RubricListsView::Failed(message) = &view.rubric_lists {
        bail!("{message}");
    }
    if let RubricListsView::Loaded { options, .. } = &view.rubric_lists {
        for id in &rubrics {
            if !options.iter().any(|option| option.id == *id) {
                client_warn!("unknown rubric identifier: {id}");
            }
        }
    }

    for id in rubrics {
        session.dispatch(Msg::RubricToggled { id, selected: true })?;
    }
    session.dispatch(Msg::ResumeFilesChosen(files))?;
    session.dispatch(Msg::ResumesSubmitted)?;

    if !session.view().streaming {
        // Local validation failed; no request went out.
        bail!("{}", status_text(session.view().status));
    }
    session.pump_until(|view| !view.streaming)?;

    let view = session.view();
    if let Some(StatusLine {
        kind: StatusKind::Error,
        text,
    }) = view.status
    {
        bail!("{text}");
    }

    if let (Some(dir), Some(link)) = (report_dir, view.download_link) {
        session.client.download_report(link, dir);
        match session.pump_until_report()? {
            Ok(path) => client_info!("report saved to {}", path.display()),
            Err(message) => bail!("report download failed: {message}"),
        }
    }
    Ok(())
}

fn status_text(line: Option<StatusLine>) -> String {
    line.map(|line| line.text)
        .unwrap_or_else(|| "unknown failure".to_string())
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::Record(record) => Msg::RecordReceived(map_record(record)),
        ClientEvent::StreamFinished => Msg::StreamCompleted,
        ClientEvent::StreamFailed(err) => Msg::StreamFailed(err.to_string()),
        ClientEvent::RubricLists(Ok(lists)) => Msg::RubricListsLoaded {
            available: lists.available,
            saved: lists.saved,
        },
        ClientEvent::RubricLists(Err(err)) => {
            client_warn!("rubric list load failed: {err}");
            Msg::RubricListsFailed("Failed to load rubrics".to_string())
        }
        ClientEvent::RubricUploaded(Ok(status)) => Msg::RubricUploadCompleted {
            accepted: true,
            status,
        },
        ClientEvent::RubricUploaded(Err(err)) => Msg::RubricUploadCompleted {
            accepted: false,
            status: err.to_string(),
        },
        // Report outcomes are handled by the session directly.
        ClientEvent::ReportSaved(_) => Msg::NoOp,
    }
}

fn map_record(record: EventRecord) -> StreamRecord {
    StreamRecord {
        filename: record.filename,
        status: record.status.as_deref().and_then(|status| match status {
            "start" => Some(RecordStatus::Start),
            _ => None,
        }),
        partial: record.partial,
        verdict: record.verdict,
        reasons: record.reasons,
        error: record.error,
        download_link: record.download_link,
    }
}
