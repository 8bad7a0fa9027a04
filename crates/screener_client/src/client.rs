use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use crate::api::{ChannelRecordSink, ClientSettings, HttpScreeningApi, ScreeningApi};
use crate::types::ClientEvent;

enum ClientCommand {
    LoadRubricLists,
    SubmitResumes {
        rubric_names: Vec<String>,
        files: Vec<PathBuf>,
    },
    UploadRubric {
        name: String,
        file: PathBuf,
    },
    DownloadReport {
        link: String,
        dest_dir: PathBuf,
    },
}

/// Handle to the background IO runtime.
///
/// Commands go in over a channel and `ClientEvent`s come back out; the shell
/// polls with `try_recv`. One submission runs as a single task, so its records
/// arrive in byte-stream completion order.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let api = Arc::new(HttpScreeningApi::new(settings));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn load_rubric_lists(&self) {
        let _ = self.cmd_tx.send(ClientCommand::LoadRubricLists);
    }

    pub fn submit_resumes(&self, rubric_names: Vec<String>, files: Vec<PathBuf>) {
        let _ = self.cmd_tx.send(ClientCommand::SubmitResumes {
            rubric_names,
            files,
        });
    }

    pub fn upload_rubric(&self, name: impl Into<String>, file: PathBuf) {
        let _ = self.cmd_tx.send(ClientCommand::UploadRubric {
            name: name.into(),
            file,
        });
    }

    pub fn download_report(&self, link: impl Into<String>, dest_dir: PathBuf) {
        let _ = self.cmd_tx.send(ClientCommand::DownloadReport {
            link: link.into(),
            dest_dir,
        });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    api: &dyn ScreeningApi,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::LoadRubricLists => {
            let _ = event_tx.send(ClientEvent::RubricLists(api.rubric_lists().await));
        }
        ClientCommand::SubmitResumes {
            rubric_names,
            files,
        } => {
            let sink = ChannelRecordSink::new(event_tx.clone());
            let event = match api.evaluate_resumes(&rubric_names, &files, &sink).await {
                Ok(()) => ClientEvent::StreamFinished,
                Err(err) => ClientEvent::StreamFailed(err),
            };
            let _ = event_tx.send(event);
        }
        ClientCommand::UploadRubric { name, file } => {
            let result = api.upload_rubric(&name, &file).await;
            let _ = event_tx.send(ClientEvent::RubricUploaded(result));
        }
        ClientCommand::DownloadReport { link, dest_dir } => {
            let result = api.download_report(&link, &dest_dir).await;
            let _ = event_tx.send(ClientEvent::ReportSaved(result));
        }
    }
}
