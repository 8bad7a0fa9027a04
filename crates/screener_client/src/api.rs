use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;

use crate::report::write_report;
use crate::stream::RecordDecoder;
use crate::types::{ApiError, ClientEvent, EventRecord, FailureKind, RubricLists};

const RUBRIC_OPTIONS_PATH: &str = "/resume/rubrics";
const SAVED_RUBRICS_PATH: &str = "/rubric/list";
const RUBRIC_UPLOAD_PATH: &str = "/rubric";
const EVALUATE_PATH: &str = "/resume/langchain-stream";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applied to the single-shot endpoints. The evaluation stream stays open
    /// for the whole batch and only honors the connect timeout.
    pub request_timeout: Duration,
    /// Resume files beyond this cap are silently never sent.
    pub max_files: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_files: 10,
        }
    }
}

/// Receives records as the evaluation stream completes them.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: EventRecord);
}

pub struct ChannelRecordSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelRecordSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl RecordSink for ChannelRecordSink {
    fn emit(&self, record: EventRecord) {
        let _ = self.tx.send(ClientEvent::Record(record));
    }
}

/// HTTP seam to the screening service.
#[async_trait::async_trait]
pub trait ScreeningApi: Send + Sync {
    /// Uploads a resume batch and streams evaluation records into `sink`.
    async fn evaluate_resumes(
        &self,
        rubric_names: &[String],
        files: &[PathBuf],
        sink: &dyn RecordSink,
    ) -> Result<(), ApiError>;

    /// Fetches both rubric lists; fails when either request fails.
    async fn rubric_lists(&self) -> Result<RubricLists, ApiError>;

    /// Uploads one rubric advertisement; returns the server status text.
    async fn upload_rubric(&self, name: &str, file: &Path) -> Result<String, ApiError>;

    /// Downloads the aggregate report behind `link` into `dest_dir`.
    async fn download_report(&self, link: &str, dest_dir: &Path) -> Result<PathBuf, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpScreeningApi {
    settings: ClientSettings,
}

impl HttpScreeningApi {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        let base = reqwest::Url::parse(&self.settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        base.join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct RubricUploadResponse {
    status: String,
}

#[async_trait::async_trait]
impl ScreeningApi for HttpScreeningApi {
    async fn evaluate_resumes(
        &self,
        rubric_names: &[String],
        files: &[PathBuf],
        sink: &dyn RecordSink,
    ) -> Result<(), ApiError> {
        let client = self.build_client()?;
        let form = resume_form(rubric_names, files, self.settings.max_files).await?;

        let response = client
            .post(self.endpoint(EVALUATE_PATH)?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::StreamingUnavailable {
                    status: Some(status.as_u16()),
                },
                status.to_string(),
            ));
        }

        let mut decoder = RecordDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            for record in decoder.push(&chunk) {
                sink.emit(record);
            }
        }
        for record in decoder.finish() {
            sink.emit(record);
        }
        Ok(())
    }

    async fn rubric_lists(&self) -> Result<RubricLists, ApiError> {
        let client = self.build_client()?;
        let timeout = self.settings.request_timeout;
        let (available, saved) = tokio::try_join!(
            fetch_name_list(&client, self.endpoint(RUBRIC_OPTIONS_PATH)?, timeout),
            fetch_name_list(&client, self.endpoint(SAVED_RUBRICS_PATH)?, timeout),
        )?;
        Ok(RubricLists { available, saved })
    }

    async fn upload_rubric(&self, name: &str, file: &Path) -> Result<String, ApiError> {
        let client = self.build_client()?;
        let form = reqwest::multipart::Form::new()
            .text("name", name.to_string())
            .part("rubric", file_part(file).await?);

        // Rubric extraction runs a model pass server-side; no request timeout.
        let response = client
            .post(self.endpoint(RUBRIC_UPLOAD_PATH)?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body: RubricUploadResponse = response
            .json()
            .await
            .map_err(|err| ApiError::new(FailureKind::MalformedResponse, err.to_string()))?;
        if status.is_success() {
            Ok(body.status)
        } else {
            Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                body.status,
            ))
        }
    }

    async fn download_report(&self, link: &str, dest_dir: &Path) -> Result<PathBuf, ApiError> {
        let client = self.build_client()?;
        let response = client
            .get(self.endpoint(link)?)
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let filename = link
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("report.xlsx")
            .to_string();
        let bytes: bytes::Bytes = response.bytes().await.map_err(map_reqwest_error)?;
        write_report(dest_dir, &filename, &bytes)
    }
}

async fn resume_form(
    rubric_names: &[String],
    files: &[PathBuf],
    max_files: usize,
) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for name in rubric_names {
        form = form.text("rubric_names[]", name.clone());
    }
    // Files beyond the cap are silently never sent.
    for path in files.iter().take(max_files) {
        form = form.part("resumes", file_part(path).await?);
    }
    Ok(form)
}

async fn file_part(path: &Path) -> Result<reqwest::multipart::Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        ApiError::new(
            FailureKind::FileRead {
                path: path.display().to_string(),
            },
            err.to_string(),
        )
    })?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    Ok(reqwest::multipart::Part::bytes(bytes).file_name(filename))
}

async fn fetch_name_list(
    client: &reqwest::Client,
    url: reqwest::Url,
    timeout: Duration,
) -> Result<Vec<String>, ApiError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(map_reqwest_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    response
        .json::<Vec<String>>()
        .await
        .map_err(|err| ApiError::new(FailureKind::MalformedResponse, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
