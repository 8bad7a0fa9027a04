use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use screener_client::{
    ClientSettings, EventRecord, FailureKind, HttpScreeningApi, RecordSink, ScreeningApi,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

impl TestSink {
    fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Vec<EventRecord> {
        self.records.lock().unwrap().drain(..).collect()
    }
}

impl RecordSink for TestSink {
    fn emit(&self, record: EventRecord) {
        self.records.lock().unwrap().push(record);
    }
}

fn api_for(server: &MockServer) -> HttpScreeningApi {
    HttpScreeningApi::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
}

fn fake_resume(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4 fake resume").unwrap();
    path
}

#[tokio::test]
async fn evaluation_stream_yields_records_in_order() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"filename\": \"cv.pdf\", \"status\": \"start\"}\n\n",
        "data: {\"filename\": \"cv.pdf\", \"partial\": \"Good fit\"}\n\n",
        "data: {\"filename\": \"cv.pdf\", \"verdict\": \"Accepted\", \"reasons\": []}\n\n",
        "data: {\"download_link\": \"/resume/download-report/r.xlsx\"}\n\n",
        "event: end\ndata: done\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/resume/langchain-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cv = fake_resume(dir.path(), "cv.pdf");

    let api = api_for(&server);
    let sink = TestSink::new();
    api.evaluate_resumes(&["PAFIAST_School_of_Engineering".to_string()], &[cv], &sink)
        .await
        .expect("stream ok");

    let records = sink.take();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].filename.as_deref(), Some("cv.pdf"));
    assert_eq!(records[0].status.as_deref(), Some("start"));
    assert_eq!(records[1].partial.as_deref(), Some("Good fit"));
    assert_eq!(records[2].verdict.as_deref(), Some("Accepted"));
    assert_eq!(records[2].reasons, Some(Vec::new()));
    assert_eq!(
        records[3].download_link.as_deref(),
        Some("/resume/download-report/r.xlsx")
    );
}

#[tokio::test]
async fn at_most_ten_resumes_are_submitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/resume/langchain-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/event-stream"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let files: Vec<_> = (0..12)
        .map(|i| fake_resume(dir.path(), &format!("cv{i:02}.pdf")))
        .collect();

    let api = api_for(&server);
    let sink = TestSink::new();
    api.evaluate_resumes(
        &["A_One".to_string(), "B_Two".to_string()],
        &files,
        &sink,
    )
    .await
    .expect("submit ok");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);

    assert_eq!(body.matches("name=\"resumes\"").count(), 10);
    assert_eq!(body.matches("name=\"rubric_names[]\"").count(), 2);
    // Rubric order in the body follows selection order.
    assert!(body.find("A_One").unwrap() < body.find("B_Two").unwrap());
    // Files 11 and 12 never leave the machine.
    assert!(body.contains("cv00.pdf") && body.contains("cv09.pdf"));
    assert!(!body.contains("cv10.pdf") && !body.contains("cv11.pdf"));
}

#[tokio::test]
async fn non_success_status_means_streaming_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/resume/langchain-stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cv = fake_resume(dir.path(), "cv.pdf");

    let api = api_for(&server);
    let sink = TestSink::new();
    let err = api
        .evaluate_resumes(&["A_One".to_string()], &[cv], &sink)
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        FailureKind::StreamingUnavailable { status: Some(500) }
    );
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn unreadable_resume_fails_before_any_request() {
    let server = MockServer::start().await;
    let api = api_for(&server);
    let sink = TestSink::new();

    let err = api
        .evaluate_resumes(
            &["A_One".to_string()],
            &["does-not-exist.pdf".into()],
            &sink,
        )
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FailureKind::FileRead { .. }));
    assert!(server
        .received_requests()
        .await
        .expect("recording enabled")
        .is_empty());
}
