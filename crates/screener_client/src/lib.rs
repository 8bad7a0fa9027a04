//! Screener client: HTTP transport and evaluation-stream ingest.
mod api;
mod client;
mod report;
mod stream;
mod types;

pub use api::{ChannelRecordSink, ClientSettings, HttpScreeningApi, RecordSink, ScreeningApi};
pub use client::ClientHandle;
pub use stream::{parse_record_segment, RecordDecoder, RecordParseError};
pub use types::{ApiError, ClientEvent, EventRecord, FailureKind, RubricLists};
