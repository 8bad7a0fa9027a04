use client_logging::{client_debug, client_warn};
use encoding_rs::{CoderResult, Decoder, UTF_8};

use crate::types::EventRecord;

const RECORD_DELIMITER: &str = "\n\n";
const DATA_PREFIX: &str = "data: ";

/// A complete `data:` payload that was not valid record JSON.
#[derive(Debug, thiserror::Error)]
#[error("malformed record payload: {0}")]
pub struct RecordParseError(#[from] serde_json::Error);

/// Incremental decoder for the `data: <json>\n\n` evaluation stream.
///
/// Bytes arrive in arbitrary-sized chunks with no alignment to record or
/// character boundaries. Decode state carries over between chunks, so a
/// multi-byte character split across chunks comes out intact, and the buffer
/// only ever holds the suffix after the last complete delimiter.
pub struct RecordDecoder {
    decoder: Decoder,
    buffer: String,
}

impl RecordDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            buffer: String::new(),
        }
    }

    /// Feeds one chunk of bytes, returning the records it completed in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<EventRecord> {
        self.decode(chunk, false);
        self.drain_complete_records()
    }

    /// Signals end of stream.
    ///
    /// Records completed by the final decoder flush are returned; an
    /// unterminated trailing fragment is dropped.
    pub fn finish(mut self) -> Vec<EventRecord> {
        self.decode(&[], true);
        let records = self.drain_complete_records();
        if !self.buffer.is_empty() {
            client_debug!(
                "dropping {} bytes of unterminated stream tail",
                self.buffer.len()
            );
        }
        records
    }

    fn decode(&mut self, chunk: &[u8], last: bool) {
        let mut input = chunk;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() + 16);
            self.buffer.reserve(needed);
            let (result, read, _) = self.decoder.decode_to_string(input, &mut self.buffer, last);
            input = &input[read..];
            if matches!(result, CoderResult::InputEmpty) {
                break;
            }
        }
    }

    fn drain_complete_records(&mut self) -> Vec<EventRecord> {
        let mut records = Vec::new();
        while let Some(pos) = self.buffer.find(RECORD_DELIMITER) {
            let segment: String = self
                .buffer
                .drain(..pos + RECORD_DELIMITER.len())
                .collect();
            match parse_record_segment(&segment[..pos]) {
                Some(Ok(record)) => records.push(record),
                // One bad record must not abort the batch.
                Some(Err(err)) => client_warn!("skipping stream record: {err}"),
                None => {}
            }
        }
        records
    }
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses one complete segment between record delimiters.
///
/// Segments without the `data: ` prefix (comments, keep-alives, `event:`
/// framing) and empty payloads yield `None`.
pub fn parse_record_segment(segment: &str) -> Option<Result<EventRecord, RecordParseError>> {
    let payload = segment.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() {
        return None;
    }
    Some(serde_json::from_str(payload).map_err(RecordParseError::from))
}
