//! Synchronous SSE decoder: bytes in, text increments out.

use crate::frame::{DeltaEvent, Frame, LineKind, classify_line, parse_frame};
use crate::line::LineBuffer;
use crate::utf8::Utf8Decoder;

/// Largest unparseable frame held while waiting for continuation lines.
pub const MAX_PENDING_FRAME_BYTES: usize = 1_048_576; // 1 MB

/// Counters reported when a decoder finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Increments emitted.
    pub increments: usize,
    /// Frames discarded because they never parsed as JSON.
    pub dropped_frames: usize,
    /// Whether the `[DONE]` sentinel was seen. `false` means premature EOF,
    /// which is still a normal completion.
    pub saw_done: bool,
}

/// Decodes one SSE response body.
///
/// Feed chunks in arrival order with [`feed`](Self::feed), then call
/// [`finish`](Self::finish) once the transport reports end of data. `finish`
/// consumes the decoder; a new stream needs a new decoder.
///
/// A data line whose payload does not parse is held as a pending fragment.
/// If the next line is a bare continuation (not blank, not a comment, not an
/// SSE field) it is joined on and parsing is retried. Any other next line,
/// end of input, or growth past [`MAX_PENDING_FRAME_BYTES`] drops the
/// fragment.
#[derive(Debug, Default)]
pub struct Decoder {
    utf8: Utf8Decoder,
    lines: LineBuffer,
    pending: Option<String>,
    summary: DecodeSummary,
}

impl Decoder {
    /// Create a decoder for a new stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one raw chunk and return the increments it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(chunk);
        self.lines.push(&text);

        let mut out = Vec::new();
        while let Some(line) = self.lines.next_line() {
            self.process_line(&line, &mut out);
        }
        out
    }

    /// End of data: process whatever is still buffered as a final line.
    pub fn finish(mut self) -> (Vec<String>, DecodeSummary) {
        let tail = self.utf8.finish();
        self.lines.push(&tail);

        let mut out = Vec::new();
        while let Some(line) = self.lines.next_line() {
            self.process_line(&line, &mut out);
        }
        if let Some(rest) = self.lines.take_remainder() {
            self.process_line(&rest, &mut out);
        }
        if let Some(fragment) = self.pending.take() {
            self.drop_fragment(&fragment, "stream ended before frame completed");
        }

        (out, self.summary)
    }

    /// Counters so far.
    #[must_use]
    pub fn summary(&self) -> DecodeSummary {
        self.summary
    }

    /// Whether an unparseable frame is waiting for more data.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    fn process_line(&mut self, line: &str, out: &mut Vec<String>) {
        let kind = classify_line(line);

        if let Some(mut fragment) = self.pending.take() {
            if kind == LineKind::Other {
                fragment.push('\n');
                fragment.push_str(line);
                self.try_payload(fragment, out);
                return;
            }
            self.drop_fragment(&fragment, "frame terminated without valid JSON");
        }

        match kind {
            LineKind::Data(data) => match parse_frame(data) {
                Frame::Done => {
                    tracing::trace!("received [DONE] sentinel");
                    self.summary.saw_done = true;
                }
                Frame::Payload(payload) => self.try_payload(payload.to_string(), out),
            },
            LineKind::Other => {
                tracing::trace!(line_len = line.len(), "ignoring non-data line");
            }
            LineKind::Blank | LineKind::Comment | LineKind::Field => {}
        }
    }

    fn try_payload(&mut self, payload: String, out: &mut Vec<String>) {
        match DeltaEvent::parse(&payload) {
            Ok(event) => self.accept(&event, out),
            Err(err) if payload.len() > MAX_PENDING_FRAME_BYTES => {
                tracing::debug!(error = %err, "pending frame exceeded size limit");
                self.drop_fragment(&payload, "frame exceeded size limit");
            }
            Err(err) => {
                tracing::trace!(error = %err, len = payload.len(), "holding incomplete frame");
                self.pending = Some(payload);
            }
        }
    }

    fn accept(&mut self, event: &DeltaEvent, out: &mut Vec<String>) {
        if let Some(reason) = event.error_message() {
            tracing::warn!(reason, "stream carried an error payload");
            return;
        }
        if let Some(finish_reason) = event.finish_reason() {
            tracing::trace!(finish_reason, "choice finished");
        }
        if let Some(content) = event.content() {
            self.summary.increments += 1;
            out.push(content.to_string());
        }
    }

    fn drop_fragment(&mut self, fragment: &str, reason: &'static str) {
        tracing::debug!(reason, len = fragment.len(), "dropping malformed frame");
        self.summary.dropped_frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(content: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
    }

    fn decode_chunks(chunks: &[&[u8]]) -> (Vec<String>, DecodeSummary) {
        let mut decoder = Decoder::new();
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(decoder.feed(chunk));
        }
        let (tail, summary) = decoder.finish();
        out.extend(tail);
        (out, summary)
    }

    #[test]
    fn hello_world_then_done() {
        let body = format!("{}{}data: [DONE]\n", delta("Hello"), delta(" world"));
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["Hello", " world"]);
        assert_eq!(out.concat(), "Hello world");
        assert!(summary.saw_done);
        assert_eq!(summary.increments, 2);
        assert_eq!(summary.dropped_frames, 0);
    }

    #[test]
    fn comments_and_blank_lines_only() {
        let (out, summary) = decode_chunks(&[b": ping\n\n: OPENROUTER PROCESSING\r\n\n"]);
        assert!(out.is_empty());
        assert_eq!(summary, DecodeSummary::default());
    }

    #[test]
    fn frame_split_mid_json() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(br#"data: {"choices":[{"del"#).is_empty());
        let out = decoder.feed(b"ta\":{\"content\":\"X\"}}]}\n");
        assert_eq!(out, vec!["X"]);
        let (tail, summary) = decoder.finish();
        assert!(tail.is_empty());
        assert_eq!(summary.increments, 1);
    }

    #[test]
    fn never_completed_frame_is_dropped() {
        let (out, summary) = decode_chunks(&[b"data: not-json\n"]);
        assert!(out.is_empty());
        assert_eq!(summary.dropped_frames, 1);
        assert!(!summary.saw_done);
    }

    #[test]
    fn invalid_frame_does_not_block_later_frames() {
        let body = format!("data: not-json\n\n{}{}", delta("a"), delta("b"));
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["a", "b"]);
        assert_eq!(summary.dropped_frames, 1);
    }

    #[test]
    fn invalid_frame_followed_directly_by_data_line() {
        let body = format!("data: {{\"choices\":[\n{}", delta("ok"));
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["ok"]);
        assert_eq!(summary.dropped_frames, 1);
    }

    #[test]
    fn frame_broken_by_newline_is_rejoined() {
        let body = "data: {\"choices\":[{\"delta\":\n{\"content\":\"joined\"}}]}\n\n";
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["joined"]);
        assert_eq!(summary.dropped_frames, 0);
    }

    #[test]
    fn pending_fragment_has_no_pending_after_success() {
        let mut decoder = Decoder::new();
        decoder.feed(b"data: {\"choices\":\n");
        assert!(decoder.has_pending_frame());
        decoder.feed(b"[{\"delta\":{\"content\":\"z\"}}]}\n");
        assert!(!decoder.has_pending_frame());
        assert_eq!(decoder.summary().increments, 1);
    }

    #[test]
    fn oversized_fragment_is_dropped() {
        let mut decoder = Decoder::new();
        decoder.feed(b"data: {\"choices\":\"");
        let filler = vec![b'x'; MAX_PENDING_FRAME_BYTES];
        decoder.feed(&filler);
        decoder.feed(b"\n");
        assert!(!decoder.has_pending_frame());
        let (out, summary) = decoder.finish();
        assert!(out.is_empty());
        assert_eq!(summary.dropped_frames, 1);
    }

    #[test]
    fn trailing_line_without_newline_is_processed() {
        let body = delta("tail");
        let body = body.trim_end_matches('\n');
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["tail"]);
        assert!(!summary.saw_done);
    }

    #[test]
    fn done_without_newline_at_eof() {
        let body = format!("{}data: [DONE]", delta("x"));
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["x"]);
        assert!(summary.saw_done);
    }

    #[test]
    fn lines_after_done_are_still_read() {
        let body = format!("data: [DONE]\n{}", delta("late"));
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["late"]);
        assert!(summary.saw_done);
    }

    #[test]
    fn crlf_framing() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"r\"}}]}\r\n\r\ndata: [DONE]\r\n";
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["r"]);
        assert!(summary.saw_done);
    }

    #[test]
    fn ignores_role_only_and_finish_chunks() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"},\"finish_reason\":null}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"<h1>\"},\"finish_reason\":null}]}\n\n",
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );
        let (out, summary) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["<h1>"]);
        assert_eq!(summary.dropped_frames, 0);
    }

    #[test]
    fn error_payload_produces_no_increment() {
        let body = format!(
            "{}data: {{\"error\":{{\"message\":\"overloaded\"}}}}\n{}",
            delta("a"),
            delta("b")
        );
        let (out, _) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn event_and_id_fields_are_ignored() {
        let body = format!("event: message\nid: 7\n{}", delta("v"));
        let (out, _) = decode_chunks(&[body.as_bytes()]);
        assert_eq!(out, vec!["v"]);
    }

    #[test]
    fn multibyte_content_split_across_chunks() {
        let body = delta("naïve ☕ 🦀");
        let bytes = body.as_bytes();
        let split = body.find('☕').unwrap() + 1;
        let (out, _) = decode_chunks(&[&bytes[..split], &bytes[split..]]);
        assert_eq!(out.concat(), "naïve ☕ 🦀");
    }

    #[test]
    fn independent_decoders_agree() {
        let body = format!("{}: ka\n{}data: [DONE]\n", delta("same"), delta(" output"));
        let first = decode_chunks(&[body.as_bytes()]);
        let second = decode_chunks(&[body.as_bytes()]);
        assert_eq!(first, second);
    }
}
