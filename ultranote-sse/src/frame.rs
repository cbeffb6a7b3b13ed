//! Line classification and frame payloads.

/// Prefix of an event-data line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks intentional end of content.
pub const DONE_SENTINEL: &str = "[DONE]";

/// SSE field names other than the `data: ` form we consume.
const FIELD_NAMES: [&str; 4] = ["data", "event", "id", "retry"];

/// Classification of one complete line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace only. Separates SSE events.
    Blank,
    /// Starts with `:`. Keep-alive or comment.
    Comment,
    /// Starts with `data: `; carries the text after the prefix.
    Data(&'a str),
    /// Any other SSE field line (`event:`, `id:`, `retry:`, bare `data:`).
    Field,
    /// Anything else.
    Other,
}

/// Classify a line that has already had its line terminator removed.
#[must_use]
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with(':') {
        return LineKind::Comment;
    }
    if let Some(data) = line.strip_prefix(DATA_PREFIX) {
        return LineKind::Data(data);
    }
    let is_field = line.split_once(':').is_some_and(|(name, _)| FIELD_NAMES.contains(&name))
        || FIELD_NAMES.contains(&line);
    if is_field {
        LineKind::Field
    } else {
        LineKind::Other
    }
}

/// The payload of an event-data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// The `[DONE]` sentinel.
    Done,
    /// Anything else. Expected to be JSON.
    Payload(&'a str),
}

/// Trim a data payload and recognise the sentinel.
#[must_use]
pub fn parse_frame(data: &str) -> Frame<'_> {
    let trimmed = data.trim();
    if trimmed == DONE_SENTINEL {
        Frame::Done
    } else {
        Frame::Payload(trimmed)
    }
}

/// A parsed chat-completion chunk.
///
/// Kept as a [`serde_json::Value`] so that chunks with unexpected shapes
/// still parse; accessors return `None` for anything missing or mistyped.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaEvent {
    value: serde_json::Value,
}

impl DeltaEvent {
    /// Parse a frame payload.
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload).map(|value| Self { value })
    }

    /// `choices[0].delta.content`, if it is a non-empty string.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.value["choices"][0]["delta"]["content"]
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// `choices[0].finish_reason`, if present.
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.value["choices"][0]["finish_reason"].as_str()
    }

    /// Message of an in-band error object, e.g. `{"error":{"message":"..."}}`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        let error = self.value.get("error")?;
        error["message"].as_str().or_else(|| error.as_str())
    }
}
