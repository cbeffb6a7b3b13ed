//! Line framing over decoded text.

/// Accumulates decoded text and yields complete lines.
///
/// A line is everything up to a `\n`. The newline and one trailing `\r` are
/// removed. Text after the last newline stays buffered until more arrives
/// or [`take_remainder`](Self::take_remainder) is called at end of input.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: String,
    // Prefix of `buf` already searched and known to hold no newline.
    scanned: usize,
}

impl LineBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append decoded text.
    pub fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Remove and return the next complete line, if one is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let Some(offset) = self.buf[self.scanned..].find('\n') else {
            self.scanned = self.buf.len();
            return None;
        };
        let newline_pos = self.scanned + offset;
        let line = strip_cr(&self.buf[..newline_pos]).to_string();
        self.buf.drain(..=newline_pos);
        self.scanned = 0;
        Some(line)
    }

    /// Take whatever is left as a final, unterminated line.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        self.scanned = 0;
        let rest = std::mem::take(&mut self.buf);
        Some(strip_cr(&rest).to_string())
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_complete_lines_only() {
        let mut lines = LineBuffer::new();
        lines.push("data: a\ndata: b");
        assert_eq!(lines.next_line().as_deref(), Some("data: a"));
        assert_eq!(lines.next_line(), None);
        lines.push("\n");
        assert_eq!(lines.next_line().as_deref(), Some("data: b"));
        assert_eq!(lines.take_remainder(), None);
    }

    #[test]
    fn long_line_in_small_pieces() {
        let payload = "x".repeat(4096);
        let mut lines = LineBuffer::new();
        for piece in payload.as_bytes().chunks(7) {
            lines.push(std::str::from_utf8(piece).unwrap());
            assert_eq!(lines.next_line(), None);
            assert_eq!(lines.scanned, lines.buf.len());
        }
        lines.push("\nnext");
        assert_eq!(lines.next_line().as_deref(), Some(payload.as_str()));
        assert_eq!(lines.next_line(), None);
        lines.push("\n");
        assert_eq!(lines.next_line().as_deref(), Some("next"));
    }

    #[test]
    fn newline_in_earlier_push_is_found_after_failed_scan() {
        let mut lines = LineBuffer::new();
        lines.push("a\nb");
        assert_eq!(lines.next_line().as_deref(), Some("a"));
        assert_eq!(lines.next_line(), None);
        lines.push("c\nd\n");
        assert_eq!(lines.next_line().as_deref(), Some("bc"));
        assert_eq!(lines.next_line().as_deref(), Some("d"));
        assert_eq!(lines.next_line(), None);
    }

    #[test]
    fn strips_crlf() {
        let mut lines = LineBuffer::new();
        lines.push("data: x\r\n\r\n");
        assert_eq!(lines.next_line().as_deref(), Some("data: x"));
        assert_eq!(lines.next_line().as_deref(), Some(""));
        assert_eq!(lines.next_line(), None);
    }

    #[test]
    fn only_one_trailing_cr_is_removed() {
        let mut lines = LineBuffer::new();
        lines.push("x\r\r\n");
        assert_eq!(lines.next_line().as_deref(), Some("x\r"));
    }

    #[test]
    fn remainder_is_taken_once() {
        let mut lines = LineBuffer::new();
        lines.push("data: [DONE]\r");
        assert_eq!(lines.take_remainder().as_deref(), Some("data: [DONE]"));
        assert_eq!(lines.take_remainder(), None);
    }
}
