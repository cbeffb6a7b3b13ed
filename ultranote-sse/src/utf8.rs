//! Streaming UTF-8 decoding.

use bytes::{Buf, BytesMut};

/// Decodes UTF-8 across chunk boundaries.
///
/// A multi-byte sequence cut off at the end of a chunk is held back until
/// the next chunk completes it. Bytes that can never form a valid code point
/// become U+FFFD, one replacement per maximal invalid subpart.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: BytesMut,
}

impl Utf8Decoder {
    /// Create a decoder with nothing buffered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, prefixed by any bytes carried over from the last call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.carry.extend_from_slice(chunk);
        let mut out = String::with_capacity(self.carry.len());

        loop {
            match std::str::from_utf8(&self.carry) {
                Ok(text) => {
                    out.push_str(text);
                    self.carry.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    if let Ok(text) = std::str::from_utf8(&self.carry[..valid]) {
                        out.push_str(text);
                    }
                    match err.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.carry.advance(valid + invalid);
                        }
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            self.carry.advance(valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush at end of input. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.carry.is_empty() {
            return String::new();
        }
        let tail = String::from_utf8_lossy(&self.carry).into_owned();
        self.carry.clear();
        tail
    }
}
