//! Incremental decoder for OpenAI-compatible chat-completion SSE streams.
//!
//! Turns a chunked response body into an ordered sequence of text
//! increments. The wire format is:
//!
//! ```text
//! : keep-alive
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//!
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//!
//! data: [DONE]
//! ```
//!
//! Chunk boundaries are arbitrary: a chunk may end in the middle of a line,
//! a JSON frame, or a UTF-8 code point. The synchronous [`Decoder`] does the
//! framing and parsing; [`decode`] drives it from an async byte stream.
//!
//! ```
//! use ultranote_sse::Decoder;
//!
//! let mut decoder = Decoder::new();
//! let mut out = decoder.feed(b"data: {\"choices\":[{\"del");
//! out.extend(decoder.feed(b"ta\":{\"content\":\"X\"}}]}\n"));
//! let (tail, summary) = decoder.finish();
//! out.extend(tail);
//! assert_eq!(out, vec!["X".to_string()]);
//! assert_eq!(summary.increments, 1);
//! ```

pub mod decoder;
pub mod frame;
pub mod line;
pub mod stream;
pub mod utf8;

pub use decoder::{DecodeSummary, Decoder, MAX_PENDING_FRAME_BYTES};
pub use frame::{DeltaEvent, Frame, LineKind};
pub use stream::decode;
