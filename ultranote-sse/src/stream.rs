//! Async driver for [`Decoder`].

use bytes::Bytes;
use futures::{Stream, StreamExt};
use ultranote_types::{Increment, StreamError};

use crate::decoder::Decoder;

/// Decode a raw response body into a stream of text increments.
///
/// Items are yielded as soon as the chunk that completes them arrives. The
/// stream ends after the body ends, or after a single `Err` if the body
/// reports a transport error. Malformed frames never produce an `Err`.
///
/// Dropping the returned stream abandons the read; nothing is raised.
pub fn decode<S, E>(byte_stream: S) -> impl Stream<Item = Increment> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        let mut decoder = Decoder::new();
        let mut bytes_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(error = %e, "response body failed mid-stream");
                    yield Err(StreamError::transport(e));
                    return;
                }
            };

            for increment in decoder.feed(&chunk) {
                yield Ok(increment);
            }
        }

        let (tail, summary) = decoder.finish();
        for increment in tail {
            yield Ok(increment);
        }

        tracing::debug!(
            increments = summary.increments,
            dropped_frames = summary.dropped_frames,
            saw_done = summary.saw_done,
            "stream decoded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn chunks(parts: Vec<&'static [u8]>) -> impl Stream<Item = Result<Bytes, Infallible>> {
        futures::stream::iter(parts.into_iter().map(|p| Ok(Bytes::from_static(p))))
    }

    #[tokio::test]
    async fn yields_increments_in_order() {
        let body = chunks(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n",
            b"data: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}\n",
            b"data: [DONE]\n",
        ]);
        let items: Vec<Increment> = decode(body).collect().await;
        assert_eq!(items, vec![Ok("Hello".to_string()), Ok(" world".to_string())]);
    }

    #[tokio::test]
    async fn empty_body_completes_cleanly() {
        let items: Vec<Increment> = decode(chunks(vec![])).collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn transport_error_is_terminal() {
        let body = futures::stream::iter(vec![
            Ok(Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"part\"}}]}\n",
            )),
            Err("connection reset by peer"),
            Ok(Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n",
            )),
        ]);
        let items: Vec<Increment> = decode(body).collect().await;
        assert_eq!(
            items,
            vec![
                Ok("part".to_string()),
                Err(StreamError::Transport("connection reset by peer".into())),
            ]
        );
    }

    #[tokio::test]
    async fn trailing_frame_is_flushed_at_eof() {
        let body = chunks(vec![b"data: {\"choices\":[{\"delta\":{\"content\":\"end\"}}]}"]);
        let items: Vec<Increment> = decode(body).collect().await;
        assert_eq!(items, vec![Ok("end".to_string())]);
    }
}
