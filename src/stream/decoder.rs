//! Streamed reply decoding.
//!
//! Wraps a response body in a stream of text fragments. The body is moved
//! in, so a reply can be read once, by one reader; a new reply needs a new
//! request.

use bytes::Bytes;
use futures::stream::{self, Stream};
use futures_util::StreamExt;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

use super::utf8::Utf8Reassembler;
use crate::error::StreamError;
use crate::traits::{ByteStream, HttpError};

/// Text fragments of a reply, in transport order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, StreamError>> + Send>>;

struct DecodeState {
    body: Option<ByteStream>,
    reassembler: Utf8Reassembler,
    cancel: CancellationToken,
}

enum Step {
    Cancelled,
    Chunk(Option<Result<Bytes, HttpError>>),
}

/// Decode `body` into text fragments until it ends or `cancel` fires.
///
/// Cancellation ends the stream quietly and drops the body, releasing the
/// connection. A transport error is yielded once and ends the stream.
pub fn decode(body: ByteStream, cancel: CancellationToken) -> FragmentStream {
    let state = DecodeState {
        body: Some(body),
        reassembler: Utf8Reassembler::new(),
        cancel,
    };

    let fragments = stream::unfold(state, |mut state| async move {
        loop {
            let step = {
                let body = state.body.as_mut()?;
                tokio::select! {
                    biased;
                    _ = state.cancel.cancelled() => Step::Cancelled,
                    next = body.next() => Step::Chunk(next),
                }
            };

            match step {
                Step::Cancelled => {
                    tracing::debug!("reply stream cancelled");
                    return None;
                }
                Step::Chunk(Some(Ok(chunk))) => {
                    if let Some(text) = state.reassembler.push(&chunk) {
                        return Some((Ok(text), state));
                    }
                }
                Step::Chunk(Some(Err(err))) => {
                    tracing::warn!(error = %err, "reply stream interrupted");
                    state.body = None;
                    return Some((Err(StreamError::from(err)), state));
                }
                Step::Chunk(None) => {
                    tracing::debug!("reply stream finished");
                    state.body = None;
                    return state.reassembler.finish().map(|tail| (Ok(tail), state));
                }
            }
        }
    });

    Box::pin(fragments)
}

/// Accumulate every fragment into the full reply text.
pub async fn collect_reply(mut fragments: FragmentStream) -> Result<String, StreamError> {
    let mut reply = String::new();
    while let Some(fragment) = fragments.next().await {
        reply.push_str(&fragment?);
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::task::{Context, Poll};

    fn body_of(chunks: Vec<&'static [u8]>) -> ByteStream {
        Box::pin(stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))),
        ))
    }

    /// Body that never ends and records when it is dropped.
    struct HangingBody {
        first: Option<Bytes>,
        dropped: Arc<AtomicBool>,
    }

    impl Stream for HangingBody {
        type Item = Result<Bytes, HttpError>;

        fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            match self.first.take() {
                Some(chunk) => Poll::Ready(Some(Ok(chunk))),
                None => Poll::Pending,
            }
        }
    }

    impl Drop for HangingBody {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_fragments_in_order() {
        let fragments = decode(
            body_of(vec![b"Peace ", b"be ", b"upon you"]),
            CancellationToken::new(),
        );
        let items: Vec<_> = fragments.collect().await;
        let texts: Vec<_> = items.into_iter().map(Result::unwrap).collect();
        assert_eq!(texts, vec!["Peace ", "be ", "upon you"]);
    }

    #[tokio::test]
    async fn test_split_multibyte_reassembled() {
        // "é" split across chunks
        let fragments = decode(
            body_of(vec![b"caf\xC3", b"\xA9 au lait"]),
            CancellationToken::new(),
        );
        assert_eq!(collect_reply(fragments).await.unwrap(), "café au lait");
    }

    #[tokio::test]
    async fn test_chunk_completing_nothing_yields_no_fragment() {
        let fragments = decode(
            body_of(vec![b"\xF0\x9F", b"\x95\x8C"]),
            CancellationToken::new(),
        );
        let items: Vec<_> = fragments.collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "🕌");
    }

    #[tokio::test]
    async fn test_truncated_tail_flushed() {
        let fragments = decode(body_of(vec![b"ok\xE2\x82"]), CancellationToken::new());
        assert_eq!(collect_reply(fragments).await.unwrap(), "ok\u{FFFD}");
    }

    #[tokio::test]
    async fn test_empty_body() {
        let fragments = decode(body_of(vec![]), CancellationToken::new());
        assert_eq!(collect_reply(fragments).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_transport_error_yielded_once_then_end() {
        let body: ByteStream = Box::pin(stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(HttpError::Io("connection reset".to_string())),
            Ok(Bytes::from_static(b"never seen")),
        ]));
        let items: Vec<_> = decode(body, CancellationToken::new()).collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "partial");
        assert!(matches!(items[1], Err(StreamError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_collect_reply_propagates_error() {
        let body: ByteStream = Box::pin(stream::iter(vec![Err(HttpError::Io(
            "reset".to_string(),
        ))]));
        assert!(collect_reply(decode(body, CancellationToken::new()))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_cancel_ends_stream_and_releases_body() {
        let dropped = Arc::new(AtomicBool::new(false));
        let body: ByteStream = Box::pin(HangingBody {
            first: Some(Bytes::from_static(b"first")),
            dropped: Arc::clone(&dropped),
        });
        let cancel = CancellationToken::new();
        let mut fragments = decode(body, cancel.clone());

        assert_eq!(fragments.next().await.unwrap().unwrap(), "first");
        assert!(!dropped.load(Ordering::SeqCst));

        cancel.cancel();
        assert!(fragments.next().await.is_none());
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_for_data() {
        let dropped = Arc::new(AtomicBool::new(false));
        let body: ByteStream = Box::pin(HangingBody {
            first: None,
            dropped: Arc::clone(&dropped),
        });
        let cancel = CancellationToken::new();
        let mut fragments = decode(body, cancel.clone());

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                cancel.cancel();
            })
        };

        assert!(fragments.next().await.is_none());
        canceller.await.unwrap();
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dropping_fragments_releases_body() {
        let dropped = Arc::new(AtomicBool::new(false));
        let body: ByteStream = Box::pin(HangingBody {
            first: None,
            dropped: Arc::clone(&dropped),
        });
        let fragments = decode(body, CancellationToken::new());
        drop(fragments);
        assert!(dropped.load(Ordering::SeqCst));
    }
}
