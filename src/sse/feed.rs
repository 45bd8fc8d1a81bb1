//! Drivers that pull a response body through the decoder.
//!
//! Two delivery models are supported: a stream of fresh chunks, and a stream
//! of cumulative snapshots of everything received so far. Both end up
//! feeding the same bytes to one [`SseDecoder`], so they dispatch identically.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::StreamError;
use crate::sse::decoder::SseDecoder;
use crate::sse::handler::ChatStreamHandler;
use crate::traits::HttpError;

/// Report a fatal stream error to the handler and hand it back for returning.
pub(crate) fn report_failure<H: ChatStreamHandler + ?Sized>(
    handler: &mut H,
    err: StreamError,
) -> StreamError {
    warn!(code = err.error_code(), "Chat stream failed: {}", err);
    handler.on_error(&err);
    err
}

/// Decode a body delivered as successive chunks.
///
/// A read error ends the stream: `on_error` fires once, the partial line is
/// discarded and nothing else is dispatched.
pub async fn drive_chunked<S, H>(mut chunks: S, handler: &mut H) -> Result<(), StreamError>
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
    H: ChatStreamHandler + ?Sized,
{
    let mut decoder = SseDecoder::new();
    let mut dispatched = 0;

    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(bytes) => dispatched += decoder.feed_into(&bytes, handler),
            Err(e) => return Err(report_failure(handler, StreamError::interrupted(e))),
        }
    }

    dispatched += decoder.finish_into(handler);
    debug!(events = dispatched, "Chunked stream finished");
    Ok(())
}

/// Decoder for a body exposed as a growing buffer.
///
/// Remembers how many bytes were already consumed and feeds only the new
/// suffix of each snapshot.
#[derive(Debug, Default)]
pub struct CumulativeFeed {
    decoder: SseDecoder,
    consumed: usize,
}

impl CumulativeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the body received so far. Returns the number of events
    /// dispatched.
    pub fn update<H>(&mut self, snapshot: &[u8], handler: &mut H) -> usize
    where
        H: ChatStreamHandler + ?Sized,
    {
        if snapshot.len() < self.consumed {
            warn!(
                snapshot = snapshot.len(),
                consumed = self.consumed,
                "Cumulative body shrank; ignoring snapshot"
            );
            return 0;
        }

        let fresh = &snapshot[self.consumed..];
        self.consumed = snapshot.len();
        self.decoder.feed_into(fresh, handler)
    }

    /// Signal end of body.
    pub fn finish<H: ChatStreamHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        self.decoder.finish_into(handler)
    }

    /// Bytes of the body already handed to the decoder.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn pending_len(&self) -> usize {
        self.decoder.pending_len()
    }
}

/// Decode a body delivered as cumulative snapshots.
pub async fn drive_cumulative<S, H>(mut snapshots: S, handler: &mut H) -> Result<(), StreamError>
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
    H: ChatStreamHandler + ?Sized,
{
    let mut feed = CumulativeFeed::new();
    let mut dispatched = 0;

    while let Some(snapshot) = snapshots.next().await {
        match snapshot {
            Ok(body) => dispatched += feed.update(&body, handler),
            Err(e) => return Err(report_failure(handler, StreamError::interrupted(e))),
        }
    }

    dispatched += feed.finish(handler);
    debug!(events = dispatched, bytes = feed.consumed(), "Cumulative stream finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[derive(Default)]
    struct Recorder {
        deltas: Vec<String>,
        done: Option<Option<String>>,
        errors: Vec<String>,
    }

    impl ChatStreamHandler for Recorder {
        fn on_delta(&mut self, text: &str) {
            self.deltas.push(text.to_string());
        }

        fn on_done(&mut self, conversation_id: Option<&str>) {
            self.done = Some(conversation_id.map(str::to_string));
        }

        fn on_error(&mut self, error: &StreamError) {
            self.errors.push(error.to_string());
        }
    }

    fn ok(s: &'static str) -> Result<Bytes, HttpError> {
        Ok(Bytes::from_static(s.as_bytes()))
    }

    #[tokio::test]
    async fn test_drive_chunked_dispatches_in_order() {
        let chunks = stream::iter(vec![
            ok("event: delta\ndata: {\"te"),
            ok("xt\":\"a\"}\n\nevent: delta\n"),
            ok("data: {\"text\":\"b\"}\n\nevent: done\ndata: {\"conversation_id\":\"c\"}"),
        ]);
        let mut recorder = Recorder::default();
        drive_chunked(chunks, &mut recorder).await.unwrap();
        assert_eq!(recorder.deltas, vec!["a", "b"]);
        assert_eq!(recorder.done, Some(Some("c".to_string())));
        assert!(recorder.errors.is_empty());
    }

    #[tokio::test]
    async fn test_drive_chunked_error_stops_dispatch() {
        let chunks = stream::iter(vec![
            ok("event: delta\ndata: {\"text\":\"a\"}\n\nevent: delta\ndata: {\"text\""),
            Err(HttpError::Io("connection reset".to_string())),
            ok(":\"never\"}\n"),
        ]);
        let mut recorder = Recorder::default();
        let err = drive_chunked(chunks, &mut recorder).await.unwrap_err();
        assert!(matches!(err, StreamError::Interrupted { .. }));
        assert_eq!(recorder.deltas, vec!["a"]);
        assert_eq!(recorder.errors.len(), 1);
        assert!(recorder.done.is_none());
    }

    #[tokio::test]
    async fn test_drive_chunked_timeout_maps_to_timeout() {
        let chunks = stream::iter(vec![Err(HttpError::Timeout("read".to_string()))]);
        let mut recorder = Recorder::default();
        let err = drive_chunked(chunks, &mut recorder).await.unwrap_err();
        assert_eq!(err, StreamError::Timeout);
        assert_eq!(recorder.errors, vec!["Request timed out"]);
    }

    #[test]
    fn test_cumulative_feed_only_processes_new_suffix() {
        let mut feed = CumulativeFeed::new();
        let mut recorder = Recorder::default();

        let first = b"event: delta\ndata: {\"text\":\"a\"}\n";
        assert_eq!(feed.update(first, &mut recorder), 1);
        assert_eq!(feed.consumed(), first.len());

        // same snapshot again: nothing new
        assert_eq!(feed.update(first, &mut recorder), 0);

        let mut second = first.to_vec();
        second.extend_from_slice(b"\nevent: delta\ndata: {\"text\":\"b\"}\n");
        assert_eq!(feed.update(&second, &mut recorder), 1);
        assert_eq!(recorder.deltas, vec!["a", "b"]);
    }

    #[test]
    fn test_cumulative_feed_ignores_shrinking_snapshot() {
        let mut feed = CumulativeFeed::new();
        let mut recorder = Recorder::default();
        feed.update(b"event: delta\ndata: {\"text\":\"a\"}\n", &mut recorder);
        let consumed = feed.consumed();
        assert_eq!(feed.update(b"event", &mut recorder), 0);
        assert_eq!(feed.consumed(), consumed);
        assert_eq!(recorder.deltas, vec!["a"]);
    }

    #[tokio::test]
    async fn test_drive_cumulative_flushes_trailing_record() {
        let snapshots = stream::iter(vec![
            ok("event: done\n"),
            ok("event: done\ndata: {\"conversationId\""),
            ok("event: done\ndata: {\"conversationId\":\"x\"}"),
        ]);
        let mut recorder = Recorder::default();
        drive_cumulative(snapshots, &mut recorder).await.unwrap();
        assert_eq!(recorder.done, Some(Some("x".to_string())));
    }

    #[tokio::test]
    async fn test_drive_cumulative_error_reported_once() {
        let snapshots = stream::iter(vec![
            ok("event: delta\ndata: {\"text\":\"a\"}\n"),
            Err(HttpError::ConnectionFailed("gone".to_string())),
        ]);
        let mut recorder = Recorder::default();
        assert!(drive_cumulative(snapshots, &mut recorder).await.is_err());
        assert_eq!(recorder.deltas, vec!["a"]);
        assert_eq!(recorder.errors.len(), 1);
    }
}
