//! Incremental chat stream decoder.

use crate::sse::events::ChatEvent;
use crate::sse::handler::ChatStreamHandler;
use crate::sse::line_buffer::LineBuffer;
use crate::sse::parser::EventDispatcher;

/// Line reassembly plus record dispatch, owned by a single stream.
///
/// Chunk boundaries never affect the output: feeding a body in one piece or
/// one byte at a time yields the same events in the same order.
#[derive(Debug, Default)]
pub struct SseDecoder {
    lines: LineBuffer,
    dispatcher: EventDispatcher,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect the events it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ChatEvent> {
        let dispatcher = &mut self.dispatcher;
        self.lines
            .push(chunk)
            .iter()
            .filter_map(|line| dispatcher.dispatch_line(line))
            .collect()
    }

    /// Signal end of stream, flushing a trailing record that had no newline.
    pub fn finish(&mut self) -> Vec<ChatEvent> {
        let events = self
            .lines
            .finish()
            .and_then(|line| self.dispatcher.dispatch_line(&line))
            .into_iter()
            .collect();
        self.dispatcher.reset();
        events
    }

    /// Feed a chunk and hand each completed event to `handler` as it completes.
    /// Returns the number of events dispatched.
    pub fn feed_into<H>(&mut self, chunk: &[u8], handler: &mut H) -> usize
    where
        H: ChatStreamHandler + ?Sized,
    {
        let mut dispatched = 0;
        for line in self.lines.push(chunk) {
            if let Some(event) = self.dispatcher.dispatch_line(&line) {
                event.dispatch_to(handler);
                dispatched += 1;
            }
        }
        dispatched
    }

    /// [`finish`](Self::finish), dispatching into `handler`.
    pub fn finish_into<H: ChatStreamHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        let events = self.finish();
        for event in &events {
            event.dispatch_to(handler);
        }
        events.len()
    }

    /// Bytes of the current partial line.
    pub fn pending_len(&self) -> usize {
        self.lines.pending_len()
    }
}
