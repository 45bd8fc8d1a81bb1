//! Incremental decoder for the chat answer stream.
//!
//! The backend answers `POST /chat` with server-sent events:
//! - `event: <name>` names the next record
//! - `data: <json>` carries its payload and completes it
//! - blank lines and `:` comments are ignored
//!
//! # Module structure
//! - `events` - `ChatEvent`, `SseLine`, `SseParseError`
//! - `line_buffer` - reassembles lines across chunk boundaries
//! - `parser` - line classification and the `EventDispatcher`
//! - `decoder` - `SseDecoder`, the two combined
//! - `handler` - `ChatStreamHandler` and the closure-based `ChatStreamCallbacks`
//! - `feed` - async drivers for chunked and cumulative bodies

mod decoder;
mod events;
mod feed;
mod handler;
mod line_buffer;
mod parser;

pub use decoder::SseDecoder;
pub use events::{ChatEvent, SseLine, SseParseError};
pub(crate) use feed::report_failure;
pub use feed::{drive_chunked, drive_cumulative, CumulativeFeed};
pub use handler::{ChatStreamCallbacks, ChatStreamHandler};
pub use line_buffer::LineBuffer;
pub use parser::{parse_chat_event, parse_sse_line, EventDispatcher};
