//! Reassembles complete lines from arbitrarily split chunks.

/// Byte-level line reassembler.
///
/// Works on bytes rather than text so a multi-byte character split across two
/// chunks is decoded only once both halves have arrived. At most one partial
/// line is ever pending. There is no size limit; see [`LineBuffer::pending_len`].
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completes, in order.
    ///
    /// The text after the last `\n` stays pending. A single trailing `\r` is
    /// stripped from each line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let Some(last_newline) = chunk.iter().rposition(|&b| b == b'\n') else {
            self.pending.extend_from_slice(chunk);
            return Vec::new();
        };

        self.pending.extend_from_slice(&chunk[..last_newline]);
        let complete = std::mem::replace(&mut self.pending, chunk[last_newline + 1..].to_vec());

        complete.split(|&b| b == b'\n').map(decode_line).collect()
    }

    /// Flush the pending partial line at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(decode_line(&rest))
    }

    /// Bytes held while waiting for a line terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines_are_emitted() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"event: delta\ndata: {}\n"), vec!["event: delta", "data: {}"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_partial_line_is_kept() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"event: del").is_empty());
        assert_eq!(buffer.pending_len(), 10);
        assert_eq!(buffer.push(b"ta\ndata"), vec!["event: delta"]);
        assert_eq!(buffer.push(b": {}\n"), vec!["data: {}"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_blank_lines_are_preserved() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_crlf_is_stripped() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"event: done\r\n\r\n"), vec!["event: done", ""]);
        // \r arriving alone before its \n
        assert!(buffer.push(b"data: {}\r").is_empty());
        assert_eq!(buffer.push(b"\n"), vec!["data: {}"]);
    }

    #[test]
    fn test_finish_flushes_trailing_line() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"event: done\ndata: {\"conversation_id\":\"x\"}");
        assert_eq!(
            buffer.finish(),
            Some("data: {\"conversation_id\":\"x\"}".to_string())
        );
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_split_multibyte_character() {
        let text = "data: {\"text\":\"caf\u{e9} \u{1f600}\"}\n".as_bytes();
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        for byte in text {
            lines.extend(buffer.push(std::slice::from_ref(byte)));
        }
        assert_eq!(lines, vec!["data: {\"text\":\"caf\u{e9} \u{1f600}\"}"]);
    }

    #[test]
    fn test_empty_chunk_is_noop() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"abc");
        assert!(buffer.push(b"").is_empty());
        assert_eq!(buffer.pending_len(), 3);
    }
}
