//! Server-sent events decoding for `streamGenerateContent?alt=sse`.

/// Incremental decoder turning raw body bytes into event payloads.
///
/// Bytes are buffered until a full line is available, so multi-byte UTF-8
/// sequences split across network chunks are decoded intact. Consecutive
/// `data:` lines of one event are joined with `\n`; a blank line ends the
/// event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed a chunk of body bytes, returning every event completed by it.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(event) = self.take_event() {
                    events.push(event);
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data.push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
            // Comments (`:`) and other fields (`event:`, `id:`) carry nothing we use.
        }
        events
    }

    /// Flush an event left unterminated at end of body.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let rest = String::from_utf8_lossy(&rest);
            let rest = rest.trim_end_matches(['\n', '\r']);
            if let Some(data) = rest.strip_prefix("data:") {
                self.data.push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
        }
        self.take_event()
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.data).join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_events_on_blank_lines() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push(b"data: {\"a\":1}\r\n\r\ndata: {\"b\":2}\r\n\r\n");
        assert_eq!(events, vec!["{\"a\":1}", "{\"b\":2}"]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn reassembles_lines_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        let text = "data: {\"text\":\"caf\u{e9}\"}\n\n".as_bytes();
        let (head, tail) = text.split_at(19);

        assert!(decoder.push(head).is_empty());
        assert_eq!(decoder.push(tail), vec!["{\"text\":\"caf\u{e9}\"}"]);
    }

    #[test]
    fn ignores_comments_and_flushes_trailing_event() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b": keep-alive\n\ndata: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
    }
}
