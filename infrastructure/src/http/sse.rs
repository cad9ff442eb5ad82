//! Server-sent events framing.
//!
//! Events are separated by a blank line. Only `data:` fields matter to the
//! chat stream; multiple `data:` lines in one event are joined with `\n`.
//! Comments (`:` prefix) and other fields are ignored. An event still
//! unterminated when the connection closes is discarded.

use hiremate_application::TransportError;

/// Upper bound on bytes buffered while waiting for an event to end.
pub const MAX_PENDING_BYTES: usize = 1024 * 1024;

/// Incremental SSE decoder yielding the `data` payload of each event.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Buffer prefix already known not to contain an event end.
    scanned: usize,
    max_pending: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            max_pending: MAX_PENDING_BYTES,
        }
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pending-bytes limit.
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Feed raw bytes; returns the payloads of every event they complete.
    ///
    /// Fails with [`TransportError::Dropped`] once more than the pending
    /// limit is buffered without an event end; the buffer is discarded.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>, TransportError> {
        self.buffer
            .extend(bytes.iter().copied().filter(|b| *b != b'\r'));

        let mut payloads = Vec::new();
        while let Some(pos) = find_event_end(&self.buffer[self.scanned..]) {
            let end = self.scanned + pos;
            let event: Vec<u8> = self.buffer.drain(..end + 2).collect();
            self.scanned = 0;
            let event = String::from_utf8_lossy(&event[..end]);
            if let Some(data) = data_of(&event) {
                payloads.push(data);
            }
        }
        // The last byte may be the first half of a blank line
        self.scanned = self.buffer.len().saturating_sub(1);

        if self.buffer.len() > self.max_pending {
            let pending = self.buffer.len();
            self.buffer.clear();
            self.scanned = 0;
            return Err(TransportError::Dropped(format!(
                "event exceeds {} bytes without ending ({} pending)",
                self.max_pending, pending
            )));
        }

        Ok(payloads)
    }

    /// Bytes received but not yet forming a complete event.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn data_of(event: &str) -> Option<String> {
    let lines: Vec<&str> = event
        .lines()
        .filter_map(|line| {
            let value = line.strip_prefix("data")?;
            // `data:value`, `data: value`, or a bare `data` line
            if value.is_empty() {
                Some("")
            } else {
                let value = value.strip_prefix(':')?;
                Some(value.strip_prefix(' ').unwrap_or(value))
            }
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
