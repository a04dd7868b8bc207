use std::collections::VecDeque;

/// Longest partial line kept while waiting for a terminator. A wand that never
/// sends `\n` would otherwise grow the buffer without bound.
pub const MAX_LINE_BYTES: usize = 4096;

/// Newline framing over an arbitrary byte stream.
///
/// Bytes go in with `push`, complete lines come out of `pop_line` with the
/// `\n` (and a trailing `\r`, if any) removed.
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: Vec<u8>,
    ready: VecDeque<Vec<u8>>,
    overflowed: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                if self.overflowed {
                    // Tail of an oversized line; drop it and resync here.
                    self.overflowed = false;
                    self.partial.clear();
                    continue;
                }
                let mut line = std::mem::take(&mut self.partial);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                self.ready.push_back(line);
            } else if !self.overflowed {
                if self.partial.len() >= MAX_LINE_BYTES {
                    tracing::debug!(limit = MAX_LINE_BYTES, "dropping oversized line");
                    self.partial.clear();
                    self.overflowed = true;
                } else {
                    self.partial.push(b);
                }
            }
        }
    }

    pub fn pop_line(&mut self) -> Option<Vec<u8>> {
        self.ready.pop_front()
    }

    /// Bytes buffered for the line currently being received.
    pub fn pending_len(&self) -> usize {
        self.partial.len()
    }
}

/// Saturating display counter with the semantics of a classic `ShowCursor`:
/// show increments, hide decrements, the pointer is visible while `>= 0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayCounter {
    count: i32,
}

impl DisplayCounter {
    pub fn adjust(&mut self, show: bool) -> i32 {
        self.count = if show {
            self.count.saturating_add(1)
        } else {
            self.count.saturating_sub(1)
        };
        self.count
    }

    pub fn value(&self) -> i32 {
        self.count
    }

    pub fn visible(&self) -> bool {
        self.count >= 0
    }
}
