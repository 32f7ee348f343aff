//! Logical-line reassembly: arbitrary input chunks → complete lines.
//!
//! Input arrives as arbitrary-sized chunks that may start or end in the
//! middle of a line. The splitter buffers the incomplete tail and yields
//! only terminated lines, so downstream stages never see a partial record.

use bytes::{Bytes, BytesMut};

/// Reassembles input chunks into complete logical lines.
///
/// Lines are terminated by `\n` or `\r\n`; terminators are stripped from
/// yielded lines. The trailing fragment of a chunk stays pending until a
/// later [`feed`](LineSplitter::feed) completes it or
/// [`finish`](LineSplitter::finish) flushes it at end of stream.
pub struct LineSplitter {
    pending: BytesMut,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self {
            pending: BytesMut::new(),
        }
    }

    /// Feed one input chunk, yielding every line it completes.
    ///
    /// Empty lines are yielded as empty slices, never dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line = self.pending.split_to(pos + 1);
            line.truncate(pos);
            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }
            lines.push(line.freeze());
        }
        lines
    }

    /// Flush the unterminated trailing fragment at end of stream, if any.
    ///
    /// A terminator exactly at the end of the final chunk leaves nothing
    /// pending, so no phantom empty line is produced here.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.split().freeze())
        }
    }
}

impl Default for LineSplitter {
    fn default() -> Self {
        Self::new()
    }
}
