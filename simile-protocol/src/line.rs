//! Incremental line accumulation for the serial byte stream.

use heapless::Vec;

/// Maximum accepted line length in bytes
///
/// Sized for a full 50-frame definition: 50 tokens of 64 pattern chars
/// plus separator and duration, the `ANIM:` header and the name.
pub const MAX_LINE_LEN: usize = 4096;

/// Byte-fed accumulator turning a serial stream into protocol lines
///
/// Feed one byte at a time; a complete line is handed back when the
/// terminating `\n` arrives. A trailing `\r` is stripped so both LF and
/// CRLF hosts work. Lines that overrun the buffer or are not valid UTF-8
/// are discarded up to the next terminator.
#[derive(Debug, Default)]
pub struct LineReader {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Buffer holds a line already returned to the caller
    pending: bool,
    /// Current line overran the buffer; swallow until the next terminator
    overflow: bool,
}

impl LineReader {
    /// Create an empty reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any partially accumulated line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending = false;
        self.overflow = false;
    }

    /// Whether the current line has overrun the buffer
    pub fn is_overflowing(&self) -> bool {
        self.overflow
    }

    /// Feed a single byte
    ///
    /// Returns the completed line on `\n`, without its terminator. The
    /// returned slice is valid until the next call.
    pub fn feed(&mut self, byte: u8) -> Option<&str> {
        if self.pending {
            self.buffer.clear();
            self.pending = false;
        }

        if byte != b'\n' {
            if self.overflow || self.buffer.push(byte).is_err() {
                self.overflow = true;
            }
            return None;
        }

        if self.overflow {
            self.overflow = false;
            self.buffer.clear();
            return None;
        }

        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }
        self.pending = true;
        core::str::from_utf8(&self.buffer).ok()
    }
}
