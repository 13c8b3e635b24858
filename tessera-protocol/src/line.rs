//! Byte-fed line assembly
//!
//! UART delivery is byte-at-a-time with no framing beyond the newline.
//! The assembler accumulates bytes until LF, tolerates a CR before it,
//! and bounds the buffer: an overlong line is reported once and the rest
//! of it discarded up to the next newline, so one runaway host line
//! cannot wedge the parser.

use heapless::{String, Vec};

/// Longest accepted command line, terminator excluded
pub const MAX_LINE_LEN: usize = 128;

/// One complete received line, terminator stripped
pub type Line = String<MAX_LINE_LEN>;

/// Errors from line assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; discarded through the next newline
    TooLong,
    /// Line contained invalid UTF-8 and was dropped
    InvalidUtf8,
}

/// Accumulates serial bytes into complete lines
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    buf: Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a newline completes a line, with the
    /// trailing CR (if any) stripped. The error for an overlong line is
    /// raised on the byte that overflows; subsequent bytes are silently
    /// dropped until the newline that ends the oversized line.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                return Ok(None);
            }

            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }

            let line = String::from_utf8(self.buf.clone()).map_err(|_| LineError::InvalidUtf8);
            self.buf.clear();
            return line.map(Some);
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buf.push(byte).is_err() {
            self.buf.clear();
            self.discarding = true;
            return Err(LineError::TooLong);
        }

        Ok(None)
    }

    /// Feed multiple bytes, returning the first complete line found
    ///
    /// Bytes after a completed line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Line>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}
