//! Line-based codec for tokio.
//!
//! Reads and writes `\n`-terminated UTF-8 lines. A trailing `\r` is stripped on
//! read and, like the `\n`, does not count toward the line limit. Problems
//! confined to one line (too long, not UTF-8) are yielded as
//! `Ok(Some(Err(..)))` so the stream keeps going; only I/O failures end it.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Default maximum line length in bytes, excluding the terminator.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Newline-delimited codec.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping the remainder of an over-long line
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Whether the unterminated data in `src` already exceeds the limit.
    ///
    /// A `\r` right after `max_len` bytes may still be the start of `\r\n`.
    fn over_limit(&self, src: &[u8]) -> bool {
        let allowed = if src.get(self.max_len) == Some(&b'\r') {
            self.max_len.saturating_add(1)
        } else {
            self.max_len
        };
        src.len() > allowed
    }

    /// Length of a complete line without its terminator.
    fn content_len(line: &[u8]) -> usize {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        line.strip_suffix(b"\r").unwrap_or(line).len()
    }

    fn finish_line(line: &[u8]) -> error::Result<String> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        std::str::from_utf8(line)
            .map(str::to_string)
            .map_err(|e| ProtocolError::InvalidUtf8 {
                byte_pos: e.valid_up_to(),
            })
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = error::Result<String>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        loop {
            // Never scan past the limit plus a `\r\n` terminator.
            let read_to = src.len().min(self.max_len.saturating_add(2));
            let newline = src[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    src.advance(self.next_index + offset + 1);
                    self.discarding = false;
                    self.next_index = 0;
                }
                (true, None) => {
                    src.advance(read_to);
                    self.next_index = 0;
                    if src.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(offset)) => {
                    let end = self.next_index + offset + 1;
                    self.next_index = 0;
                    let line = src.split_to(end);
                    if Self::content_len(&line) > self.max_len {
                        return Ok(Some(Err(ProtocolError::LineTooLong {
                            limit: self.max_len,
                        })));
                    }
                    return Ok(Some(Self::finish_line(&line)));
                }
                (false, None) if self.over_limit(src) => {
                    self.discarding = true;
                    return Ok(Some(Err(ProtocolError::LineTooLong {
                        limit: self.max_len,
                    })));
                }
                (false, None) => {
                    // No complete line yet - remember where we stopped
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        if src.is_empty() || self.discarding {
            src.clear();
            return Ok(None);
        }
        // Unterminated final line.
        self.next_index = 0;
        let line = src.split_to(src.len());
        Ok(Some(Self::finish_line(&line)))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        if let Some(ch) = line.chars().find(|c| matches!(c, '\r' | '\n')) {
            return Err(ProtocolError::UnencodableField { field: "line", ch });
        }
        dst.reserve(line.len() + 1);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\n");
        Ok(())
    }
}
