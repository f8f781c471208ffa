//! Framed line transport over TCP.
//!
//! A connection is split into an independent reader and writer so that one
//! task can read while another owns all writes.

use crate::line::LineCodec;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};

/// Reading half: yields one decoded line per item.
pub type LineReader = FramedRead<OwnedReadHalf, LineCodec>;

/// Writing half: accepts one line (without terminator) per item.
pub type LineWriter = FramedWrite<OwnedWriteHalf, LineCodec>;

/// Split a TCP stream into a framed reader and writer.
///
/// `max_line_len` bounds inbound lines only.
pub fn split(stream: TcpStream, max_line_len: usize) -> (LineReader, LineWriter) {
    let (read_half, write_half) = stream.into_split();
    (
        FramedRead::new(read_half, LineCodec::with_max_len(max_line_len)),
        FramedWrite::new(write_half, LineCodec::with_max_len(max_line_len)),
    )
}
