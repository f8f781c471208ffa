//! Error types for the chat protocol library.
//!
//! Protocol errors are ordinary values: a malformed line from a peer is an
//! expected condition, answered on the wire and then forgotten.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The line does not follow the `TYPE:field[:field...]` grammar.
    #[error("malformed message: {cause}")]
    Malformed {
        /// Why the line was rejected.
        cause: MalformedCause,
    },

    /// A line exceeded the configured maximum length and was discarded.
    #[error("line too long (limit: {limit} bytes)")]
    LineTooLong {
        /// Maximum allowed length in bytes, excluding the terminator.
        limit: usize,
    },

    /// A line was not valid UTF-8.
    #[error("invalid UTF-8 at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where validation failed.
        byte_pos: usize,
    },

    /// A field holds a character that cannot be represented at its position.
    ///
    /// Raised by the encoder instead of emitting a line that would decode
    /// differently (for example a `:` inside a non-terminal field).
    #[error("field `{field}` cannot contain {ch:?}")]
    UnencodableField {
        /// Name of the offending field.
        field: &'static str,
        /// The character that is not allowed there.
        ch: char,
    },

    /// An unknown message was given the tag of a known type.
    #[error("tag `{tag}` belongs to a known message type")]
    ReservedTag {
        /// The reused tag.
        tag: String,
    },
}

/// Reasons a line failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedCause {
    /// The line was empty or whitespace only.
    #[error("empty line")]
    Empty,
    /// No `:` after the type tag.
    #[error("missing separator")]
    MissingSeparator,
    /// Fewer fields than the message type requires.
    #[error("expected {expected} fields")]
    MissingFields {
        /// Number of fields the message type requires.
        expected: usize,
    },
    /// A required field was blank after trimming.
    #[error("blank {field}")]
    BlankField {
        /// Name of the blank field.
        field: &'static str,
    },
    /// The timestamp field of a relayed broadcast is not an integer.
    #[error("invalid timestamp")]
    InvalidTimestamp,
}

impl ProtocolError {
    /// Whether the connection can keep reading after this error.
    ///
    /// Only I/O failures break the transport; every other variant concerns a
    /// single line.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

impl From<MalformedCause> for ProtocolError {
    fn from(cause: MalformedCause) -> Self {
        Self::Malformed { cause }
    }
}
