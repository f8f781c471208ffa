//! Error handling utilities for chat connection management.
//!
//! Provides classification of read and decode errors into the reply the
//! client should see, if any.

use chat_proto::{MalformedCause, Message, ProtocolError};

/// Classification of a protocol error for appropriate handling.
pub(super) enum ReadErrorAction {
    /// Problem confined to one line - reply and keep reading
    Reply(Message),
    /// Transport is broken - just log and disconnect
    Disconnect,
}

/// Classify a framing or decode error into an actionable category.
pub(super) fn classify_read_error(e: &ProtocolError) -> ReadErrorAction {
    let text = match e {
        ProtocolError::LineTooLong { .. } => "line too long",
        ProtocolError::InvalidUtf8 { .. } => "invalid utf-8",
        ProtocolError::Malformed {
            cause: MalformedCause::BlankField { field: "username" },
        } => "username must not be empty",
        _ if e.is_recoverable() => "malformed message",
        _ => return ReadErrorAction::Disconnect,
    };
    ReadErrorAction::Reply(Message::Error(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_text(e: ProtocolError) -> Option<String> {
        match classify_read_error(&e) {
            ReadErrorAction::Reply(Message::Error(text)) => Some(text),
            ReadErrorAction::Reply(other) => panic!("unexpected reply {other:?}"),
            ReadErrorAction::Disconnect => None,
        }
    }

    #[test]
    fn line_problems_are_answered() {
        assert_eq!(
            reply_text(ProtocolError::LineTooLong { limit: 10 }).as_deref(),
            Some("line too long")
        );
        assert_eq!(
            reply_text(ProtocolError::InvalidUtf8 { byte_pos: 3 }).as_deref(),
            Some("invalid utf-8")
        );
        assert_eq!(
            reply_text(MalformedCause::MissingSeparator.into()).as_deref(),
            Some("malformed message")
        );
        assert_eq!(
            reply_text(MalformedCause::BlankField { field: "username" }.into()).as_deref(),
            Some("username must not be empty")
        );
    }

    #[test]
    fn other_line_errors_are_malformed() {
        assert_eq!(
            reply_text(MalformedCause::BlankField { field: "tag" }.into()).as_deref(),
            Some("malformed message")
        );
        assert_eq!(
            reply_text(ProtocolError::ReservedTag { tag: "LOGIN".into() }).as_deref(),
            Some("malformed message")
        );
    }

    #[test]
    fn io_errors_disconnect() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert_eq!(reply_text(ProtocolError::Io(io)), None);
    }
}
