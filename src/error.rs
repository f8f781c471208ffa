//! Unified error handling for chatd.
//!
//! Handler errors are expected outcomes of client input: each one maps to a
//! single `ERROR:<reason>` line sent back to the offending session only.

use chat_proto::Message;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::SendTimeoutError;

// ============================================================================
// Handler Errors (message processing)
// ============================================================================

/// Errors that can occur during message handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("already logged in")]
    AlreadyLoggedIn,

    #[error("empty username")]
    EmptyUsername,

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("name taken: {0}")]
    NameTaken(String),

    #[error("empty message body")]
    EmptyMessage,

    #[error("empty private message target")]
    EmptyTarget,

    #[error("user offline: {0}")]
    UserOffline(String),

    #[error("unsupported message type: {0}")]
    Unsupported(String),

    #[error("send error: {0}")]
    Send(#[from] SendTimeoutError<Arc<Message>>),

    /// The client asked to leave; the connection closes without a reply.
    #[error("client logged out")]
    Quit,

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "not_logged_in",
            Self::AlreadyLoggedIn => "already_logged_in",
            Self::EmptyUsername => "empty_username",
            Self::InvalidUsername(_) => "invalid_username",
            Self::NameTaken(_) => "name_taken",
            Self::EmptyMessage => "empty_message",
            Self::EmptyTarget => "empty_target",
            Self::UserOffline(_) => "user_offline",
            Self::Unsupported(_) => "unsupported",
            Self::Send(_) => "send_error",
            Self::Quit => "quit",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to an `ERROR` reply for the offending client.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply
    /// (e.g., internal errors, send failures, logout).
    pub fn to_reply(&self) -> Option<Message> {
        let text = match self {
            Self::NotLoggedIn => "please log in first".to_string(),
            Self::AlreadyLoggedIn => "already logged in".to_string(),
            Self::EmptyUsername => "username must not be empty".to_string(),
            Self::InvalidUsername(_) => "invalid username".to_string(),
            Self::NameTaken(_) => "name taken".to_string(),
            Self::EmptyMessage => "message must not be empty".to_string(),
            Self::EmptyTarget => "target must not be empty".to_string(),
            Self::UserOffline(target) => format!("user {target} offline"),
            Self::Unsupported(_) => "unsupported message type".to_string(),

            // These errors don't get client-visible replies
            Self::Send(_) => return None,
            Self::Quit => return None,
            Self::Internal(_) => return None,
        };
        Some(Message::Error(text))
    }
}

/// Result type for message handlers.
pub type HandlerResult = Result<(), HandlerError>;
