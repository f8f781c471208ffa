//! Message handler context and trait.

use crate::config::LimitsConfig;
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Session, SessionRegistry};
use async_trait::async_trait;
use chat_proto::Message;
use std::sync::Arc;

/// Handler context passed to each message handler.
pub struct Context<'a> {
    /// The session the message arrived on.
    pub session: &'a Arc<Session>,
    /// Shared registry of online users.
    pub registry: &'a SessionRegistry,
    /// Configured per-connection limits.
    pub limits: &'a LimitsConfig,
}

impl Context<'_> {
    /// The sender's username, or `NotLoggedIn`.
    pub fn username(&self) -> Result<&str, HandlerError> {
        self.session.username().ok_or(HandlerError::NotLoggedIn)
    }

    /// Send a reply to the sender only.
    pub async fn reply(&self, msg: Message) -> HandlerResult {
        self.session.send(msg).await?;
        Ok(())
    }
}

/// A handler for one message type.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context<'_>, msg: &Message) -> HandlerResult;
}

/// Error for a message routed to the wrong handler.
pub(crate) fn unexpected(handler: &str, msg: &Message) -> HandlerError {
    HandlerError::Internal(format!("{handler} handler got {}", msg.tag()))
}
