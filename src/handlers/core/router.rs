//! Message dispatch and session close-out.
//!
//! The `Router` owns the handler table and the shared registry. It keeps a
//! usage counter per message type, reported when the server stops.

use super::context::{Context, Handler};
use crate::config::LimitsConfig;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::fanout;
use crate::handlers::{BroadcastHandler, LoginHandler, LogoutHandler, PrivateHandler};
use crate::state::{Session, SessionRegistry};
use crate::telemetry::spans;
use chat_proto::{Message, MessageKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, debug, info};

/// Routes client messages to handlers.
pub struct Router {
    registry: Arc<SessionRegistry>,
    limits: LimitsConfig,
    handlers: HashMap<MessageKind, Box<dyn Handler>>,
    /// Usage counters, one per handled kind.
    command_counts: HashMap<MessageKind, AtomicU64>,
}

impl Router {
    /// Create a router with all handlers registered.
    pub fn new(registry: Arc<SessionRegistry>, limits: LimitsConfig) -> Self {
        let mut handlers: HashMap<MessageKind, Box<dyn Handler>> = HashMap::new();

        // Session lifecycle
        handlers.insert(MessageKind::Login, Box::new(LoginHandler));
        handlers.insert(MessageKind::Logout, Box::new(LogoutHandler));

        // Messaging
        handlers.insert(MessageKind::Broadcast, Box::new(BroadcastHandler));
        handlers.insert(MessageKind::Private, Box::new(PrivateHandler));

        let command_counts = handlers
            .keys()
            .map(|&kind| (kind, AtomicU64::new(0)))
            .collect();

        Self {
            registry,
            limits,
            handlers,
            command_counts,
        }
    }

    /// The shared session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Per-connection limits.
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Message usage statistics, most used first. Unused kinds are omitted.
    pub fn command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(kind, count)| (kind.tag(), count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }

    /// Dispatch a message to the handler for its type.
    ///
    /// Types without a handler (unknown tags, server-only types) are an
    /// error for a logged-in session and silently ignored otherwise.
    pub async fn dispatch(&self, session: &Arc<Session>, msg: &Message) -> HandlerResult {
        let Some((kind, handler)) = msg
            .kind()
            .and_then(|kind| self.handlers.get(&kind).map(|h| (kind, h)))
        else {
            if session.is_authenticated() {
                return Err(HandlerError::Unsupported(msg.tag().to_string()));
            }
            debug!(tag = %msg.tag(), "Ignoring unsupported message before login");
            return Ok(());
        };

        if let Some(counter) = self.command_counts.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        let ctx = Context {
            session,
            registry: &self.registry,
            limits: &self.limits,
        };
        let span = spans::command(kind.tag(), session.id, session.username());
        let result = handler.handle(&ctx, msg).instrument(span).await;

        if let Err(ref e) = result {
            debug!(command = kind.tag(), code = e.error_code(), error = %e, "Command error");
        }
        result
    }

    /// Run the close path for `session`.
    ///
    /// Safe to call any number of times: only the first call removes the
    /// username and notifies the remaining users. Returns whether this call
    /// did the work.
    pub async fn close(&self, session: &Session) -> bool {
        if !session.mark_closed() {
            return false;
        }

        let Some(username) = session.username() else {
            return true;
        };
        if self.registry.remove(username).is_none() {
            return true;
        }

        info!(
            username = %username,
            addr = %session.addr,
            online = self.registry.len(),
            "User left"
        );
        fanout::broadcast(&self.registry, Message::UserLeft(username.to_string()), None).await;
        fanout::broadcast_user_list(&self.registry).await;
        true
    }

    /// Log the usage counters.
    pub fn log_command_stats(&self) {
        for (tag, count) in self.command_stats() {
            info!(command = tag, count, "Command usage");
        }
    }
}
