//! One live client connection.
//!
//! A `Session` is shared between its connection task, the registry, and any
//! router fan-out that is delivering to it. All writes go through a bounded
//! queue drained by the connection's single writer, so concurrent senders
//! never interleave on the socket.

use crate::state::SessionId;
use chat_proto::Message;
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};

/// Server-side state of one client connection.
#[derive(Debug)]
pub struct Session {
    /// Unique id assigned at accept time.
    pub id: SessionId,
    /// Peer address.
    pub addr: SocketAddr,
    /// When the connection was accepted.
    pub connected_at: DateTime<Utc>,
    /// Empty until login succeeds, then fixed.
    username: OnceLock<String>,
    /// Set once the close path has run.
    closed: AtomicBool,
    outgoing: mpsc::Sender<Arc<Message>>,
    send_timeout: Duration,
}

impl Session {
    /// Create a session writing into `outgoing`.
    ///
    /// `send_timeout` bounds how long a send waits on a full queue.
    pub fn new(
        id: SessionId,
        addr: SocketAddr,
        outgoing: mpsc::Sender<Arc<Message>>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            id,
            addr,
            connected_at: Utc::now(),
            username: OnceLock::new(),
            closed: AtomicBool::new(false),
            outgoing,
            send_timeout,
        }
    }

    /// The bound username, if logged in.
    pub fn username(&self) -> Option<&str> {
        self.username.get().map(String::as_str)
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.get().is_some()
    }

    /// Bind `name` to this session. Returns false if a name is already bound.
    pub fn bind_username(&self, name: String) -> bool {
        self.username.set(name).is_ok()
    }

    /// Mark the session closed. Returns true only for the first caller.
    pub fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Queue a message for this client.
    pub async fn send(&self, msg: Message) -> Result<(), SendTimeoutError<Arc<Message>>> {
        self.deliver(Arc::new(msg)).await
    }

    /// Queue a shared message, waiting at most the session's send timeout.
    pub async fn deliver(&self, msg: Arc<Message>) -> Result<(), SendTimeoutError<Arc<Message>>> {
        self.outgoing.send_timeout(msg, self.send_timeout).await
    }

    /// Queue a message without waiting.
    pub fn try_send(&self, msg: Message) -> Result<(), TrySendError<Arc<Message>>> {
        self.outgoing.try_send(Arc::new(msg))
    }
}
