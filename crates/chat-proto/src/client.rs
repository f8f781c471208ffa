//! Headless chat client.
//!
//! [`ChatClient`] owns the writing half of a connection; a background task
//! reads server lines and publishes them as [`ClientEvent`]s on a channel, so
//! a front end can render them however it likes.
//!
//! ```no_run
//! # async fn demo() -> chat_proto::error::Result<()> {
//! use chat_proto::{ChatClient, ClientEvent};
//!
//! let (mut client, mut events) = ChatClient::connect("127.0.0.1:8888").await?;
//! client.login("alice").await?;
//! client.send_broadcast("hello").await?;
//! while let Some(event) = events.recv().await {
//!     if let ClientEvent::MessageReceived(text) = event {
//!         println!("{text}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::line::DEFAULT_MAX_LINE_LEN;
use crate::message::{Direction, Message};
use crate::transport::{self, LineReader, LineWriter};

/// Capacity of the event channel handed to the caller.
const EVENT_BUFFER: usize = 64;

/// Something the front end should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A line of public traffic, already rendered as text.
    MessageReceived(String),
    /// A private message addressed to this client.
    PrivateMessageReceived {
        /// Who sent it.
        sender: String,
        /// The message text.
        text: String,
    },
    /// The full list of online users.
    UserListUpdated(Vec<String>),
    /// A server-side or local error.
    ErrorOccurred(String),
    /// The connection is gone. Always the last event.
    Disconnected,
}

impl ClientEvent {
    /// Map a server message to the event a front end cares about.
    ///
    /// Returns `None` for lines a client has no use for, such as unknown
    /// tags or client-only message shapes.
    pub fn from_message(msg: Message) -> Option<Self> {
        let event = match msg {
            Message::Relayed { sender, body, .. } => Self::MessageReceived(format!("{sender}: {body}")),
            Message::Whisper { sender, body } => Self::PrivateMessageReceived { sender, text: body },
            Message::UserList(names) => Self::UserListUpdated(names),
            Message::Error(text) => Self::ErrorOccurred(text),
            Message::Success(text) | Message::SystemNotice(text) => Self::MessageReceived(text),
            Message::UserJoined(name) => Self::MessageReceived(format!("{name} joined")),
            Message::UserLeft(name) => Self::MessageReceived(format!("{name} left")),
            Message::Login(_)
            | Message::Logout(_)
            | Message::Broadcast(_)
            | Message::Private { .. }
            | Message::Unknown { .. } => return None,
        };
        Some(event)
    }
}

/// Client side of one chat connection.
pub struct ChatClient {
    writer: LineWriter,
    events: mpsc::Sender<ClientEvent>,
    /// Name sent with the last `LOGIN`, used by `logout`.
    username: Option<String>,
}

impl ChatClient {
    /// Connect to a server and start listening for its messages.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<(Self, mpsc::Receiver<ClientEvent>)> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = transport::split(stream, DEFAULT_MAX_LINE_LEN);
        let (events, rx) = mpsc::channel(EVENT_BUFFER);

        tokio::spawn(listen(reader, events.clone()));

        Ok((
            Self {
                writer,
                events,
                username: None,
            },
            rx,
        ))
    }

    /// The name used in the last login request, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Ask the server for `username`. The outcome arrives as an event.
    pub async fn login(&mut self, username: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            self.report("username must not be empty").await;
            return Ok(());
        }
        self.send(Message::Login(username.to_string())).await?;
        self.username = Some(username.to_string());
        Ok(())
    }

    /// Send `text` to everyone online.
    pub async fn send_broadcast(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            self.report("message must not be empty").await;
            return Ok(());
        }
        self.send(Message::Broadcast(text.to_string())).await
    }

    /// Send `text` to `target` only.
    pub async fn send_private(&mut self, target: &str, text: &str) -> Result<()> {
        if target.trim().is_empty() || text.trim().is_empty() {
            self.report("target and message must not be empty").await;
            return Ok(());
        }
        self.send(Message::Private {
            target: target.trim().to_string(),
            body: text.to_string(),
        })
        .await
    }

    /// Log out if logged in, then close the connection.
    ///
    /// `Disconnected` is delivered once the server has hung up.
    pub async fn logout(mut self) -> Result<()> {
        if let Some(name) = self.username.take() {
            if let Err(e) = self.send(Message::Logout(name)).await {
                debug!(error = %e, "logout not delivered");
            }
        }
        self.writer.close().await
    }

    async fn send(&mut self, msg: Message) -> Result<()> {
        let result = match msg.encode() {
            Ok(line) => self.writer.send(line).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            self.report(&e.to_string()).await;
        }
        result
    }

    async fn report(&self, text: &str) {
        // A closed channel means nobody is listening any more.
        let _ = self
            .events
            .send(ClientEvent::ErrorOccurred(text.to_string()))
            .await;
    }
}

async fn listen(mut reader: LineReader, events: mpsc::Sender<ClientEvent>) {
    while let Some(item) = reader.next().await {
        let line = match item {
            Ok(Ok(line)) => line,
            Ok(Err(e)) => {
                warn!(error = %e, "skipping unreadable line from server");
                continue;
            }
            Err(e) => {
                debug!(error = %e, "connection read failed");
                break;
            }
        };

        let event = match Message::decode(&line, Direction::Outbound) {
            Ok(msg) => ClientEvent::from_message(msg),
            Err(e) => {
                warn!(error = %e, line = %line, "malformed line from server");
                None
            }
        };
        if let Some(event) = event {
            if events.send(event).await.is_err() {
                return;
            }
        }
    }
    let _ = events.send(ClientEvent::Disconnected).await;
}
