//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task, paired with a writer task:
//!
//! ```text
//!    ┌──────────────────────── reader task ─────────────────────────┐
//!    │  FramedRead ─▶ decode ─▶ Router ─▶ replies / fan-out ──┐     │
//!    │       ▲                                                │     │
//!    │  tokio::select! (shutdown, writer exit, next line)     │     │
//!    └────────────────────────────────────────────────────────┼─────┘
//!                                                             ▼
//!    other connections' fan-out ─────────────────▶ [Outgoing Queue]
//!                                                             │
//!    ┌──────────────────────── writer task ───────────────────▼─────┐
//!    │                       FramedWrite                            │
//!    └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Whatever ends the read loop (logout, EOF, read error, write error or
//! server shutdown) the close path runs once, queued output is flushed, and
//! the socket is shut down.

mod error_handling;
mod writer;

use error_handling::{ReadErrorAction, classify_read_error};

use crate::error::HandlerError;
use crate::handlers::Router;
use crate::state::{Session, SessionId};
use chat_proto::transport;
use chat_proto::{Direction, Message};
use futures_util::StreamExt;
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

/// A client connection handler.
pub struct Connection {
    session: Arc<Session>,
    stream: TcpStream,
    router: Arc<Router>,
    outgoing: mpsc::Receiver<Arc<Message>>,
    shutdown: CancellationToken,
}

impl Connection {
    /// Create a connection handler and its session.
    ///
    /// `shutdown` should be a child of the server's token.
    pub fn new(
        id: SessionId,
        stream: TcpStream,
        addr: SocketAddr,
        router: Arc<Router>,
        shutdown: CancellationToken,
    ) -> Self {
        let limits = router.limits();
        let (tx, outgoing) = mpsc::channel(limits.outbound_queue);
        let session = Arc::new(Session::new(id, addr, tx, limits.send_timeout()));
        Self {
            session,
            stream,
            router,
            outgoing,
            shutdown,
        }
    }

    /// Run the connection until it closes.
    pub async fn run(self) {
        let Self {
            session,
            stream,
            router,
            outgoing,
            shutdown,
        } = self;
        info!("Client connected");

        let (mut reader, writer) = transport::split(stream, router.limits().max_line_len);
        let closing = CancellationToken::new();
        let mut writer_task =
            tokio::spawn(writer::run(writer, outgoing, closing.clone()).in_current_span());
        let mut writer_done = false;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    if let Err(e) = session.try_send(Message::SystemNotice("server shutting down".to_string())) {
                        debug!(error = %e, "Shutdown notice not queued");
                    }
                    info!("Closing for server shutdown");
                    break;
                }

                _ = &mut writer_task => {
                    writer_done = true;
                    info!("Write side closed");
                    break;
                }

                item = reader.next() => match item {
                    Some(Ok(Ok(line))) => {
                        if handle_line(&router, &session, &line).await.is_break() {
                            break;
                        }
                    }
                    Some(Ok(Err(e))) | Some(Err(e)) => match classify_read_error(&e) {
                        ReadErrorAction::Reply(reply) => {
                            debug!(error = %e, "Unreadable line");
                            if session.send(reply).await.is_err() {
                                break;
                            }
                        }
                        ReadErrorAction::Disconnect => {
                            info!(error = %e, "Read error");
                            break;
                        }
                    },
                    None => {
                        info!("Client disconnected");
                        break;
                    }
                }
            }
        }

        drop(reader);
        router.close(&session).await;
        closing.cancel();

        if !writer_done {
            let limit = router.limits().send_timeout();
            match tokio::time::timeout(limit, &mut writer_task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Writer task failed"),
                Err(_) => {
                    debug!("Writer did not drain in time");
                    writer_task.abort();
                }
            }
        }

        info!(
            username = session.username(),
            connected_at = %session.connected_at,
            "Connection closed"
        );
    }
}

/// Decode one line and hand it to the router.
async fn handle_line(router: &Router, session: &Arc<Session>, line: &str) -> ControlFlow<()> {
    let result = match Message::decode(line, Direction::Inbound) {
        Ok(msg) => router.dispatch(session, &msg).await,
        Err(e) => {
            debug!(error = %e, line = %line, "Malformed message");
            return match classify_read_error(&e) {
                ReadErrorAction::Reply(reply) => reply_or_break(session, reply).await,
                ReadErrorAction::Disconnect => ControlFlow::Break(()),
            };
        }
    };

    match result {
        Ok(()) => ControlFlow::Continue(()),
        Err(HandlerError::Quit) => ControlFlow::Break(()),
        Err(HandlerError::Send(e)) => {
            debug!(error = %e, "Reply not delivered");
            ControlFlow::Break(())
        }
        Err(e) => match e.to_reply() {
            Some(reply) => reply_or_break(session, reply).await,
            None => {
                warn!(error = %e, "Handler failed");
                ControlFlow::Continue(())
            }
        },
    }
}

async fn reply_or_break(session: &Session, reply: Message) -> ControlFlow<()> {
    match session.send(reply).await {
        Ok(()) => ControlFlow::Continue(()),
        Err(_) => ControlFlow::Break(()),
    }
}
