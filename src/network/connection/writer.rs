//! The single writer of a connection.
//!
//! Everything bound for a client, whether a direct reply or router fan-out,
//! arrives on one queue and is written here in order.

use chat_proto::Message;
use chat_proto::transport::LineWriter;
use futures_util::SinkExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Drain `outgoing` into `writer` until `closing` fires or the transport fails.
///
/// Messages already queued when `closing` fires are still written. Returns
/// once the socket is flushed and shut down, or on the first write error.
pub(super) async fn run(
    mut writer: LineWriter,
    mut outgoing: mpsc::Receiver<Arc<Message>>,
    closing: CancellationToken,
) {
    loop {
        let msg = tokio::select! {
            biased;
            msg = outgoing.recv() => match msg {
                Some(msg) => msg,
                None => break,
            },
            _ = closing.cancelled() => break,
        };

        let line = match msg.encode() {
            Ok(line) => line,
            Err(e) => {
                warn!(kind = %msg.tag(), error = %e, "Dropping unencodable message");
                continue;
            }
        };
        if let Err(e) = writer.send(line).await {
            debug!(error = %e, "Write error");
            return;
        }
    }

    if let Err(e) = writer.close().await {
        debug!(error = %e, "Error closing connection");
    }
}
