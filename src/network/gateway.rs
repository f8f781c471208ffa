//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listening socket and spawns a Connection task for
//! each incoming client. On shutdown it stops accepting and waits for every
//! connection task to finish its close path.

use crate::handlers::Router;
use crate::network::Connection;
use crate::state::SessionIdGenerator;
use crate::telemetry::spans;
use anyhow::Context as _;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, error, info, instrument};

/// Pause after a failed accept (e.g. out of file descriptors).
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    router: Arc<Router>,
    ids: SessionIdGenerator,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(addr: SocketAddr, router: Arc<Router>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        Ok(Self {
            listener,
            router,
            ids: SessionIdGenerator::new(),
        })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections until `shutdown` fires.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let Self {
            listener,
            router,
            ids,
        } = self;
        let tracker = TaskTracker::new();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let id = ids.next();
                        info!(id, %addr, "Connection accepted");

                        let connection = Connection::new(
                            id,
                            stream,
                            addr,
                            Arc::clone(&router),
                            shutdown.child_token(),
                        );
                        tracker.spawn(connection.run().instrument(spans::connection(id, addr)));
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }
        }

        drop(listener);
        tracker.close();
        info!(open = tracker.len(), "Stopped accepting, waiting for connections");
        tracker.wait().await;
        info!("Gateway stopped");
        Ok(())
    }
}
