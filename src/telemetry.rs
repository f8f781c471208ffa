//! Logging setup and standardized spans.

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}

/// Standardized span constructors for chat observability.
pub mod spans {
    use std::net::SocketAddr;
    use tracing::{Span, debug_span, info_span};

    /// Create a span for a client connection.
    pub fn connection(id: u64, addr: SocketAddr) -> Span {
        info_span!("connection", id = id, addr = %addr)
    }

    /// Create a span for one dispatched message.
    pub fn command(name: &str, session: u64, username: Option<&str>) -> Span {
        if let Some(username) = username {
            debug_span!("command", name = %name, session = session, username = %username)
        } else {
            debug_span!("command", name = %name, session = session)
        }
    }
}
