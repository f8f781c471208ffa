//! Per-connection resource limits.

use serde::Deserialize;
use std::time::Duration;

/// Per-connection resource limits.
///
/// These bound how much a single client can make the server buffer, and how
/// long delivery waits on a client that is not reading.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted line in bytes, excluding the newline (default: 4096).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Longest accepted username in characters (default: 32).
    #[serde(default = "default_max_username_len")]
    pub max_username_len: usize,
    /// Outbound queue capacity per session (default: 64).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
    /// Milliseconds a send waits on a full queue before giving up (default: 5000).
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl LimitsConfig {
    /// `send_timeout_ms` as a [`Duration`].
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            max_username_len: default_max_username_len(),
            outbound_queue: default_outbound_queue(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

fn default_max_line_len() -> usize {
    chat_proto::DEFAULT_MAX_LINE_LEN
}

fn default_max_username_len() -> usize {
    32
}

fn default_outbound_queue() -> usize {
    64
}

fn default_send_timeout_ms() -> u64 {
    5000
}
