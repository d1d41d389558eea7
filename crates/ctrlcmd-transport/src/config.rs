//! Transport selection and the shared per-exchange deadline.

use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_PIPE_NAME: &str = "EpgTimerSrvNoWaitPipe";

/// Selects how a [`crate::send_and_receive`] exchange reaches the server.
///
/// Exactly one variant is active at a time; constructing a [`TransportConfig`]
/// is itself the enforcement of the "pipe XOR host" invariant (§3) — there is
/// no way to hold both a pipe name and a host at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    Pipe { pipe_name: String },
    Tcp { host: String, port: u16 },
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::Pipe {
            pipe_name: DEFAULT_PIPE_NAME.to_string(),
        }
    }
}

impl TransportConfig {
    pub fn is_tcp(&self) -> bool {
        matches!(self, TransportConfig::Tcp { .. })
    }
}

/// A single absolute monotonic deadline shared across every suspension point
/// of one request/response exchange (§4.4): connect, write, drain, and each
/// read-exact share this instead of being given independent timeouts.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn starting_now(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// Time remaining until the deadline, clamped to zero.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn has_expired(&self) -> bool {
        Instant::now() >= self.at
    }
}
