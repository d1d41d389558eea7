//! Transport-layer failure modes.

use thiserror::Error;

/// Everything that can go wrong moving bytes to and from the server.
///
/// Per the protocol's error handling design, callers at the facade boundary
/// never distinguish between these variants — any `TransportError` collapses
/// to "no result". The variants exist purely so [`log`] call sites can say
/// something useful.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("connection closed before the 8-byte response header was received")]
    ShortHeader,

    #[error("connection closed before the declared {declared}-byte payload was received")]
    ShortPayload { declared: usize },

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("named pipe {0:?} does not exist")]
    PipeNotFound(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
