//! Internal error type unifying transport and parse failures.
//!
//! Per the protocol's error-handling design (§7), none of this is ever
//! exposed to callers: every public [`crate::Client`] method collapses a
//! `Result<T, Error>` to `Option<T>` (or `bool` for fire-and-forget
//! operations). The type exists only so the implementation has one place to
//! `?`-propagate through, and so `log::debug!` call sites can say why a call
//! failed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] ctrlcmd_transport::TransportError),

    #[error(transparent)]
    Read(#[from] ctrlcmd_proto::ReadError),

    #[error("server returned failure code {0}")]
    Protocol(i32),

    #[error("v2 response carried a stale protocol version")]
    StaleVersion,
}

pub type Result<T> = std::result::Result<T, Error>;
