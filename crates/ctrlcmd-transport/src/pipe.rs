//! Named-pipe transport (§4.4).
//!
//! `\\.\pipe\<name>` is opened for read/write, written, flushed, and read
//! back. A momentarily busy or not-yet-created pipe is retried with a fixed
//! 10 ms backoff until the shared deadline expires; a definitive "not found"
//! exits the retry loop immediately, since that means the server simply
//! isn't running on this host.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::config::Deadline;
use crate::error::{Result, TransportError};

const RETRY_BACKOFF: Duration = Duration::from_millis(10);

fn pipe_path(pipe_name: &str) -> String {
    format!(r"\\.\pipe\{pipe_name}")
}

#[cfg(windows)]
pub async fn send_and_receive(
    pipe_name: &str,
    deadline: Deadline,
    request: &[u8],
) -> Result<(i32, Vec<u8>)> {
    use tokio::net::windows::named_pipe::ClientOptions;

    let path = pipe_path(pipe_name);

    let mut client = loop {
        match ClientOptions::new().open(&path) {
            Ok(client) => break client,
            Err(e) if e.raw_os_error() == Some(2) => {
                // ERROR_FILE_NOT_FOUND: the server is not listening at all.
                return Err(TransportError::PipeNotFound(path));
            }
            Err(e) => {
                if deadline.has_expired() {
                    return Err(TransportError::Connect(e));
                }
                tokio::time::sleep(RETRY_BACKOFF.min(deadline.remaining())).await;
            }
        }
    };

    client
        .write_all(request)
        .await
        .map_err(TransportError::Write)?;
    client.flush().await.map_err(TransportError::Write)?;

    let mut header = [0u8; 8];
    client
        .read_exact(&mut header)
        .await
        .map_err(|_| TransportError::ShortHeader)?;
    let ret = i32::from_le_bytes(header[0..4].try_into().unwrap());
    let size = i32::from_le_bytes(header[4..8].try_into().unwrap());
    let size = usize::try_from(size).unwrap_or(0);

    let mut payload = vec![0u8; size];
    client
        .read_exact(&mut payload)
        .await
        .map_err(|_| TransportError::ShortPayload { declared: size })?;

    Ok((ret, payload))
}

/// Non-Windows builds never have a CtrlCmd named pipe available: EDCB is a
/// Windows-only server and the pipe transport only makes sense when talking
/// to one running on the same host.
#[cfg(not(windows))]
pub async fn send_and_receive(
    pipe_name: &str,
    _deadline: Deadline,
    _request: &[u8],
) -> Result<(i32, Vec<u8>)> {
    Err(TransportError::PipeNotFound(pipe_path(pipe_name)))
}

#[cfg(windows)]
pub fn exists(pipe_name: &str) -> bool {
    use tokio::net::windows::named_pipe::ClientOptions;
    match ClientOptions::new().open(pipe_path(pipe_name)) {
        Ok(_) => true,
        Err(e) => e.raw_os_error() != Some(2),
    }
}

#[cfg(not(windows))]
pub fn exists(_pipe_name: &str) -> bool {
    false
}
