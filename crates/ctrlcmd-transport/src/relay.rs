//! Stream-relay handshake (§4.5) and the viewer SrvPipe lookup (§9).
//!
//! Both are deliberately synchronous and blocking: the caller expects a
//! ready, owning socket/file handle on return, not a suspendable future that
//! might be polled again later against a handle that no longer makes sense.
//! The retry wrappers run the blocking call on a dedicated worker thread via
//! [`tokio::task::spawn_blocking`] so they can still be awaited from async
//! code without internally converting the handshake itself to non-blocking
//! form.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

const CMD_SUCCESS: i32 = 1;
const CMD_RELAY_VIEW_STREAM: i32 = 301;

const RETRY_INITIAL: Duration = Duration::from_millis(100);
const RETRY_MAX: Duration = Duration::from_secs(1);
const RETRY_STEP: Duration = Duration::from_millis(100);

fn build_relay_request(process_id: i32) -> [u8; 16] {
    let mut buf = [0u8; 16];
    buf[0..4].copy_from_slice(&CMD_RELAY_VIEW_STREAM.to_le_bytes());
    buf[4..8].copy_from_slice(&4i32.to_le_bytes());
    buf[8..12].copy_from_slice(&process_id.to_le_bytes());
    // trailing 4 bytes are unused padding to keep the buffer a round size;
    // only the first 12 bytes are ever sent.
    buf
}

/// Performs one synchronous stream-relay handshake attempt. Returns the
/// still-open socket on success; any failure along the way (connect, write,
/// short read, non-success return code) yields `None` and the socket, if
/// one was opened, is closed.
pub fn open_view_stream_once(host: &str, port: u16, process_id: i32, connect_timeout: Duration) -> Option<TcpStream> {
    let request = build_relay_request(process_id);
    let addr = (host, port)
        .to_socket_addrs()
        .ok()?
        .next()?;
    let mut stream = TcpStream::connect_timeout(&addr, connect_timeout).ok()?;
    stream.set_read_timeout(Some(connect_timeout)).ok()?;
    stream.set_write_timeout(Some(connect_timeout)).ok()?;

    if stream.write_all(&request[0..12]).is_err() {
        return None;
    }

    let mut header = [0u8; 8];
    let mut read_total = 0;
    while read_total < header.len() {
        match stream.read(&mut header[read_total..]) {
            Ok(0) => return None,
            Ok(n) => read_total += n,
            Err(_) => return None,
        }
    }

    let ret = i32::from_le_bytes(header[0..4].try_into().unwrap());
    (ret == CMD_SUCCESS).then_some(stream)
}

/// Probes [`open_view_stream_once`] at growing intervals (0.1s up to 1.0s)
/// until it succeeds or `timeout` elapses — the server may need time to spawn
/// the viewer process before its relay port accepts connections.
pub async fn open_view_stream(
    host: String,
    port: u16,
    process_id: i32,
    connect_timeout: Duration,
    timeout: Duration,
) -> Option<TcpStream> {
    let deadline = Instant::now() + timeout;
    let mut wait = RETRY_INITIAL;
    loop {
        let host = host.clone();
        let attempt = tokio::task::spawn_blocking(move || {
            open_view_stream_once(&host, port, process_id, connect_timeout)
        })
        .await
        .ok()
        .flatten();
        if let Some(stream) = attempt {
            return Some(stream);
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(wait).await;
        wait = (wait + RETRY_STEP).min(RETRY_MAX);
    }
}

fn pipe_candidate_path(port: u16, process_id: i32) -> String {
    format!(r"\\.\pipe\SendTSTCP_{port}_{process_id}")
}

/// Opens the first `\\.\pipe\SendTSTCP_<port>_<pid>` pipe that exists, trying
/// ports 0 through 29. Which port corresponds to which tuner/viewer instance
/// is not documented upstream; "first success wins" is preserved as-is.
#[cfg(windows)]
pub fn open_pipe_stream_once(process_id: i32) -> Option<std::fs::File> {
    use std::fs::OpenOptions;
    for port in 0..30u16 {
        let path = pipe_candidate_path(port, process_id);
        if let Ok(file) = OpenOptions::new().read(true).open(&path) {
            return Some(file);
        }
    }
    None
}

#[cfg(not(windows))]
pub fn open_pipe_stream_once(_process_id: i32) -> Option<std::fs::File> {
    None
}

pub async fn open_pipe_stream(process_id: i32, timeout: Duration) -> Option<std::fs::File> {
    let deadline = Instant::now() + timeout;
    let mut wait = RETRY_INITIAL;
    loop {
        let attempt =
            tokio::task::spawn_blocking(move || open_pipe_stream_once(process_id))
                .await
                .ok()
                .flatten();
        if attempt.is_some() {
            return attempt;
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(wait).await;
        wait = (wait + RETRY_STEP).min(RETRY_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_request_frames_opcode_301_with_pid_payload() {
        let req = build_relay_request(1234);
        assert_eq!(&req[0..4], &301i32.to_le_bytes());
        assert_eq!(&req[4..8], &4i32.to_le_bytes());
        assert_eq!(&req[8..12], &1234i32.to_le_bytes());
    }

    #[test]
    fn pipe_candidate_path_follows_naming_convention() {
        assert_eq!(
            pipe_candidate_path(3, 4242),
            r"\\.\pipe\SendTSTCP_3_4242"
        );
    }
}
