//! TCP transport (§4.4).
//!
//! All four suspension points — connect, write, drain, and each read-exact —
//! share one absolute deadline; every wait is given only the time remaining
//! on that deadline, clamped to zero. The connection is always closed before
//! returning, on every path including errors.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::Deadline;
use crate::error::{Result, TransportError};

async fn with_deadline<T>(
    deadline: Deadline,
    fut: impl std::future::Future<Output = std::io::Result<T>>,
    on_io_error: impl FnOnce(std::io::Error) -> TransportError,
) -> Result<T> {
    if deadline.has_expired() {
        return Err(TransportError::DeadlineExceeded);
    }
    match tokio::time::timeout(deadline.remaining(), fut).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(on_io_error(e)),
        Err(_) => Err(TransportError::DeadlineExceeded),
    }
}

pub async fn send_and_receive(
    host: &str,
    port: u16,
    deadline: Deadline,
    request: &[u8],
) -> Result<(i32, Vec<u8>)> {
    let mut stream = with_deadline(
        deadline,
        TcpStream::connect((host, port)),
        TransportError::Connect,
    )
    .await?;

    let result = exchange(&mut stream, deadline, request).await;
    let _ = stream.shutdown().await;
    result
}

async fn exchange(
    stream: &mut TcpStream,
    deadline: Deadline,
    request: &[u8],
) -> Result<(i32, Vec<u8>)> {
    with_deadline(deadline, stream.write_all(request), TransportError::Write).await?;
    with_deadline(deadline, stream.flush(), TransportError::Write).await?;

    let mut header = [0u8; 8];
    with_deadline(deadline, stream.read_exact(&mut header), |_| {
        TransportError::ShortHeader
    })
    .await?;
    let ret = i32::from_le_bytes(header[0..4].try_into().unwrap());
    let size = i32::from_le_bytes(header[4..8].try_into().unwrap());
    let size = usize::try_from(size).unwrap_or(0);

    let mut payload = vec![0u8; size];
    with_deadline(deadline, stream.read_exact(&mut payload), |_| {
        TransportError::ShortPayload { declared: size }
    })
    .await?;

    Ok((ret, payload))
}
