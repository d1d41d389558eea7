//! Transport layer for the EDCB CtrlCmd protocol: named pipe, TCP, and the
//! stream-relay handshake, all bounded by a single shared deadline per
//! exchange (§4.4).

pub mod config;
pub mod error;
pub mod pipe;
pub mod relay;
pub mod tcp;

pub use config::{Deadline, TransportConfig, DEFAULT_PIPE_NAME};
pub use error::{Result, TransportError};

/// Sends one framed request and waits for its framed response, dispatching
/// to the pipe or TCP transport according to `config`. Returns the response
/// header's return code alongside the raw payload bytes; the caller is
/// responsible for checking `ret == CMD_SUCCESS` and decoding the payload.
pub async fn send_and_receive(
    config: &TransportConfig,
    deadline: Deadline,
    request: &[u8],
) -> Result<(i32, Vec<u8>)> {
    match config {
        TransportConfig::Pipe { pipe_name } => pipe::send_and_receive(pipe_name, deadline, request).await,
        TransportConfig::Tcp { host, port } => {
            tcp::send_and_receive(host, *port, deadline, request).await
        }
    }
}

/// Checks whether the configured named pipe currently exists, without
/// sending anything. Only meaningful in pipe mode.
pub fn pipe_exists(pipe_name: &str) -> bool {
    pipe::exists(pipe_name)
}
