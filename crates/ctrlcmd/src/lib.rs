//! A client for EDCB/EpgTimerSrv's CtrlCmd binary RPC protocol.
//!
//! [`Client`] speaks the protocol over either a Windows named pipe or TCP
//! (§3), encoding requests and decoding responses with the structure codecs
//! in `ctrlcmd-proto` over the transport in `ctrlcmd-transport`. The `text`
//! module covers the ancillary, non-RPC text formats EDCB ships alongside
//! the protocol itself (§4.6).

mod client;
mod error;
mod opcode;
pub mod text;

pub use client::Client;
pub use error::{Error, Result};

pub use ctrlcmd_proto as proto;
pub use ctrlcmd_transport as transport;
