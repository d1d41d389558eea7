//! Wire codec and structure types for the EDCB CtrlCmd protocol.
//!
//! This crate is pure and synchronous: it only knows how to turn typed
//! records into bytes and back. It performs no I/O — the transport crate
//! owns sockets and pipes, and the facade crate owns the operation
//! catalogue. Every structure codec follows the same shape: a
//! length-prefixed struct intro, fields read in declaration order, and a
//! cursor snapped to the struct's declared end so that unknown trailing
//! bytes from a newer server are silently skipped (see [`primitive`]).

pub mod autoadd;
pub mod channel;
pub mod error;
pub mod event;
pub mod notify;
pub mod primitive;
pub mod recording;
pub mod search;
pub mod service;
pub mod time;

pub use autoadd::{AutoAddData, ManualAutoAddData};
pub use channel::SetChInfo;
pub use error::{ReadError, Result};
pub use event::{
    AudioComponentInfo, AudioComponentInfoData, ComponentInfo, ContentData, ContentInfo,
    EventData, EventGroupInfo, EventInfo, ExtendedEventInfo, ShortEventInfo,
};
pub use notify::NotifySrvInfo;
pub use recording::{
    FileData, PartialRecFolder, RecFileInfo, RecFileSetInfo, RecSettingData, ReserveData,
    TunerReserveInfo,
};
pub use search::{SearchDateInfo, SearchKeyInfo};
pub use service::{ServiceEventInfo, ServiceInfo};
