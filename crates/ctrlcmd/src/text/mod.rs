//! Text helpers for the ancillary data EDCB ships alongside the RPC
//! protocol itself: `ChSet5.txt`, `LogoData.ini`, logo directory indexes,
//! and the extended-event-text sectioning convention (§4.6).

mod bom;
mod chset5;
mod extended_text;
mod logo;

pub use bom::decode_bytes;
pub use chset5::{parse as parse_chset5, ChSet5Item};
pub use extended_text::split_sections as split_extended_text;
pub use logo::{lookup_logo_file_name, lookup_logo_id};
