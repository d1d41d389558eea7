//! Channel/NetworkTV-mode change request body.

use crate::error::Result;
use crate::primitive::*;

/// Selects a channel, for `ViewSetCh` and `NwTVIDSetCh`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetChInfo {
    pub use_sid: bool,
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub use_bon_ch: bool,
    pub space_or_id: i32,
    pub ch_or_mode: i32,
}

impl SetChInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let use_sid = read_i32(buf, pos, end)? != 0;
        let onid = read_u16(buf, pos, end)?;
        let tsid = read_u16(buf, pos, end)?;
        let sid = read_u16(buf, pos, end)?;
        let use_bon_ch = read_i32(buf, pos, end)? != 0;
        let space_or_id = read_i32(buf, pos, end)?;
        let ch_or_mode = read_i32(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            use_sid,
            onid,
            tsid,
            sid,
            use_bon_ch,
            space_or_id,
            ch_or_mode,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_i32(buf, self.use_sid as i32);
        write_u16(buf, self.onid);
        write_u16(buf, self.tsid);
        write_u16(buf, self.sid);
        write_i32(buf, self.use_bon_ch as i32);
        write_i32(buf, self.space_or_id);
        write_i32(buf, self.ch_or_mode);
        end_struct_write(buf, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let v = SetChInfo {
            use_sid: true,
            onid: 1,
            tsid: 2,
            sid: 3,
            use_bon_ch: false,
            space_or_id: 4,
            ch_or_mode: 5,
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = SetChInfo::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }
}
