//! `NotifySrvInfo` structure codec (§3, §4.3): the payload of the
//! `GetStatusNotify2` long-poll, carrying the server's current event
//! counter plus the most recent status change it describes.

use time::OffsetDateTime;

use crate::error::Result;
use crate::primitive::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifySrvInfo {
    pub notify_id: i32,
    pub time: OffsetDateTime,
    pub param1: i32,
    pub param2: i32,
    pub param3: String,
    pub param4: String,
    pub count: u32,
}

impl NotifySrvInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let notify_id = read_i32(buf, pos, end)?;
        let time = read_systemtime(buf, pos, end)?;
        let param1 = read_i32(buf, pos, end)?;
        let param2 = read_i32(buf, pos, end)?;
        let param3 = read_string(buf, pos, end)?;
        let param4 = read_string(buf, pos, end)?;
        let count = read_u32(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            notify_id,
            time,
            param1,
            param2,
            param3,
            param4,
            count,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_i32(buf, self.notify_id);
        write_systemtime(buf, self.time);
        write_i32(buf, self.param1);
        write_i32(buf, self.param2);
        write_string(buf, &self.param3);
        write_string(buf, &self.param4);
        write_u32(buf, self.count);
        end_struct_write(buf, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_srv_info_round_trips() {
        let v = NotifySrvInfo {
            notify_id: 1,
            time: crate::time::epoch_sentinel(),
            param1: 0,
            param2: 0,
            param3: String::new(),
            param4: String::new(),
            count: 43,
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = NotifySrvInfo::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }
}
