//! Auto-add rule structure codecs (§3): recurring reservations derived from
//! either a keyword search (`AutoAddData`) or a fixed weekly time slot
//! (`ManualAutoAddData`).

use crate::error::Result;
use crate::primitive::*;
use crate::recording::RecSettingData;
use crate::search::SearchKeyInfo;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoAddData {
    pub data_id: i32,
    pub search_info: SearchKeyInfo,
    pub rec_setting: RecSettingData,
    pub add_count: i32,
}

impl AutoAddData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let data_id = read_i32(buf, pos, end)?;
        let search_info = SearchKeyInfo::read(buf, pos, end, true)?;
        let rec_setting = RecSettingData::read(buf, pos, end)?;
        let add_count = read_i32(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            data_id,
            search_info,
            rec_setting,
            add_count,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_i32(buf, self.data_id);
        self.search_info.write(buf, true);
        self.rec_setting.write(buf);
        write_i32(buf, self.add_count);
        end_struct_write(buf, start);
    }
}

/// A recurring reservation pinned to a fixed weekly time slot rather than a
/// search. `day_of_week_flag` is a 7-bit mask (bit 0 = Sunday).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualAutoAddData {
    pub data_id: i32,
    pub day_of_week_flag: u8,
    pub start_time: i32,
    pub duration_sec: i32,
    pub title: String,
    pub station_name: String,
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub rec_setting: RecSettingData,
}

impl ManualAutoAddData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let data_id = read_i32(buf, pos, end)?;
        let day_of_week_flag = read_u8(buf, pos, end)?;
        let start_time = read_i32(buf, pos, end)?;
        let duration_sec = read_i32(buf, pos, end)?;
        let title = read_string(buf, pos, end)?;
        let station_name = read_string(buf, pos, end)?;
        let onid = read_u16(buf, pos, end)?;
        let tsid = read_u16(buf, pos, end)?;
        let sid = read_u16(buf, pos, end)?;
        let rec_setting = RecSettingData::read(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            data_id,
            day_of_week_flag,
            start_time,
            duration_sec,
            title,
            station_name,
            onid,
            tsid,
            sid,
            rec_setting,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_i32(buf, self.data_id);
        write_u8(buf, self.day_of_week_flag);
        write_i32(buf, self.start_time);
        write_i32(buf, self.duration_sec);
        write_string(buf, &self.title);
        write_string(buf, &self.station_name);
        write_u16(buf, self.onid);
        write_u16(buf, self.tsid);
        write_u16(buf, self.sid);
        self.rec_setting.write(buf);
        end_struct_write(buf, start);
    }
}
