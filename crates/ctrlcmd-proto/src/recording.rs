//! Recording reservation and recorded-file structure codecs (§3, §4.2).

use time::OffsetDateTime;

use crate::error::Result;
use crate::primitive::*;

/// Recording settings, shared by `ReserveData` and the auto-add rule types.
///
/// The optional margin pair is encoded on the wire by a leading use-margin
/// byte; both margin values are always present in the struct body (zero when
/// the pair is absent) so that the writer never needs to omit a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecSettingData {
    pub rec_mode: i32,
    pub priority: u8,
    pub tuijyuu_flag: bool,
    pub service_mode: u32,
    pub pittari_flag: bool,
    pub bat_file_path: String,
    pub margin: Option<(i32, i32)>,
    pub continue_rec_flag: bool,
    pub partial_rec_flag: u8,
    pub tuner_id: u32,
    pub partial_rec_folder: Vec<PartialRecFolder>,
}

impl RecSettingData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let rec_mode = read_i32(buf, pos, end)?;
        let priority = read_u8(buf, pos, end)?;
        let tuijyuu_flag = read_u8(buf, pos, end)? != 0;
        let service_mode = read_u32(buf, pos, end)?;
        let pittari_flag = read_u8(buf, pos, end)? != 0;
        let bat_file_path = read_string(buf, pos, end)?;
        let use_margin = read_u8(buf, pos, end)?;
        let start_margin = read_i32(buf, pos, end)?;
        let end_margin = read_i32(buf, pos, end)?;
        let margin = (use_margin != 0).then_some((start_margin, end_margin));
        let continue_rec_flag = read_u8(buf, pos, end)? != 0;
        let partial_rec_flag = read_u8(buf, pos, end)?;
        let tuner_id = read_u32(buf, pos, end)?;
        let partial_rec_folder =
            read_vector(buf, pos, end, |b, p, l| PartialRecFolder::read(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self {
            rec_mode,
            priority,
            tuijyuu_flag,
            service_mode,
            pittari_flag,
            bat_file_path,
            margin,
            continue_rec_flag,
            partial_rec_flag,
            tuner_id,
            partial_rec_folder,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_i32(buf, self.rec_mode);
        write_u8(buf, self.priority);
        write_u8(buf, self.tuijyuu_flag as u8);
        write_u32(buf, self.service_mode);
        write_u8(buf, self.pittari_flag as u8);
        write_string(buf, &self.bat_file_path);
        write_u8(buf, self.margin.is_some() as u8);
        let (start_margin, end_margin) = self.margin.unwrap_or((0, 0));
        write_i32(buf, start_margin);
        write_i32(buf, end_margin);
        write_u8(buf, self.continue_rec_flag as u8);
        write_u8(buf, self.partial_rec_flag);
        write_u32(buf, self.tuner_id);
        write_vector(buf, &self.partial_rec_folder, |b, e| e.write(b));
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecFolder {
    pub rec_folder: String,
    pub write_plug_in: String,
}

impl PartialRecFolder {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let rec_folder = read_string(buf, pos, end)?;
        let write_plug_in = read_string(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            rec_folder,
            write_plug_in,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_string(buf, &self.rec_folder);
        write_string(buf, &self.write_plug_in);
        end_struct_write(buf, start);
    }
}

/// A recording reservation. Carries three legacy positional fields (a byte,
/// a string, an int) that are always zero/empty; readers consume and discard
/// them rather than surfacing them (§4.2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReserveData {
    pub title: String,
    pub start_time: OffsetDateTime,
    pub duration_sec: i32,
    pub station_name: String,
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub eid: u16,
    pub comment: String,
    pub reserve_id: i32,
    pub overlap_mode: u8,
    pub start_time_epg: OffsetDateTime,
    pub rec_setting: RecSettingData,
    pub rec_file_name_list: Vec<String>,
}

impl ReserveData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let title = read_string(buf, pos, end)?;
        let start_time = read_systemtime(buf, pos, end)?;
        let duration_sec = read_i32(buf, pos, end)?;
        let station_name = read_string(buf, pos, end)?;
        let onid = read_u16(buf, pos, end)?;
        let tsid = read_u16(buf, pos, end)?;
        let sid = read_u16(buf, pos, end)?;
        let eid = read_u16(buf, pos, end)?;
        let comment = read_string(buf, pos, end)?;
        let reserve_id = read_i32(buf, pos, end)?;
        // reserved: byte, discarded
        let _ = read_u8(buf, pos, end)?;
        let overlap_mode = read_u8(buf, pos, end)?;
        let start_time_epg = read_systemtime(buf, pos, end)?;
        // reserved: string, discarded
        let _ = read_string(buf, pos, end)?;
        let rec_setting = RecSettingData::read(buf, pos, end)?;
        // reserved: int, discarded
        let _ = read_i32(buf, pos, end)?;
        let rec_file_name_list = read_vector(buf, pos, end, |b, p, l| read_string(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self {
            title,
            start_time,
            duration_sec,
            station_name,
            onid,
            tsid,
            sid,
            eid,
            comment,
            reserve_id,
            overlap_mode,
            start_time_epg,
            rec_setting,
            rec_file_name_list,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_string(buf, &self.title);
        write_systemtime(buf, self.start_time);
        write_i32(buf, self.duration_sec);
        write_string(buf, &self.station_name);
        write_u16(buf, self.onid);
        write_u16(buf, self.tsid);
        write_u16(buf, self.sid);
        write_u16(buf, self.eid);
        write_string(buf, &self.comment);
        write_i32(buf, self.reserve_id);
        write_u8(buf, 0);
        write_u8(buf, self.overlap_mode);
        write_systemtime(buf, self.start_time_epg);
        write_string(buf, "");
        self.rec_setting.write(buf);
        write_i32(buf, 0);
        write_vector(buf, &self.rec_file_name_list, |b, e| write_string(b, e));
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecFileInfo {
    pub id: i32,
    pub rec_file_path: String,
    pub title: String,
    pub start_time: OffsetDateTime,
    pub duration_sec: i32,
    pub service_name: String,
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub eid: u16,
    pub drops: i64,
    pub scrambles: i64,
    pub rec_status: i32,
    pub start_time_epg: OffsetDateTime,
    pub comment: String,
    pub program_info: String,
    pub err_info: String,
    pub protect_flag: u8,
}

impl RecFileInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let id = read_i32(buf, pos, end)?;
        let rec_file_path = read_string(buf, pos, end)?;
        let title = read_string(buf, pos, end)?;
        let start_time = read_systemtime(buf, pos, end)?;
        let duration_sec = read_i32(buf, pos, end)?;
        let service_name = read_string(buf, pos, end)?;
        let onid = read_u16(buf, pos, end)?;
        let tsid = read_u16(buf, pos, end)?;
        let sid = read_u16(buf, pos, end)?;
        let eid = read_u16(buf, pos, end)?;
        let drops = read_i64(buf, pos, end)?;
        let scrambles = read_i64(buf, pos, end)?;
        let rec_status = read_i32(buf, pos, end)?;
        let start_time_epg = read_systemtime(buf, pos, end)?;
        let comment = read_string(buf, pos, end)?;
        let program_info = read_string(buf, pos, end)?;
        let err_info = read_string(buf, pos, end)?;
        let protect_flag = read_u8(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            id,
            rec_file_path,
            title,
            start_time,
            duration_sec,
            service_name,
            onid,
            tsid,
            sid,
            eid,
            drops,
            scrambles,
            rec_status,
            start_time_epg,
            comment,
            program_info,
            err_info,
            protect_flag,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_i32(buf, self.id);
        write_string(buf, &self.rec_file_path);
        write_string(buf, &self.title);
        write_systemtime(buf, self.start_time);
        write_i32(buf, self.duration_sec);
        write_string(buf, &self.service_name);
        write_u16(buf, self.onid);
        write_u16(buf, self.tsid);
        write_u16(buf, self.sid);
        write_u16(buf, self.eid);
        write_i64(buf, self.drops);
        write_i64(buf, self.scrambles);
        write_i32(buf, self.rec_status);
        write_systemtime(buf, self.start_time_epg);
        write_string(buf, &self.comment);
        write_string(buf, &self.program_info);
        write_string(buf, &self.err_info);
        write_u8(buf, self.protect_flag);
        end_struct_write(buf, start);
    }
}

/// Pairs a `RecFileInfo` id with the set of related file paths produced by
/// a single recording run (original + partial-rec outputs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecFileSetInfo {
    pub id: i32,
    pub rec_file_path: String,
    pub partial_rec_file_path_list: Vec<String>,
}

impl RecFileSetInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let id = read_i32(buf, pos, end)?;
        let rec_file_path = read_string(buf, pos, end)?;
        let partial_rec_file_path_list = read_vector(buf, pos, end, |b, p, l| read_string(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self {
            id,
            rec_file_path,
            partial_rec_file_path_list,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_i32(buf, self.id);
        write_string(buf, &self.rec_file_path);
        write_vector(buf, &self.partial_rec_file_path_list, |b, e| write_string(b, e));
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunerReserveInfo {
    pub tuner_id: u32,
    pub reserve_list: Vec<i32>,
}

impl TunerReserveInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let tuner_id = read_u32(buf, pos, end)?;
        let reserve_list = read_vector(buf, pos, end, |b, p, l| read_i32(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self {
            tuner_id,
            reserve_list,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u32(buf, self.tuner_id);
        write_vector(buf, &self.reserve_list, |b, e| write_i32(b, *e));
        end_struct_write(buf, start);
    }
}

/// A file transferred whole by `FileCopy2`: name plus raw payload bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileData {
    pub name: String,
    pub data: Vec<u8>,
}

impl FileData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let name = read_string(buf, pos, end)?;
        let data_size = read_i32(buf, pos, end)?;
        // reserved: int, discarded
        let _ = read_i32(buf, pos, end)?;
        let data_size = usize::try_from(data_size).unwrap_or(0);
        let available = end.min(buf.len()).saturating_sub(*pos);
        let take = data_size.min(available);
        let data = buf[*pos..*pos + take].to_vec();
        end_struct_read(pos, end);
        Ok(Self { name, data })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_string(buf, &self.name);
        write_i32(buf, self.data.len() as i32);
        write_i32(buf, 0);
        buf.extend_from_slice(&self.data);
        end_struct_write(buf, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rec_setting() -> RecSettingData {
        RecSettingData {
            rec_mode: 0,
            priority: 3,
            tuijyuu_flag: true,
            service_mode: 0,
            pittari_flag: false,
            bat_file_path: String::new(),
            margin: Some((30, 60)),
            continue_rec_flag: false,
            partial_rec_flag: 0,
            tuner_id: 0,
            partial_rec_folder: vec![],
        }
    }

    #[test]
    fn rec_setting_data_round_trips_with_margin() {
        let v = sample_rec_setting();
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = RecSettingData::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn rec_setting_data_without_margin_discards_zeroed_pair() {
        let v = RecSettingData {
            margin: None,
            ..sample_rec_setting()
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = RecSettingData::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(back.margin, None);
        assert_eq!(v, back);
    }

    #[test]
    fn reserve_data_round_trips_and_discards_reserved_fields() {
        let v = ReserveData {
            title: "title".into(),
            start_time: crate::time::epoch_sentinel(),
            duration_sec: 1800,
            station_name: "NHK総合".into(),
            onid: 1,
            tsid: 2,
            sid: 3,
            eid: 4,
            comment: String::new(),
            reserve_id: 100,
            overlap_mode: 0,
            start_time_epg: crate::time::epoch_sentinel(),
            rec_setting: sample_rec_setting(),
            rec_file_name_list: vec!["foo.ts".into()],
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = ReserveData::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn file_data_round_trips_raw_bytes() {
        let v = FileData {
            name: "a.ts".into(),
            data: vec![1, 2, 3, 4, 5],
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = FileData::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }
}
