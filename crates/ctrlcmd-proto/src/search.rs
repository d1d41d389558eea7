//! `SearchKeyInfo` and `SearchDateInfo` structure codecs (§3, §4.2, §8).
//!
//! `SearchKeyInfo.and_key` smuggles three flags as ordered text prefixes on
//! the wire; in memory they are plain fields. `chk_rec_day` similarly
//! tunnels a boolean through a `+40000` offset. Both encodings are applied
//! in the exact order the wire format expects (§9).

use crate::error::Result;
use crate::event::ContentData;
use crate::primitive::*;

const KEY_DISABLED_PREFIX: &str = "^!{999}";
const CASE_SENSITIVE_PREFIX: &str = "C!{999}";
const DURATION_PREFIX: &str = "D!{1";
const DURATION_SUFFIX: &str = "}";
const REC_NO_SERVICE_OFFSET: i32 = 40000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDateInfo {
    pub day_of_week_flag: u8,
    pub start_hour: i32,
    pub start_min: i32,
    pub end_hour: i32,
    pub end_min: i32,
}

impl SearchDateInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let day_of_week_flag = read_u8(buf, pos, end)?;
        let start_hour = read_i32(buf, pos, end)?;
        let start_min = read_i32(buf, pos, end)?;
        let end_hour = read_i32(buf, pos, end)?;
        let end_min = read_i32(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            day_of_week_flag,
            start_hour,
            start_min,
            end_hour,
            end_min,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u8(buf, self.day_of_week_flag);
        write_i32(buf, self.start_hour);
        write_i32(buf, self.start_min);
        write_i32(buf, self.end_hour);
        write_i32(buf, self.end_min);
        end_struct_write(buf, start);
    }
}

/// A keyword search rule. `and_key`/`key_disabled`/`case_sensitive`/
/// `chk_duration_min`/`chk_duration_max` are exposed as plain fields; the
/// in-band wire encoding lives entirely in [`SearchKeyInfo::read`]/
/// [`SearchKeyInfo::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchKeyInfo {
    pub and_key: String,
    pub not_key: String,
    pub key_disabled: bool,
    pub case_sensitive: bool,
    pub reg_exp_flag: bool,
    pub title_only_flag: bool,
    pub content_list: Vec<ContentData>,
    pub date_list: Vec<SearchDateInfo>,
    pub service_list: Vec<i64>,
    pub video_list: Vec<u8>,
    pub audio_list: Vec<u8>,
    pub aimai_flag: bool,
    pub not_contet_flag: bool,
    pub free_ca_flag: bool,
    pub chk_rec_day: i32,
    pub chk_rec_no_service: bool,
    pub chk_rec_end: bool,
    pub chk_duration_min: i32,
    pub chk_duration_max: i32,
}

impl SearchKeyInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize, is_v2: bool) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let raw_and_key = read_string(buf, pos, end)?;
        let (and_key, key_disabled, case_sensitive, chk_duration_min, chk_duration_max) =
            decode_and_key(&raw_and_key);
        let not_key = read_string(buf, pos, end)?;
        let reg_exp_flag = read_u8(buf, pos, end)? != 0;
        let title_only_flag = read_u8(buf, pos, end)? != 0;
        let content_list = read_vector(buf, pos, end, |b, p, l| ContentData::read(b, p, l))?;
        let date_list = read_vector(buf, pos, end, |b, p, l| SearchDateInfo::read(b, p, l))?;
        let service_list = read_vector(buf, pos, end, |b, p, l| read_i64(b, p, l))?;
        let video_list = read_vector(buf, pos, end, |b, p, l| read_u8(b, p, l))?;
        let audio_list = read_vector(buf, pos, end, |b, p, l| read_u8(b, p, l))?;
        let aimai_flag = read_u8(buf, pos, end)? != 0;
        let not_contet_flag = read_u8(buf, pos, end)? != 0;
        let free_ca_flag = read_u8(buf, pos, end)? != 0;
        let raw_rec_day = read_i32(buf, pos, end)?;
        let chk_rec_no_service = raw_rec_day >= REC_NO_SERVICE_OFFSET;
        let chk_rec_day = if chk_rec_no_service {
            raw_rec_day - REC_NO_SERVICE_OFFSET
        } else {
            raw_rec_day
        };
        let chk_rec_end = if is_v2 {
            read_u8(buf, pos, end)? != 0
        } else {
            false
        };
        end_struct_read(pos, end);
        Ok(Self {
            and_key,
            not_key,
            key_disabled,
            case_sensitive,
            reg_exp_flag,
            title_only_flag,
            content_list,
            date_list,
            service_list,
            video_list,
            audio_list,
            aimai_flag,
            not_contet_flag,
            free_ca_flag,
            chk_rec_day,
            chk_rec_no_service,
            chk_rec_end,
            chk_duration_min,
            chk_duration_max,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>, is_v2: bool) {
        let start = begin_struct_write(buf);
        write_string(buf, &encode_and_key(self));
        write_string(buf, &self.not_key);
        write_u8(buf, self.reg_exp_flag as u8);
        write_u8(buf, self.title_only_flag as u8);
        write_vector(buf, &self.content_list, |b, e| e.write(b));
        write_vector(buf, &self.date_list, |b, e| e.write(b));
        write_vector(buf, &self.service_list, |b, e| write_i64(b, *e));
        write_vector(buf, &self.video_list, |b, e| write_u8(b, *e));
        write_vector(buf, &self.audio_list, |b, e| write_u8(b, *e));
        write_u8(buf, self.aimai_flag as u8);
        write_u8(buf, self.not_contet_flag as u8);
        write_u8(buf, self.free_ca_flag as u8);
        let rec_day = self.chk_rec_day + if self.chk_rec_no_service { REC_NO_SERVICE_OFFSET } else { 0 };
        write_i32(buf, rec_day);
        if is_v2 {
            write_u8(buf, self.chk_rec_end as u8);
        }
        end_struct_write(buf, start);
    }
}

fn encode_and_key(v: &SearchKeyInfo) -> String {
    let mut out = String::new();
    if v.key_disabled {
        out.push_str(KEY_DISABLED_PREFIX);
    }
    if v.case_sensitive {
        out.push_str(CASE_SENSITIVE_PREFIX);
    }
    if v.chk_duration_min > 0 || v.chk_duration_max > 0 {
        let packed = (v.chk_duration_min * 10000 + v.chk_duration_max).rem_euclid(100_000_000);
        out.push_str(DURATION_PREFIX);
        out.push_str(&format!("{packed:08}"));
        out.push_str(DURATION_SUFFIX);
    }
    out.push_str(&v.and_key);
    out
}

fn decode_and_key(raw: &str) -> (String, bool, bool, i32, i32) {
    let mut rest = raw;
    let key_disabled = rest.starts_with(KEY_DISABLED_PREFIX);
    if key_disabled {
        rest = &rest[KEY_DISABLED_PREFIX.len()..];
    }
    let case_sensitive = rest.starts_with(CASE_SENSITIVE_PREFIX);
    if case_sensitive {
        rest = &rest[CASE_SENSITIVE_PREFIX.len()..];
    }
    let mut chk_duration_min = 0;
    let mut chk_duration_max = 0;
    if let Some(after_prefix) = rest.strip_prefix(DURATION_PREFIX) {
        if let Some(digits_end) = after_prefix.find(DURATION_SUFFIX) {
            let digits = &after_prefix[..digits_end];
            if digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(packed) = digits.parse::<i32>() {
                    chk_duration_min = packed / 10000;
                    chk_duration_max = packed % 10000;
                    rest = &after_prefix[digits_end + DURATION_SUFFIX.len()..];
                }
            }
        }
    }
    (rest.to_string(), key_disabled, case_sensitive, chk_duration_min, chk_duration_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchKeyInfo {
        SearchKeyInfo {
            and_key: "foo".into(),
            not_key: String::new(),
            key_disabled: false,
            case_sensitive: false,
            reg_exp_flag: false,
            title_only_flag: true,
            content_list: vec![],
            date_list: vec![],
            service_list: vec![],
            video_list: vec![],
            audio_list: vec![],
            aimai_flag: false,
            not_contet_flag: false,
            free_ca_flag: false,
            chk_rec_day: 0,
            chk_rec_no_service: false,
            chk_rec_end: false,
            chk_duration_min: 0,
            chk_duration_max: 0,
        }
    }

    #[test]
    fn and_key_prefixes_compose_in_documented_order() {
        let v = SearchKeyInfo {
            key_disabled: true,
            case_sensitive: true,
            chk_duration_min: 1,
            chk_duration_max: 2,
            ..sample()
        };
        assert_eq!(encode_and_key(&v), "^!{999}C!{999}D!{100010002}foo");
    }

    #[test]
    fn and_key_round_trips_through_wire_string() {
        let v = SearchKeyInfo {
            and_key: "foo".into(),
            key_disabled: true,
            ..sample()
        };
        let mut buf = Vec::new();
        write_string(&mut buf, &encode_and_key(&v));
        let mut pos = 0;
        let raw = read_string(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(raw, "^!{999}foo");
        let (and_key, key_disabled, case_sensitive, min, max) = decode_and_key(&raw);
        assert_eq!(and_key, "foo");
        assert!(key_disabled);
        assert!(!case_sensitive);
        assert_eq!((min, max), (0, 0));
    }

    #[test]
    fn search_key_info_round_trips_v1() {
        let v = sample();
        let mut buf = Vec::new();
        v.write(&mut buf, false);
        let mut pos = 0;
        let back = SearchKeyInfo::read(&buf, &mut pos, buf.len(), false).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn search_key_info_round_trips_v2_with_trailing_byte() {
        let v = SearchKeyInfo {
            chk_rec_end: true,
            chk_rec_day: 3,
            chk_rec_no_service: true,
            ..sample()
        };
        let mut buf = Vec::new();
        v.write(&mut buf, true);
        let mut pos = 0;
        let back = SearchKeyInfo::read(&buf, &mut pos, buf.len(), true).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn chk_rec_day_tunnels_no_service_flag_through_40000_offset() {
        let v = SearchKeyInfo {
            chk_rec_day: 123,
            chk_rec_no_service: true,
            ..sample()
        };
        let mut buf = Vec::new();
        v.write(&mut buf, false);
        let mut pos = 0;
        let back = SearchKeyInfo::read(&buf, &mut pos, buf.len(), false).unwrap();
        assert_eq!(back.chk_rec_day, 123);
        assert!(back.chk_rec_no_service);
    }
}
