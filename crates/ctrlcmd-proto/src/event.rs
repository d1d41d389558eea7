//! `EventInfo` and its optional sub-records (§3, §4.2).

use time::OffsetDateTime;

use crate::error::Result;
use crate::primitive::*;

/// A single EPG event (program), with up to seven optional descriptor sub-records.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInfo {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub eid: u16,
    pub start_time: Option<OffsetDateTime>,
    pub duration_sec: Option<i32>,
    pub short_info: Option<ShortEventInfo>,
    pub ext_info: Option<ExtendedEventInfo>,
    pub content_info: Option<ContentInfo>,
    pub component_info: Option<ComponentInfo>,
    pub audio_info: Option<AudioComponentInfo>,
    pub event_group_info: Option<EventGroupInfo>,
    pub event_relay_info: Option<EventGroupInfo>,
    pub free_ca_flag: u8,
}

impl EventInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let onid = read_u16(buf, pos, end)?;
        let tsid = read_u16(buf, pos, end)?;
        let sid = read_u16(buf, pos, end)?;
        let eid = read_u16(buf, pos, end)?;

        let start_time_flag = read_u8(buf, pos, end)?;
        let start_time_value = read_systemtime(buf, pos, end)?;
        let start_time = (start_time_flag != 0).then_some(start_time_value);

        let duration_flag = read_u8(buf, pos, end)?;
        let duration_value = read_i32(buf, pos, end)?;
        let duration_sec = (duration_flag != 0).then_some(duration_value);

        let short_info = read_optional_sub(buf, pos, end, ShortEventInfo::read)?;
        let ext_info = read_optional_sub(buf, pos, end, ExtendedEventInfo::read)?;
        let content_info = read_optional_sub(buf, pos, end, ContentInfo::read)?;
        let component_info = read_optional_sub(buf, pos, end, ComponentInfo::read)?;
        let audio_info = read_optional_sub(buf, pos, end, AudioComponentInfo::read)?;
        let event_group_info = read_optional_sub(buf, pos, end, EventGroupInfo::read)?;
        let event_relay_info = read_optional_sub(buf, pos, end, EventGroupInfo::read)?;

        let free_ca_flag = read_u8(buf, pos, end)?;
        end_struct_read(pos, end);

        Ok(Self {
            onid,
            tsid,
            sid,
            eid,
            start_time,
            duration_sec,
            short_info,
            ext_info,
            content_info,
            component_info,
            audio_info,
            event_group_info,
            event_relay_info,
            free_ca_flag,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u16(buf, self.onid);
        write_u16(buf, self.tsid);
        write_u16(buf, self.sid);
        write_u16(buf, self.eid);

        write_u8(buf, self.start_time.is_some() as u8);
        write_systemtime(buf, self.start_time.unwrap_or(crate::time::epoch_sentinel()));

        write_u8(buf, self.duration_sec.is_some() as u8);
        write_i32(buf, self.duration_sec.unwrap_or(0));

        write_optional_sub(buf, &self.short_info, |b, v| v.write(b));
        write_optional_sub(buf, &self.ext_info, |b, v| v.write(b));
        write_optional_sub(buf, &self.content_info, |b, v| v.write(b));
        write_optional_sub(buf, &self.component_info, |b, v| v.write(b));
        write_optional_sub(buf, &self.audio_info, |b, v| v.write(b));
        write_optional_sub(buf, &self.event_group_info, |b, v| v.write(b));
        write_optional_sub(buf, &self.event_relay_info, |b, v| v.write(b));

        write_u8(buf, self.free_ca_flag);
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortEventInfo {
    pub event_name: String,
    pub text_char: String,
}

impl ShortEventInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let event_name = read_string(buf, pos, end)?;
        let text_char = read_string(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            event_name,
            text_char,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_string(buf, &self.event_name);
        write_string(buf, &self.text_char);
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedEventInfo {
    pub text_char: String,
}

impl ExtendedEventInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let text_char = read_string(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self { text_char })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_string(buf, &self.text_char);
        end_struct_write(buf, start);
    }
}

/// A single content/genre nibble pair. Stored byte-swapped relative to the
/// wire (§4.1/§4.2): the in-memory value is the logically meaningful one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentData {
    pub content_nibble: u16,
    pub user_nibble: u16,
}

impl ContentData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let cn = read_u16(buf, pos, end)?;
        let un = read_u16(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            content_nibble: cn.swap_bytes(),
            user_nibble: un.swap_bytes(),
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u16(buf, self.content_nibble.swap_bytes());
        write_u16(buf, self.user_nibble.swap_bytes());
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentInfo {
    pub nibble_list: Vec<ContentData>,
}

impl ContentInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let nibble_list = read_vector(buf, pos, end, |b, p, l| ContentData::read(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self { nibble_list })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_vector(buf, &self.nibble_list, |b, e| e.write(b));
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentInfo {
    pub stream_content: u8,
    pub component_type: u8,
    pub component_tag: u8,
    pub text_char: String,
}

impl ComponentInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let stream_content = read_u8(buf, pos, end)?;
        let component_type = read_u8(buf, pos, end)?;
        let component_tag = read_u8(buf, pos, end)?;
        let text_char = read_string(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            stream_content,
            component_type,
            component_tag,
            text_char,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u8(buf, self.stream_content);
        write_u8(buf, self.component_type);
        write_u8(buf, self.component_tag);
        write_string(buf, &self.text_char);
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioComponentInfoData {
    pub stream_content: u8,
    pub component_type: u8,
    pub component_tag: u8,
    pub stream_type: u8,
    pub simulcast_group_tag: u8,
    pub es_multi_lingual_flag: u8,
    pub main_component_flag: u8,
    pub quality_indicator: u8,
    pub sampling_rate: u8,
    pub text_char: String,
}

impl AudioComponentInfoData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let stream_content = read_u8(buf, pos, end)?;
        let component_type = read_u8(buf, pos, end)?;
        let component_tag = read_u8(buf, pos, end)?;
        let stream_type = read_u8(buf, pos, end)?;
        let simulcast_group_tag = read_u8(buf, pos, end)?;
        let es_multi_lingual_flag = read_u8(buf, pos, end)?;
        let main_component_flag = read_u8(buf, pos, end)?;
        let quality_indicator = read_u8(buf, pos, end)?;
        let sampling_rate = read_u8(buf, pos, end)?;
        let text_char = read_string(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            stream_content,
            component_type,
            component_tag,
            stream_type,
            simulcast_group_tag,
            es_multi_lingual_flag,
            main_component_flag,
            quality_indicator,
            sampling_rate,
            text_char,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u8(buf, self.stream_content);
        write_u8(buf, self.component_type);
        write_u8(buf, self.component_tag);
        write_u8(buf, self.stream_type);
        write_u8(buf, self.simulcast_group_tag);
        write_u8(buf, self.es_multi_lingual_flag);
        write_u8(buf, self.main_component_flag);
        write_u8(buf, self.quality_indicator);
        write_u8(buf, self.sampling_rate);
        write_string(buf, &self.text_char);
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioComponentInfo {
    pub component_list: Vec<AudioComponentInfoData>,
}

impl AudioComponentInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let component_list = read_vector(buf, pos, end, |b, p, l| AudioComponentInfoData::read(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self { component_list })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_vector(buf, &self.component_list, |b, e| e.write(b));
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub eid: u16,
}

impl EventData {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let onid = read_u16(buf, pos, end)?;
        let tsid = read_u16(buf, pos, end)?;
        let sid = read_u16(buf, pos, end)?;
        let eid = read_u16(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            onid,
            tsid,
            sid,
            eid,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u16(buf, self.onid);
        write_u16(buf, self.tsid);
        write_u16(buf, self.sid);
        write_u16(buf, self.eid);
        end_struct_write(buf, start);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventGroupInfo {
    pub group_type: u8,
    pub event_data_list: Vec<EventData>,
}

impl EventGroupInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let group_type = read_u8(buf, pos, end)?;
        let event_data_list = read_vector(buf, pos, end, |b, p, l| EventData::read(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self {
            group_type,
            event_data_list,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u8(buf, self.group_type);
        write_vector(buf, &self.event_data_list, |b, e| e.write(b));
        end_struct_write(buf, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_data_byte_swaps_on_the_wire() {
        let v = ContentData {
            content_nibble: 0xAB00,
            user_nibble: 0xCD00,
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        // struct intro (4 bytes) + swapped u16 content_nibble + swapped u16 user_nibble
        assert_eq!(&buf[4..], &[0x00, 0xAB, 0x00, 0xCD]);
        let mut pos = 0;
        let back = ContentData::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn event_info_minimal_round_trips_with_all_subrecords_absent() {
        let v = EventInfo {
            onid: 1,
            tsid: 2,
            sid: 3,
            eid: 4,
            start_time: None,
            duration_sec: None,
            short_info: None,
            ext_info: None,
            content_info: None,
            component_info: None,
            audio_info: None,
            event_group_info: None,
            event_relay_info: None,
            free_ca_flag: 0,
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = EventInfo::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn event_info_round_trips_with_all_subrecords_present() {
        let v = EventInfo {
            onid: 1,
            tsid: 2,
            sid: 3,
            eid: 4,
            start_time: Some(crate::time::epoch_sentinel()),
            duration_sec: Some(1800),
            short_info: Some(ShortEventInfo {
                event_name: "title".into(),
                text_char: "desc".into(),
            }),
            ext_info: Some(ExtendedEventInfo {
                text_char: "- section\nbody".into(),
            }),
            content_info: Some(ContentInfo {
                nibble_list: vec![ContentData {
                    content_nibble: 0x0100,
                    user_nibble: 0x0f0f,
                }],
            }),
            component_info: Some(ComponentInfo {
                stream_content: 1,
                component_type: 0xb1,
                component_tag: 0,
                text_char: "video".into(),
            }),
            audio_info: Some(AudioComponentInfo {
                component_list: vec![AudioComponentInfoData {
                    stream_content: 2,
                    component_type: 1,
                    component_tag: 0x10,
                    stream_type: 0x11,
                    simulcast_group_tag: 0xff,
                    es_multi_lingual_flag: 0,
                    main_component_flag: 1,
                    quality_indicator: 1,
                    sampling_rate: 7,
                    text_char: "audio".into(),
                }],
            }),
            event_group_info: Some(EventGroupInfo {
                group_type: 1,
                event_data_list: vec![EventData {
                    onid: 1,
                    tsid: 2,
                    sid: 3,
                    eid: 5,
                }],
            }),
            event_relay_info: None,
            free_ca_flag: 1,
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = EventInfo::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn optional_subrecord_sentinel_peek_matches_spec() {
        // An absent sub-record is indistinguishable on the wire from peeking
        // a literal 4 ahead of the cursor.
        let mut buf = Vec::new();
        write_i32(&mut buf, 4);
        let mut pos = 0;
        let v: Option<ShortEventInfo> =
            read_optional_sub(&buf, &mut pos, buf.len(), ShortEventInfo::read).unwrap();
        assert!(v.is_none());

        let mut buf2 = Vec::new();
        ShortEventInfo {
            event_name: "x".into(),
            text_char: "y".into(),
        }
        .write(&mut buf2);
        let mut pos2 = 0;
        let v2: Option<ShortEventInfo> =
            read_optional_sub(&buf2, &mut pos2, buf2.len(), ShortEventInfo::read).unwrap();
        assert!(v2.is_some());
    }
}
