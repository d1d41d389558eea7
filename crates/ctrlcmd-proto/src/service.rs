//! `ServiceInfo` and `ServiceEventInfo` structure codecs.

use crate::error::Result;
use crate::event::EventInfo;
use crate::primitive::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInfo {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub service_type: u8,
    pub partial_reception_flag: u8,
    pub service_provider_name: String,
    pub service_name: String,
    pub network_name: String,
    pub ts_name: String,
    pub remote_control_key_id: u8,
}

impl ServiceInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let onid = read_u16(buf, pos, end)?;
        let tsid = read_u16(buf, pos, end)?;
        let sid = read_u16(buf, pos, end)?;
        let service_type = read_u8(buf, pos, end)?;
        let partial_reception_flag = read_u8(buf, pos, end)?;
        let service_provider_name = read_string(buf, pos, end)?;
        let service_name = read_string(buf, pos, end)?;
        let network_name = read_string(buf, pos, end)?;
        let ts_name = read_string(buf, pos, end)?;
        let remote_control_key_id = read_u8(buf, pos, end)?;
        end_struct_read(pos, end);
        Ok(Self {
            onid,
            tsid,
            sid,
            service_type,
            partial_reception_flag,
            service_provider_name,
            service_name,
            network_name,
            ts_name,
            remote_control_key_id,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        write_u16(buf, self.onid);
        write_u16(buf, self.tsid);
        write_u16(buf, self.sid);
        write_u8(buf, self.service_type);
        write_u8(buf, self.partial_reception_flag);
        write_string(buf, &self.service_provider_name);
        write_string(buf, &self.service_name);
        write_string(buf, &self.network_name);
        write_string(buf, &self.ts_name);
        write_u8(buf, self.remote_control_key_id);
        end_struct_write(buf, start);
    }
}

/// Pairs one `ServiceInfo` with the events airing on it (§3).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceEventInfo {
    pub service_info: ServiceInfo,
    pub event_list: Vec<EventInfo>,
}

impl ServiceEventInfo {
    pub fn read(buf: &[u8], pos: &mut usize, limit: usize) -> Result<Self> {
        let end = read_struct_intro(buf, pos, limit)?;
        let service_info = ServiceInfo::read(buf, pos, end)?;
        let event_list = read_vector(buf, pos, end, |b, p, l| EventInfo::read(b, p, l))?;
        end_struct_read(pos, end);
        Ok(Self {
            service_info,
            event_list,
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = begin_struct_write(buf);
        self.service_info.write(buf);
        write_vector(buf, &self.event_list, |b, e| e.write(b));
        end_struct_write(buf, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServiceInfo {
        ServiceInfo {
            onid: 1,
            tsid: 2,
            sid: 3,
            service_type: 1,
            partial_reception_flag: 0,
            service_provider_name: "NHK".into(),
            service_name: "NHK総合".into(),
            network_name: "地上波".into(),
            ts_name: "関東".into(),
            remote_control_key_id: 1,
        }
    }

    #[test]
    fn service_info_round_trips() {
        let v = sample();
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = ServiceInfo::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn service_event_info_round_trips_with_empty_event_list() {
        let v = ServiceEventInfo {
            service_info: sample(),
            event_list: vec![],
        };
        let mut buf = Vec::new();
        v.write(&mut buf);
        let mut pos = 0;
        let back = ServiceEventInfo::read(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(v, back);
    }
}
