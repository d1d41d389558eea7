//! The `Client` facade: one typed async method per CtrlCmd operation (§4.3).
//!
//! Every method here does the same three things: encode a request payload
//! with the proto crate's structure codecs, round-trip it through the
//! transport crate under one shared deadline, and decode (or discard) the
//! response. Internally this is plumbed through [`crate::error::Result`]
//! with `?`; at the public boundary every method collapses that to
//! `Option<T>` or `bool`, matching callers' expectations that a failed RPC
//! simply yields "no result" rather than an exception (§7, §9).

use std::net::TcpStream;
use std::time::Duration;

use ctrlcmd_proto::primitive::{read_i32, read_string, read_vector, write_i32, write_string, write_u16, write_vector};
use ctrlcmd_proto::{
    AutoAddData, EventInfo, FileData, ManualAutoAddData, NotifySrvInfo, RecFileInfo, ReserveData,
    SearchKeyInfo, ServiceEventInfo, ServiceInfo, SetChInfo, TunerReserveInfo,
};
use ctrlcmd_transport::{Deadline, TransportConfig};

use crate::error::{Error, Result};
use crate::opcode;

/// Holds the client's mutable transport configuration (§3). Operations are
/// stateless beyond this: each call owns its own connection and releases it
/// before returning (§5).
#[derive(Debug, Clone)]
pub struct Client {
    connect_timeout_sec: f64,
    transport: TransportConfig,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            connect_timeout_sec: 15.0,
            transport: TransportConfig::default(),
        }
    }
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to named-pipe mode, clearing any TCP host/port (§3's
    /// mutual-exclusion invariant).
    pub fn set_pipe_setting(&mut self, pipe_name: impl Into<String>) {
        self.transport = TransportConfig::Pipe {
            pipe_name: pipe_name.into(),
        };
    }

    /// Switches to TCP mode.
    pub fn set_nw_setting(&mut self, host: impl Into<String>, port: u16) {
        self.transport = TransportConfig::Tcp {
            host: host.into(),
            port,
        };
    }

    pub fn set_connect_timeout_sec(&mut self, timeout_sec: f64) {
        self.connect_timeout_sec = timeout_sec;
    }

    /// Checks whether the configured pipe currently exists. Always `false`
    /// in TCP mode.
    pub fn pipe_exists(&self) -> bool {
        match &self.transport {
            TransportConfig::Pipe { pipe_name } => ctrlcmd_transport::pipe_exists(pipe_name),
            TransportConfig::Tcp { .. } => false,
        }
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connect_timeout_sec.max(0.0))
    }

    fn deadline(&self) -> Deadline {
        Deadline::starting_now(self.connect_timeout())
    }

    async fn call_v1(&self, op: i32, payload: &[u8]) -> Result<Vec<u8>> {
        let request = opcode::build_v1(op, payload);
        let (ret, response) =
            ctrlcmd_transport::send_and_receive(&self.transport, self.deadline(), &request).await?;
        if ret != opcode::CMD_SUCCESS {
            log::debug!("opcode {op} returned failure code {ret}");
            return Err(Error::Protocol(ret));
        }
        Ok(response)
    }

    async fn call_v2(&self, op: i32, payload: &[u8]) -> Result<Vec<u8>> {
        let request = opcode::build_v2(op, payload);
        let (ret, response) =
            ctrlcmd_transport::send_and_receive(&self.transport, self.deadline(), &request).await?;
        if ret != opcode::CMD_SUCCESS {
            log::debug!("opcode {op} returned failure code {ret}");
            return Err(Error::Protocol(ret));
        }
        opcode::strip_v2_header(&response)
            .map(<[u8]>::to_vec)
            .ok_or(Error::StaleVersion)
    }

    // -- §4.3 operation catalogue, in table order --

    pub async fn view_set_bon_driver(&self, name: &str) -> bool {
        let mut payload = Vec::new();
        write_string(&mut payload, name);
        self.call_v1(opcode::VIEW_SET_BON_DRIVER, &payload).await.is_ok()
    }

    pub async fn view_get_bon_driver(&self) -> Option<String> {
        let response = self.call_v1(opcode::VIEW_GET_BON_DRIVER, &[]).await.ok()?;
        let mut pos = 0;
        read_string(&response, &mut pos, response.len()).ok()
    }

    pub async fn view_set_ch(&self, info: &SetChInfo) -> bool {
        let mut payload = Vec::new();
        info.write(&mut payload);
        self.call_v1(opcode::VIEW_SET_CH, &payload).await.is_ok()
    }

    pub async fn view_app_close(&self) -> bool {
        self.call_v1(opcode::VIEW_APP_CLOSE, &[]).await.is_ok()
    }

    /// Stream-relay handshake (§4.5). TCP mode only; returns `None`
    /// immediately without any I/O if the client is in pipe mode.
    pub async fn relay_view_stream(&self, process_id: i32, timeout: Duration) -> Option<TcpStream> {
        let TransportConfig::Tcp { host, port } = &self.transport else {
            return None;
        };
        ctrlcmd_transport::relay::open_view_stream(
            host.clone(),
            *port,
            process_id,
            self.connect_timeout(),
            timeout,
        )
        .await
    }

    pub async fn del_reserve(&self, reserve_ids: &[i32]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, reserve_ids, |b, e| write_i32(b, *e));
        self.call_v1(opcode::DEL_RESERVE, &payload).await.is_ok()
    }

    pub async fn enum_tuner_reserve(&self) -> Option<Vec<TunerReserveInfo>> {
        let response = self.call_v1(opcode::ENUM_TUNER_RESERVE, &[]).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            TunerReserveInfo::read(b, p, l)
        })
        .ok()
    }

    pub async fn del_rec_info(&self, info_ids: &[i32]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, info_ids, |b, e| write_i32(b, *e));
        self.call_v1(opcode::DEL_REC_INFO, &payload).await.is_ok()
    }

    pub async fn chg_path_rec_info(&self, list: &[RecFileInfo]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v1(opcode::CHG_PATH_REC_INFO, &payload).await.is_ok()
    }

    pub async fn enum_service(&self) -> Option<Vec<ServiceInfo>> {
        let response = self.call_v1(opcode::ENUM_SERVICE, &[]).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            ServiceInfo::read(b, p, l)
        })
        .ok()
    }

    pub async fn search_pg(&self, key_list: &[SearchKeyInfo]) -> Option<Vec<EventInfo>> {
        let mut payload = Vec::new();
        write_vector(&mut payload, key_list, |b, e| e.write(b, false));
        let response = self.call_v1(opcode::SEARCH_PG, &payload).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            EventInfo::read(b, p, l)
        })
        .ok()
    }

    pub async fn enum_pg_info_ex(&self, service_time_list: &[i64]) -> Option<Vec<ServiceEventInfo>> {
        let mut payload = Vec::new();
        write_vector(&mut payload, service_time_list, |b, e| {
            ctrlcmd_proto::primitive::write_i64(b, *e)
        });
        let response = self.call_v1(opcode::ENUM_PG_INFO_EX, &payload).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            ServiceEventInfo::read(b, p, l)
        })
        .ok()
    }

    pub async fn enum_pg_arc(&self, service_time_list: &[i64]) -> Option<Vec<ServiceEventInfo>> {
        let mut payload = Vec::new();
        write_vector(&mut payload, service_time_list, |b, e| {
            ctrlcmd_proto::primitive::write_i64(b, *e)
        });
        let response = self.call_v1(opcode::ENUM_PG_ARC, &payload).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            ServiceEventInfo::read(b, p, l)
        })
        .ok()
    }

    pub async fn del_auto_add(&self, data_ids: &[i32]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, data_ids, |b, e| write_i32(b, *e));
        self.call_v1(opcode::DEL_AUTO_ADD, &payload).await.is_ok()
    }

    pub async fn del_manu_add(&self, data_ids: &[i32]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, data_ids, |b, e| write_i32(b, *e));
        self.call_v1(opcode::DEL_MANU_ADD, &payload).await.is_ok()
    }

    pub async fn file_copy(&self, name: &str) -> Option<Vec<u8>> {
        let mut payload = Vec::new();
        write_string(&mut payload, name);
        self.call_v1(opcode::FILE_COPY, &payload).await.ok()
    }

    /// `index` selects which BonDriver plugin directory to enumerate; EDCB
    /// defines only 1 and 2.
    pub async fn enum_plugin(&self, index: u16) -> Option<Vec<String>> {
        let mut payload = Vec::new();
        write_u16(&mut payload, index);
        let response = self.call_v1(opcode::ENUM_PLUGIN, &payload).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            read_string(b, p, l)
        })
        .ok()
    }

    pub async fn nwtv_id_set_ch(&self, info: &SetChInfo) -> Option<i32> {
        let mut payload = Vec::new();
        info.write(&mut payload);
        let response = self.call_v1(opcode::NWTV_ID_SET_CH, &payload).await.ok()?;
        let mut pos = 0;
        read_i32(&response, &mut pos, response.len()).ok()
    }

    pub async fn nwtv_id_close(&self, nwtv_id: i32) -> bool {
        let mut payload = Vec::new();
        write_i32(&mut payload, nwtv_id);
        self.call_v1(opcode::NWTV_ID_CLOSE, &payload).await.is_ok()
    }

    pub async fn get_network_path(&self, name: &str) -> Option<String> {
        let mut payload = Vec::new();
        write_string(&mut payload, name);
        let response = self.call_v1(opcode::GET_NETWORK_PATH, &payload).await.ok()?;
        let mut pos = 0;
        read_string(&response, &mut pos, response.len()).ok()
    }

    pub async fn enum_reserve2(&self) -> Option<Vec<ReserveData>> {
        let response = self.call_v2(opcode::ENUM_RESERVE2, &[]).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            ReserveData::read(b, p, l)
        })
        .ok()
    }

    pub async fn add_reserve2(&self, list: &[ReserveData]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v2(opcode::ADD_RESERVE2, &payload).await.is_ok()
    }

    pub async fn chg_reserve2(&self, list: &[ReserveData]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v2(opcode::CHG_RESERVE2, &payload).await.is_ok()
    }

    pub async fn chg_protect_rec_info2(&self, list: &[RecFileInfo]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v2(opcode::CHG_PROTECT_REC_INFO2, &payload).await.is_ok()
    }

    pub async fn enum_recinfo_basic2(&self) -> Option<Vec<RecFileInfo>> {
        let response = self.call_v2(opcode::ENUM_RECINFO_BASIC2, &[]).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            RecFileInfo::read(b, p, l)
        })
        .ok()
    }

    pub async fn get_recinfo2(&self, info_id: i32) -> Option<RecFileInfo> {
        let mut payload = Vec::new();
        write_i32(&mut payload, info_id);
        let response = self.call_v2(opcode::GET_RECINFO2, &payload).await.ok()?;
        let mut pos = 0;
        RecFileInfo::read(&response, &mut pos, response.len()).ok()
    }

    pub async fn file_copy2(&self, name_list: &[String]) -> Option<Vec<FileData>> {
        let mut payload = Vec::new();
        write_vector(&mut payload, name_list, |b, e| write_string(b, e));
        let response = self.call_v2(opcode::FILE_COPY2, &payload).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            FileData::read(b, p, l)
        })
        .ok()
    }

    pub async fn enum_auto_add2(&self) -> Option<Vec<AutoAddData>> {
        let response = self.call_v2(opcode::ENUM_AUTO_ADD2, &[]).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            AutoAddData::read(b, p, l)
        })
        .ok()
    }

    pub async fn add_auto_add2(&self, list: &[AutoAddData]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v2(opcode::ADD_AUTO_ADD2, &payload).await.is_ok()
    }

    pub async fn chg_auto_add2(&self, list: &[AutoAddData]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v2(opcode::CHG_AUTO_ADD2, &payload).await.is_ok()
    }

    pub async fn enum_manu_add2(&self) -> Option<Vec<ManualAutoAddData>> {
        let response = self.call_v2(opcode::ENUM_MANU_ADD2, &[]).await.ok()?;
        let mut pos = 0;
        read_vector(&response, &mut pos, response.len(), |b, p, l| {
            ManualAutoAddData::read(b, p, l)
        })
        .ok()
    }

    pub async fn add_manu_add2(&self, list: &[ManualAutoAddData]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v2(opcode::ADD_MANU_ADD2, &payload).await.is_ok()
    }

    pub async fn chg_manu_add2(&self, list: &[ManualAutoAddData]) -> bool {
        let mut payload = Vec::new();
        write_vector(&mut payload, list, |b, e| e.write(b));
        self.call_v2(opcode::CHG_MANU_ADD2, &payload).await.is_ok()
    }

    /// Long-polls the server's notification counter (§4.3). `target_count`
    /// of 0 returns the current status immediately; any other value blocks
    /// (within the usual connect-timeout deadline) until the server's
    /// counter exceeds it.
    pub async fn get_status_notify2(&self, target_count: u32) -> Option<NotifySrvInfo> {
        let mut payload = Vec::new();
        ctrlcmd_proto::primitive::write_u32(&mut payload, target_count);
        let response = self.call_v2(opcode::GET_STATUS_NOTIFY2, &payload).await.ok()?;
        let mut pos = 0;
        NotifySrvInfo::read(&response, &mut pos, response.len()).ok()
    }
}
