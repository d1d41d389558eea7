//! Numeric CtrlCmd opcodes and the v1/v2 request framing helpers (§4.3, §6).

pub const CMD_SUCCESS: i32 = 1;
pub const CMD_VER: u16 = 5;

pub const VIEW_SET_BON_DRIVER: i32 = 201;
pub const VIEW_GET_BON_DRIVER: i32 = 202;
pub const VIEW_SET_CH: i32 = 205;
pub const VIEW_APP_CLOSE: i32 = 208;
pub const RELAY_VIEW_STREAM: i32 = 301;
pub const DEL_RESERVE: i32 = 1014;
pub const ENUM_TUNER_RESERVE: i32 = 1016;
pub const DEL_REC_INFO: i32 = 1018;
pub const CHG_PATH_REC_INFO: i32 = 1019;
pub const ENUM_SERVICE: i32 = 1021;
pub const SEARCH_PG: i32 = 1025;
pub const ENUM_PG_INFO_EX: i32 = 1029;
pub const ENUM_PG_ARC: i32 = 1030;
pub const DEL_AUTO_ADD: i32 = 1033;
pub const DEL_MANU_ADD: i32 = 1043;
pub const FILE_COPY: i32 = 1060;
pub const ENUM_PLUGIN: i32 = 1061;
pub const NWTV_ID_SET_CH: i32 = 1073;
pub const NWTV_ID_CLOSE: i32 = 1074;
pub const GET_NETWORK_PATH: i32 = 1299;
pub const ENUM_RESERVE2: i32 = 2011;
pub const ADD_RESERVE2: i32 = 2013;
pub const CHG_RESERVE2: i32 = 2015;
pub const CHG_PROTECT_REC_INFO2: i32 = 2019;
pub const ENUM_RECINFO_BASIC2: i32 = 2020;
pub const GET_RECINFO2: i32 = 2024;
pub const FILE_COPY2: i32 = 2060;
pub const ENUM_AUTO_ADD2: i32 = 2131;
pub const ADD_AUTO_ADD2: i32 = 2132;
pub const CHG_AUTO_ADD2: i32 = 2134;
pub const ENUM_MANU_ADD2: i32 = 2141;
pub const ADD_MANU_ADD2: i32 = 2142;
pub const CHG_MANU_ADD2: i32 = 2144;
pub const GET_STATUS_NOTIFY2: i32 = 2200;

/// Builds a v1 request: `[opcode][size][payload]`, with `size` back-patched.
pub fn build_v1(opcode: i32, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + payload.len());
    buf.extend_from_slice(&opcode.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(payload);
    patch_size(&mut buf);
    buf
}

/// Builds a v2 request: identical to v1, but the payload is prefixed with a
/// 16-bit `CMD_VER`.
pub fn build_v2(opcode: i32, payload: &[u8]) -> Vec<u8> {
    let mut versioned = Vec::with_capacity(2 + payload.len());
    versioned.extend_from_slice(&CMD_VER.to_le_bytes());
    versioned.extend_from_slice(payload);
    build_v1(opcode, &versioned)
}

fn patch_size(buf: &mut [u8]) {
    let size = (buf.len() - 8) as i32;
    buf[4..8].copy_from_slice(&size.to_le_bytes());
}

/// Strips and validates a v2 response's leading `cmd_ver`. Returns the
/// remaining payload on success; `None` if the version is below `CMD_VER`
/// (treated as a protocol failure per §4.3) or the payload is too short to
/// contain one.
pub fn strip_v2_header(payload: &[u8]) -> Option<&[u8]> {
    if payload.len() < 2 {
        return None;
    }
    let ver = u16::from_le_bytes([payload[0], payload[1]]);
    if ver < CMD_VER {
        return None;
    }
    Some(&payload[2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_frame_back_patches_size_to_payload_len() {
        let frame = build_v1(ENUM_SERVICE, &[]);
        assert_eq!(&frame[0..4], &ENUM_SERVICE.to_le_bytes());
        assert_eq!(&frame[4..8], &0i32.to_le_bytes());
    }

    #[test]
    fn v2_frame_prefixes_payload_with_cmd_ver() {
        let frame = build_v2(ENUM_RESERVE2, &[]);
        assert_eq!(&frame[0..4], &ENUM_RESERVE2.to_le_bytes());
        let size = i32::from_le_bytes(frame[4..8].try_into().unwrap());
        assert_eq!(size, 2);
        assert_eq!(&frame[8..10], &CMD_VER.to_le_bytes());
    }

    #[test]
    fn strip_v2_header_rejects_stale_version() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&4u16.to_le_bytes());
        assert_eq!(strip_v2_header(&payload), None);
    }

    #[test]
    fn strip_v2_header_accepts_current_version() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&CMD_VER.to_le_bytes());
        payload.extend_from_slice(&[1, 2, 3]);
        assert_eq!(strip_v2_header(&payload), Some(&[1u8, 2, 3][..]));
    }
}
