//! Primitive wire codec: little-endian integers, UTF-16LE strings, length-
//! prefixed vectors and structs, and the optional-sub-record sentinel.
//!
//! Readers take a borrowed byte slice, a cursor position threaded through by
//! `&mut usize`, and a `limit` — the logical end of the region currently
//! being decoded (which narrows as we descend into nested vectors/structs,
//! independent of the physical length of the underlying buffer). This is the
//! direct translation of the source's shared mutable cursor into an explicit
//! reference, per the crate's design notes.

use byteorder::{ByteOrder, LittleEndian};
use time::OffsetDateTime;

use crate::error::{ReadError, Result};
use crate::time::{systemtime_from_fields, systemtime_to_fields};

fn need(buf_len: usize, pos: usize, limit: usize, n: usize) -> Result<()> {
    let available = limit.saturating_sub(pos).min(buf_len.saturating_sub(pos));
    if available < n {
        return Err(ReadError::UnexpectedEof {
            needed: n,
            available,
        });
    }
    Ok(())
}

pub fn read_u8(buf: &[u8], pos: &mut usize, limit: usize) -> Result<u8> {
    need(buf.len(), *pos, limit, 1)?;
    let v = buf[*pos];
    *pos += 1;
    Ok(v)
}

pub fn read_u16(buf: &[u8], pos: &mut usize, limit: usize) -> Result<u16> {
    need(buf.len(), *pos, limit, 2)?;
    let v = LittleEndian::read_u16(&buf[*pos..*pos + 2]);
    *pos += 2;
    Ok(v)
}

pub fn read_i32(buf: &[u8], pos: &mut usize, limit: usize) -> Result<i32> {
    need(buf.len(), *pos, limit, 4)?;
    let v = LittleEndian::read_i32(&buf[*pos..*pos + 4]);
    *pos += 4;
    Ok(v)
}

pub fn read_u32(buf: &[u8], pos: &mut usize, limit: usize) -> Result<u32> {
    need(buf.len(), *pos, limit, 4)?;
    let v = LittleEndian::read_u32(&buf[*pos..*pos + 4]);
    *pos += 4;
    Ok(v)
}

pub fn read_i64(buf: &[u8], pos: &mut usize, limit: usize) -> Result<i64> {
    need(buf.len(), *pos, limit, 8)?;
    let v = LittleEndian::read_i64(&buf[*pos..*pos + 8]);
    *pos += 8;
    Ok(v)
}

/// Reads a 16-byte Windows SYSTEMTIME, returning the epoch sentinel on a
/// range error (the cursor still advances by 16 bytes in that case).
pub fn read_systemtime(buf: &[u8], pos: &mut usize, limit: usize) -> Result<OffsetDateTime> {
    need(buf.len(), *pos, limit, 16)?;
    let year = LittleEndian::read_u16(&buf[*pos..*pos + 2]);
    let month = LittleEndian::read_u16(&buf[*pos + 2..*pos + 4]);
    // bytes 4..6 are day-of-week, ignored on read
    let day = LittleEndian::read_u16(&buf[*pos + 6..*pos + 8]);
    let hour = LittleEndian::read_u16(&buf[*pos + 8..*pos + 10]);
    let minute = LittleEndian::read_u16(&buf[*pos + 10..*pos + 12]);
    let second = LittleEndian::read_u16(&buf[*pos + 12..*pos + 14]);
    // bytes 14..16 are milliseconds, always zero, ignored on read
    *pos += 16;
    Ok(systemtime_from_fields(year, month, day, hour, minute, second))
}

/// Reads a length-prefixed UTF-16LE string (§4.1).
pub fn read_string(buf: &[u8], pos: &mut usize, limit: usize) -> Result<String> {
    let total_len = read_i32(buf, pos, limit)?;
    if total_len < 6 {
        return Err(ReadError::StringTooShort(total_len));
    }
    let payload_len = total_len as usize - 6;
    need(buf.len(), *pos, limit, payload_len + 2)?;
    let payload = &buf[*pos..*pos + payload_len];
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .collect();
    let s = String::from_utf16_lossy(&units);
    *pos += total_len as usize - 4;
    Ok(s)
}

/// Reads a length-prefixed vector, snapping the cursor to `start + total_len`
/// once `count` elements have been decoded, regardless of how many bytes the
/// element reader actually consumed (§4.1's forward-compatibility rule).
pub fn read_vector<T>(
    buf: &[u8],
    pos: &mut usize,
    limit: usize,
    mut read_elem: impl FnMut(&[u8], &mut usize, usize) -> Result<T>,
) -> Result<Vec<T>> {
    let start = *pos;
    let total_len = read_i32(buf, pos, limit)?;
    if total_len < 8 {
        return Err(ReadError::VectorTooShort(total_len));
    }
    let count = read_i32(buf, pos, limit)?;
    if count < 0 {
        return Err(ReadError::VectorCountNegative(count));
    }
    let end = start + total_len as usize;
    if end > limit.min(buf.len()) {
        return Err(ReadError::LengthExceedsBuffer {
            declared: total_len as usize,
            available: limit.min(buf.len()).saturating_sub(start),
        });
    }
    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(read_elem(buf, pos, end)?);
    }
    *pos = end;
    Ok(items)
}

/// Reads a struct's 32-bit size intro and returns the absolute end offset
/// fields should be read against; callers must snap `*pos` to that offset
/// once done (see [`end_struct_read`]).
pub fn read_struct_intro(buf: &[u8], pos: &mut usize, limit: usize) -> Result<usize> {
    let start = *pos;
    let total_len = read_i32(buf, pos, limit)?;
    if total_len < 4 {
        return Err(ReadError::StructTooShort(total_len));
    }
    let end = start + total_len as usize;
    if end > limit.min(buf.len()) {
        return Err(ReadError::LengthExceedsBuffer {
            declared: total_len as usize,
            available: limit.min(buf.len()).saturating_sub(start),
        });
    }
    Ok(end)
}

/// Snaps the cursor to the struct's declared end, as read by [`read_struct_intro`].
pub fn end_struct_read(pos: &mut usize, end: usize) {
    *pos = end;
}

/// Peeks the 4-byte sentinel gating an optional sub-record (§4.1): a value of
/// exactly `4` means absent; anything else rewinds and decodes the full
/// sub-record.
pub fn read_optional_sub<T>(
    buf: &[u8],
    pos: &mut usize,
    limit: usize,
    read_sub: impl FnOnce(&[u8], &mut usize, usize) -> Result<T>,
) -> Result<Option<T>> {
    let peeked = read_i32(buf, pos, limit)?;
    if peeked == 4 {
        return Ok(None);
    }
    *pos -= 4;
    Ok(Some(read_sub(buf, pos, limit)?))
}

pub fn write_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

pub fn write_u16(buf: &mut Vec<u8>, v: u16) {
    let mut tmp = [0u8; 2];
    LittleEndian::write_u16(&mut tmp, v);
    buf.extend_from_slice(&tmp);
}

pub fn write_i32(buf: &mut Vec<u8>, v: i32) {
    let mut tmp = [0u8; 4];
    LittleEndian::write_i32(&mut tmp, v);
    buf.extend_from_slice(&tmp);
}

pub fn write_u32(buf: &mut Vec<u8>, v: u32) {
    let mut tmp = [0u8; 4];
    LittleEndian::write_u32(&mut tmp, v);
    buf.extend_from_slice(&tmp);
}

pub fn write_i64(buf: &mut Vec<u8>, v: i64) {
    let mut tmp = [0u8; 8];
    LittleEndian::write_i64(&mut tmp, v);
    buf.extend_from_slice(&tmp);
}

/// Writes a SYSTEMTIME, always with zero milliseconds (§3).
pub fn write_systemtime(buf: &mut Vec<u8>, t: OffsetDateTime) {
    let (year, month, dow, day, hour, minute, second) = systemtime_to_fields(t);
    write_u16(buf, year);
    write_u16(buf, month);
    write_u16(buf, dow);
    write_u16(buf, day);
    write_u16(buf, hour);
    write_u16(buf, minute);
    write_u16(buf, second);
    write_u16(buf, 0); // milliseconds
}

pub fn write_string(buf: &mut Vec<u8>, s: &str) {
    let units: Vec<u16> = s.encode_utf16().collect();
    write_i32(buf, 6 + 2 * units.len() as i32);
    for u in units {
        write_u16(buf, u);
    }
    write_u16(buf, 0);
}

/// Reserves the 4-byte size slot for a length-prefixed struct/vector and
/// returns its offset, to be passed to [`patch_length`] once the payload has
/// been written.
fn begin_length_prefixed(buf: &mut Vec<u8>) -> usize {
    let start = buf.len();
    write_i32(buf, 0);
    start
}

fn patch_length(buf: &mut Vec<u8>, start: usize) {
    let len = (buf.len() - start) as i32;
    let mut tmp = [0u8; 4];
    LittleEndian::write_i32(&mut tmp, len);
    buf[start..start + 4].copy_from_slice(&tmp);
}

pub fn write_vector<T>(buf: &mut Vec<u8>, items: &[T], mut write_elem: impl FnMut(&mut Vec<u8>, &T)) {
    let start = begin_length_prefixed(buf);
    write_i32(buf, items.len() as i32);
    for item in items {
        write_elem(buf, item);
    }
    patch_length(buf, start);
}

/// Starts a length-prefixed struct, returning the offset to pass to [`end_struct_write`].
pub fn begin_struct_write(buf: &mut Vec<u8>) -> usize {
    begin_length_prefixed(buf)
}

pub fn end_struct_write(buf: &mut Vec<u8>, start: usize) {
    patch_length(buf, start);
}

/// Writes `Some(v)` via `write_sub`, or the absent sentinel (`4`) for `None`.
pub fn write_optional_sub<T>(buf: &mut Vec<u8>, v: &Option<T>, write_sub: impl FnOnce(&mut Vec<u8>, &T)) {
    match v {
        Some(inner) => write_sub(buf, inner),
        None => write_i32(buf, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trips_empty() {
        let mut buf = Vec::new();
        write_string(&mut buf, "");
        assert_eq!(buf, vec![6, 0, 0, 0, 0, 0]);
        let mut pos = 0;
        let s = read_string(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(s, "");
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn string_round_trips_non_ascii() {
        let mut buf = Vec::new();
        write_string(&mut buf, "番組");
        let mut pos = 0;
        let s = read_string(&buf, &mut pos, buf.len()).unwrap();
        assert_eq!(s, "番組");
    }

    #[test]
    fn string_length_below_minimum_is_rejected() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 5);
        let mut pos = 0;
        let err = read_string(&buf, &mut pos, buf.len()).unwrap_err();
        assert_eq!(err, ReadError::StringTooShort(5));
    }

    #[test]
    fn vector_snaps_cursor_past_trailing_padding() {
        let mut buf = Vec::new();
        let start = begin_length_prefixed(&mut buf);
        write_i32(&mut buf, 1);
        write_i32(&mut buf, 42);
        buf.extend_from_slice(&[0xaa, 0xbb, 0xcc]); // trailing padding
        patch_length(&mut buf, start);

        let mut pos = 0;
        let items = read_vector(&buf, &mut pos, buf.len(), |b, p, l| read_i32(b, p, l)).unwrap();
        assert_eq!(items, vec![42]);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn vector_minimum_size_is_eight() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 7);
        let mut pos = 0;
        let err = read_vector(&buf, &mut pos, buf.len(), |b, p, l| read_i32(b, p, l)).unwrap_err();
        assert_eq!(err, ReadError::VectorTooShort(7));
    }

    #[test]
    fn struct_back_patched_size_equals_span() {
        let mut buf = Vec::new();
        let start = begin_struct_write(&mut buf);
        write_i32(&mut buf, 1);
        write_i32(&mut buf, 2);
        end_struct_write(&mut buf, start);
        assert_eq!(LittleEndian::read_i32(&buf[0..4]), buf.len() as i32);
    }

    #[test]
    fn optional_sub_record_absent_sentinel() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 4);
        let mut pos = 0;
        let v: Option<i32> = read_optional_sub(&buf, &mut pos, buf.len(), |b, p, l| read_i32(b, p, l)).unwrap();
        assert_eq!(v, None);
        assert_eq!(pos, 4);
    }

    #[test]
    fn optional_sub_record_present_rewinds_and_decodes() {
        let mut buf = Vec::new();
        let start = begin_struct_write(&mut buf);
        write_i32(&mut buf, 99);
        end_struct_write(&mut buf, start);

        let mut pos = 0;
        let v = read_optional_sub(&buf, &mut pos, buf.len(), |b, p, l| {
            let end = read_struct_intro(b, p, l)?;
            let inner = read_i32(b, p, end)?;
            end_struct_read(p, end);
            Ok(inner)
        })
        .unwrap();
        assert_eq!(v, Some(99));
        assert_eq!(pos, buf.len());
    }
}
