//! BOM-sniffing bytes-to-text decoder (§4.6): the one piece of the text
//! helpers that touches an encoding other than UTF-16LE.

use encoding_rs::{SHIFT_JIS, UTF_16LE, UTF_8};

/// Decodes `buf` as UTF-16LE if it starts with `FF FE`, UTF-8 if it starts
/// with the `EF BB BF` BOM, or Shift-JIS (cp932) otherwise. Invalid
/// sequences are replaced with the Unicode replacement character rather than
/// causing a decode failure — this helper never returns `Err`.
pub fn decode_bytes(buf: &[u8]) -> String {
    if buf.is_empty() {
        return String::new();
    }
    if buf.len() >= 2 && buf[0] == 0xff && buf[1] == 0xfe {
        let (text, _, _) = UTF_16LE.decode(&buf[2..]);
        return text.into_owned();
    }
    if buf.len() >= 3 && buf[0] == 0xef && buf[1] == 0xbb && buf[2] == 0xbf {
        let (text, _, _) = UTF_8.decode(&buf[3..]);
        return text.into_owned();
    }
    let (text, _, _) = SHIFT_JIS.decode(buf);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_decodes_to_empty_string() {
        assert_eq!(decode_bytes(&[]), "");
    }

    #[test]
    fn utf16le_bom_is_recognized_and_skipped() {
        let mut buf = vec![0xff, 0xfe];
        buf.extend_from_slice(&"ab".encode_utf16().flat_map(u16::to_le_bytes).collect::<Vec<u8>>());
        assert_eq!(decode_bytes(&buf), "ab");
    }

    #[test]
    fn utf8_bom_is_recognized_and_skipped() {
        let mut buf = vec![0xef, 0xbb, 0xbf];
        buf.extend_from_slice("ab".as_bytes());
        assert_eq!(decode_bytes(&buf), "ab");
    }

    #[test]
    fn bare_bytes_fall_back_to_shift_jis() {
        // "A" is valid single-byte ASCII under Shift-JIS too.
        assert_eq!(decode_bytes(b"A"), "A");
    }
}
