//! `LogoData.ini` lookup and logo-file-name directory index (§4.6).

/// Looks up the logo identifier for `(onid, sid)` in a `LogoData.ini`-style
/// `KEY=VALUE` text blob. The key is matched case-insensitively after
/// trimming; returns `-1` if no matching line parses to an integer.
pub fn lookup_logo_id(text: &str, onid: u16, sid: u16) -> i32 {
    let target = format!("{onid:04X}{sid:04X}");
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim().to_uppercase() != target {
            continue;
        }
        return match value.trim().parse() {
            Ok(v) => v,
            Err(_) => break,
        };
    }
    -1
}

/// Looks up a logo file name in a directory-index text blob: each line has
/// four space-delimited fields, the fourth being a candidate filename. A
/// match requires the filename's first 9 bytes (case-insensitive) to equal
/// `"{onid:04X}_{logo_id:03X}_"` and bytes 12..16 to equal
/// `"_{logo_type:02}."`.
pub fn lookup_logo_file_name(text: &str, onid: u16, logo_id: u16, logo_type: u8) -> Option<String> {
    let target = format!("{onid:04X}_{logo_id:03X}_");
    let target_type = format!("_{logo_type:02}.");
    for line in text.lines() {
        let fields: Vec<&str> = line.splitn(4, ' ').collect();
        if fields.len() != 4 {
            continue;
        }
        let name = fields[3];
        if name.len() < 16 {
            continue;
        }
        if name[0..9].to_uppercase() == target && &name[12..16] == target_type {
            return Some(name.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_logo_id_matches_trimmed_uppercased_key() {
        let ini = "  0001000a = 5\nOTHER=9\n";
        assert_eq!(lookup_logo_id(ini, 1, 10), 5);
    }

    #[test]
    fn lookup_logo_id_returns_negative_one_when_absent() {
        assert_eq!(lookup_logo_id("FOO=1\n", 1, 2), -1);
    }

    #[test]
    fn lookup_logo_file_name_matches_prefix_and_type_suffix() {
        let idx = "a b c 0001_00A_ABC_02.png\n";
        let name = lookup_logo_file_name(idx, 1, 0x0a, 2);
        assert_eq!(name.as_deref(), Some("0001_00A_ABC_02.png"));
    }

    #[test]
    fn lookup_logo_file_name_rejects_mismatched_type() {
        let idx = "a b c 0001_00A_ABC_03.png\n";
        assert_eq!(lookup_logo_file_name(idx, 1, 0x0a, 2), None);
    }
}
