//! `ChSet5.txt` parser (§4.6): a tab-separated channel-set table EDCB
//! persists alongside its EPG database.

/// One parsed `ChSet5.txt` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChSet5Item {
    pub service_name: String,
    pub network_name: String,
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub service_type: u8,
    pub partial_flag: bool,
    pub epg_cap_flag: bool,
    pub search_flag: bool,
}

/// Splits `text` into lines, each split by tab; lines with fewer than 9
/// fields or with non-integer numeric fields are skipped rather than
/// aborting the whole parse.
pub fn parse(text: &str) -> Vec<ChSet5Item> {
    let mut out = Vec::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            continue;
        }
        let item = (|| {
            Some(ChSet5Item {
                service_name: fields[0].to_string(),
                network_name: fields[1].to_string(),
                onid: fields[2].parse().ok()?,
                tsid: fields[3].parse().ok()?,
                sid: fields[4].parse().ok()?,
                service_type: fields[5].parse().ok()?,
                partial_flag: fields[6].parse::<i32>().ok()? != 0,
                epg_cap_flag: fields[7].parse::<i32>().ok()? != 0,
                search_flag: fields[8].parse::<i32>().ok()? != 0,
            })
        })();
        if let Some(item) = item {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_rows() {
        let text = "NHK総合\t地上波\t1\t2\t3\t1\t0\t1\t1\n";
        let rows = parse(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].onid, 1);
        assert!(!rows[0].partial_flag);
        assert!(rows[0].epg_cap_flag);
    }

    #[test]
    fn skips_rows_with_too_few_fields() {
        let text = "a\tb\tc\n";
        assert!(parse(text).is_empty());
    }

    #[test]
    fn skips_rows_with_non_integer_numeric_fields() {
        let text = "a\tb\tnot_a_number\t2\t3\t1\t0\t1\t1\n";
        assert!(parse(text).is_empty());
    }
}
