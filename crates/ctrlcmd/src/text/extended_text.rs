//! Extended-text (`ExtendedEventInfo.text_char`) sectioning splitter (§4.6).
//!
//! Sections are keyed by lines beginning `"- "` at the very start of the
//! text or right after a newline; everything before the first such heading
//! is the prologue, stored under the empty-string key.

use std::collections::BTreeMap;

pub fn split_sections(text: &str) -> BTreeMap<String, String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut sections = BTreeMap::new();
    let mut head = String::new();
    let mut i = 0usize;

    loop {
        let (body_start, next_marker) = if i == 0 && text[i..].starts_with("- ") {
            (2, None)
        } else if let Some(found) = text[i..].find("\n- ") {
            let marker_pos = i + found;
            (marker_pos + 3, Some(marker_pos))
        } else {
            if !text.is_empty() {
                let body = if i == 0 { &text[..] } else { &text[i + 1..] };
                sections.insert(head.clone(), body.to_string());
            }
            break;
        };

        if let Some(marker_pos) = next_marker {
            let body = if i == 0 { &text[..marker_pos + 1] } else { &text[i + 1..marker_pos + 1] };
            sections.insert(head.clone(), body.to_string());
        }

        match text[body_start..].find('\n') {
            Some(rel) => {
                let next_nl = body_start + rel;
                head = text[body_start..next_nl].to_string();
                i = next_nl;
            }
            None => {
                sections.insert(text[body_start..].to_string(), String::new());
                break;
            }
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prologue_without_any_heading_is_kept_under_empty_key() {
        let sections = split_sections("just some text");
        assert_eq!(sections.get(""), Some(&"just some text".to_string()));
    }

    #[test]
    fn a_leading_heading_starts_a_named_section() {
        let sections = split_sections("- summary\nbody text");
        assert_eq!(sections.get("summary"), Some(&"body text".to_string()));
    }

    #[test]
    fn crlf_is_normalized_before_splitting() {
        let sections = split_sections("- cast\r\nalice, bob\r\n");
        assert_eq!(sections.get("cast"), Some(&"alice, bob\n".to_string()));
    }

    #[test]
    fn multiple_sections_are_each_captured() {
        let sections = split_sections("prologue\n- a\nfirst\n- b\nsecond");
        assert_eq!(sections.get(""), Some(&"prologue\n".to_string()));
        assert_eq!(sections.get("a"), Some(&"first\n".to_string()));
        assert_eq!(sections.get("b"), Some(&"second".to_string()));
    }
}
