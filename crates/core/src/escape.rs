//! XML escaping for text nodes and attribute values.

use std::borrow::Cow;

/// Escapes the five XML-reserved characters so `input` can be embedded in a text node or a
/// quoted attribute value.
///
/// A single pass over the input means entities produced for one character are never
/// re-escaped by another replacement. Escape the original text exactly once; escaping an
/// already escaped string turns `&amp;` into `&amp;amp;`.
///
/// Returns the input unchanged (borrowed) when it contains nothing to escape.
pub fn escape_xml(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Replaces every character outside the XML 1.0 `Char` production with a space.
///
/// Tab, line feed and carriage return are kept; form feeds and the other C0 controls are not.
pub fn replace_invalid_xml_chars(input: &str) -> Cow<'_, str> {
    if input.chars().all(is_xml_char) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(
        input
            .chars()
            .map(|ch| if is_xml_char(ch) { ch } else { ' ' })
            .collect(),
    )
}

fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t'
            | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_xml_chars_become_spaces() {
        assert_eq!(
            replace_invalid_xml_chars("end.\u{0C}Next\u{0B}x\u{0}y\u{FFFE}"),
            "end. Next x y "
        );
        assert!(matches!(
            replace_invalid_xml_chars("tab\there\r\nline é"),
            Cow::Borrowed("tab\there\r\nline é")
        ));
    }

    #[test]
    fn test_escapes_ampersand_and_angle_brackets() {
        assert_eq!(escape_xml("A & B < C"), "A &amp; B &lt; C");
    }

    #[test]
    fn test_escapes_quotes() {
        assert_eq!(
            escape_xml(r#"Plaintiff's "First" Set > none"#),
            "Plaintiff&apos;s &quot;First&quot; Set &gt; none"
        );
    }

    #[test]
    fn test_empty_and_plain_input_are_borrowed() {
        assert!(matches!(escape_xml(""), Cow::Borrowed("")));
        assert!(matches!(escape_xml("plain text"), Cow::Borrowed("plain text")));
    }

    #[test]
    fn test_escaping_twice_double_escapes() {
        let once = escape_xml("A & B");
        assert_eq!(escape_xml(&once), "A &amp;amp; B");
    }

    #[test]
    fn test_unescape_restores_original() {
        for original in [
            "A & B < C",
            "<w:t>not markup</w:t>",
            "It's \"quoted\" & <bracketed>",
            "Section 2.1 – Definitions",
            "",
        ] {
            let escaped = escape_xml(original);
            let restored = quick_xml::escape::unescape(&escaped).unwrap();
            assert_eq!(restored, original);
        }
    }
}
