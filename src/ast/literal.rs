//! Literal value decoding
//!
//! tree-sitter keeps string literals as raw fragments and escape sequences.
//! Payload blobs are usually written with `\x`/`\u` escapes, so the decoded
//! value is rebuilt here as UTF-16 code units (surrogate pairs split across two
//! `\u` escapes are then joined, lone halves become U+FFFD).

use tree_sitter::Node as TsNode;

/// Decode a `string` node into its JavaScript string value
pub(crate) fn decode_string(node: &TsNode, source: &[u8]) -> Option<String> {
    let mut units: Vec<u16> = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        let text = child.utf8_text(source).ok()?;
        match child.kind() {
            "escape_sequence" => decode_escape(text, &mut units),
            _ => units.extend(text.encode_utf16()),
        }
    }

    Some(String::from_utf16_lossy(&units))
}

/// Append the code units an escape sequence stands for
pub(crate) fn decode_escape(sequence: &str, out: &mut Vec<u16>) {
    let Some(body) = sequence.strip_prefix('\\') else {
        out.extend(sequence.encode_utf16());
        return;
    };

    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let rest = chars.as_str();

    match first {
        'n' => out.push(0x0a),
        't' => out.push(0x09),
        'r' => out.push(0x0d),
        'b' => out.push(0x08),
        'f' => out.push(0x0c),
        'v' => out.push(0x0b),
        'x' => match hex_unit(rest, 2) {
            Some(unit) => out.push(unit),
            None => out.extend(body.encode_utf16()),
        },
        'u' => decode_unicode_escape(rest, body, out),
        '0'..='7' => match u16::from_str_radix(body, 8) {
            Ok(unit) if unit <= 0o377 => out.push(unit),
            _ => out.extend(body.encode_utf16()),
        },
        // line continuations
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => {}
        other => {
            let mut buf = [0u16; 2];
            out.extend_from_slice(other.encode_utf16(&mut buf));
        }
    }
}

fn decode_unicode_escape(rest: &str, body: &str, out: &mut Vec<u16>) {
    if let Some(braced) = rest.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
        match u32::from_str_radix(braced, 16).ok().and_then(char::from_u32) {
            Some(c) => {
                let mut buf = [0u16; 2];
                out.extend_from_slice(c.encode_utf16(&mut buf));
            }
            None => out.extend(body.encode_utf16()),
        }
        return;
    }

    // a single code unit, possibly half of a surrogate pair
    match hex_unit(rest, 4) {
        Some(unit) => out.push(unit),
        None => out.extend(body.encode_utf16()),
    }
}

fn hex_unit(digits: &str, width: usize) -> Option<u16> {
    if digits.len() != width || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// Numeric value of a `number` token; NaN when it cannot be read
pub(crate) fn parse_number(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let cleaned = cleaned.strip_suffix('n').unwrap_or(&cleaned);
    let lower = cleaned.to_ascii_lowercase();

    let radix = |digits: &str, radix: u32| {
        u64::from_str_radix(digits, radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN)
    };

    if let Some(digits) = lower.strip_prefix("0x") {
        return radix(digits, 16);
    }
    if let Some(digits) = lower.strip_prefix("0o") {
        return radix(digits, 8);
    }
    if let Some(digits) = lower.strip_prefix("0b") {
        return radix(digits, 2);
    }
    // legacy octal: 0777
    if lower.len() > 1 && lower.starts_with('0') && lower.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return radix(&lower[1..], 8);
    }

    lower.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(seq: &str) -> String {
        let mut units = Vec::new();
        decode_escape(seq, &mut units);
        String::from_utf16_lossy(&units)
    }

    #[test]
    fn test_single_char_escapes() {
        assert_eq!(decode("\\n"), "\n");
        assert_eq!(decode("\\t"), "\t");
        assert_eq!(decode("\\\""), "\"");
        assert_eq!(decode("\\\\"), "\\");
        assert_eq!(decode("\\q"), "q");
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        assert_eq!(decode("\\x90"), "\u{90}");
        assert_eq!(decode("\\u0041"), "A");
        assert_eq!(decode("\\u{1F600}"), "\u{1F600}");
    }

    #[test]
    fn test_octal_and_continuation() {
        assert_eq!(decode("\\0"), "\0");
        assert_eq!(decode("\\101"), "A");
        assert_eq!(decode("\\\n"), "");
    }

    #[test]
    fn test_surrogate_pair_across_escapes() {
        let mut units = Vec::new();
        decode_escape("\\uD83D", &mut units);
        decode_escape("\\uDE00", &mut units);
        assert_eq!(String::from_utf16_lossy(&units), "\u{1F600}");
    }

    #[test]
    fn test_lone_surrogate_is_replaced() {
        let mut units = Vec::new();
        decode_escape("\\uD800", &mut units);
        assert_eq!(String::from_utf16_lossy(&units), "\u{FFFD}");
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("5"), 5.0);
        assert_eq!(parse_number("0x1F"), 31.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("017"), 15.0);
        assert_eq!(parse_number("1_000"), 1000.0);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("10n"), 10.0);
        assert!(parse_number("0xZZ").is_nan());
    }
}
