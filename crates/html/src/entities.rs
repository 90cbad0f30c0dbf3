//! Entity decoding for the tokenizer and escaping for the serializer.
//!
//! Decoding is deliberately narrow:
//! - Named entities: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
//! - Numeric entities only when well-formed and semicolon-terminated: `&#123;`, `&#x1F4A9;`.
//! - Invalid scalars, unknown names and missing semicolons pass through unchanged.

const NAMED: &[(&[u8], char)] = &[
    (b"&amp;", '&'),
    (b"&lt;", '<'),
    (b"&gt;", '>'),
    (b"&quot;", '"'),
    (b"&apos;", '\''),
    (b"&nbsp;", '\u{00A0}'),
];

const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

/// Returns the index of the terminating `;` of a numeric entity body starting at `start`.
fn scan_numeric_entity(
    bytes: &[u8],
    start: usize,
    max_digits: usize,
    is_hex: bool,
) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() && j - start <= max_digits {
        let b = bytes[j];
        if b == b';' {
            return (j > start).then_some(j);
        }
        let ok = if is_hex {
            b.is_ascii_hexdigit()
        } else {
            b.is_ascii_digit()
        };
        if !ok {
            return None;
        }
        j += 1;
    }
    None
}

/// Decodes the entity at `bytes[i] == b'&'`, returning the character and the consumed length.
fn decode_one(s: &str, i: usize) -> Option<(char, usize)> {
    let bytes = s.as_bytes();
    if let Some((pat, ch)) = NAMED
        .iter()
        .find(|(pat, _)| bytes.get(i..i + pat.len()) == Some(*pat))
    {
        return Some((*ch, pat.len()));
    }
    if bytes.get(i + 1) != Some(&b'#') {
        return None;
    }
    let is_hex = matches!(bytes.get(i + 2), Some(b'x' | b'X'));
    let digits_start = if is_hex { i + 3 } else { i + 2 };
    let (max, radix) = if is_hex {
        (MAX_HEX_DIGITS, 16)
    } else {
        (MAX_DEC_DIGITS, 10)
    };
    let end = scan_numeric_entity(bytes, digits_start, max, is_hex)?;
    let ch = u32::from_str_radix(&s[digits_start..end], radix)
        .ok()
        .and_then(char::from_u32)?;
    Some((ch, end + 1 - i))
}

pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut copy_start = 0;
    let mut i = 0;
    while let Some(rel) = memchr::memchr(b'&', &bytes[i..]) {
        i += rel;
        match decode_one(s, i) {
            Some((ch, consumed)) => {
                // Flush bytes up to '&' unchanged (preserves UTF-8).
                out.push_str(&s[copy_start..i]);
                out.push(ch);
                i += consumed;
                copy_start = i;
            }
            None => i += 1,
        }
    }
    out.push_str(&s[copy_start..]);
    out
}

fn escape_into(out: &mut String, s: &str, escape: impl Fn(char) -> Option<&'static str>) {
    let mut last = 0;
    for (pos, ch) in s.char_indices() {
        if let Some(replacement) = escape(ch) {
            out.push_str(&s[last..pos]);
            out.push_str(replacement);
            last = pos + ch.len_utf8();
        }
    }
    out.push_str(&s[last..]);
}

/// Escapes text node content for serialization.
pub fn escape_text(out: &mut String, s: &str) {
    escape_into(out, s, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\u{00A0}' => Some("&nbsp;"),
        _ => None,
    });
}

/// Escapes a double-quoted attribute value for serialization.
pub fn escape_attribute(out: &mut String, s: &str) {
    escape_into(out, s, |ch| match ch {
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\u{00A0}' => Some("&nbsp;"),
        _ => None,
    });
}

/// Escapes a string so it is inert in text, double-quoted and single-quoted attribute
/// contexts alike.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    });
    out
}
