//! Simplified HTML tokenizer used to parse template fragments.
//!
//! Tag names are ASCII `[A-Za-z0-9:_-]` starting with a letter and are interned lowercase.
//! Attribute names accept any byte except ASCII whitespace and `"'/=>`, and keep their case,
//! so template binding prefixes (`.prop`, `?bool`, `@event`) survive a round trip.
//!
//! Known limitations:
//! - Not an HTML5 state machine (no parse-error recovery, no implied end tags).
//! - `<` that does not start a tag, end tag, comment or doctype is plain text.
//! - Rawtext close-tag scanning accepts only ASCII whitespace before `>`.
use crate::entities::decode_entities;
use crate::types::{AtomId, AtomTable, Token, TokenStream, is_void_element};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

// it only attempts matches starting at ASCII <
// < cannot appear in UTF-8 continuation bytes
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_tag_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn is_attr_name_char(c: u8) -> bool {
    !c.is_ascii_whitespace() && !matches!(c, b'"' | b'\'' | b'/' | b'=' | b'>')
}

fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let hay_bytes = haystack.as_bytes();
    let len = hay_bytes.len();
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &hay_bytes[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if starts_with_ignore_ascii_case_at(hay_bytes, i, close_tag) {
            let mut k = i + n;
            while k < len && hay_bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && hay_bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Classifies what a `<` at `i` opens. Anything else is literal text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Markup {
    Comment,
    Doctype,
    EndTag,
    StartTag,
    Text,
}

fn classify_markup(input: &str, i: usize) -> Markup {
    let bytes = input.as_bytes();
    debug_assert_eq!(bytes[i], b'<');
    if input[i..].starts_with(HTML_COMMENT_START) {
        return Markup::Comment;
    }
    if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
        return Markup::Doctype;
    }
    match bytes.get(i + 1) {
        Some(b'/') if bytes.get(i + 2).is_some_and(u8::is_ascii_alphabetic) => Markup::EndTag,
        Some(c) if c.is_ascii_alphabetic() => Markup::StartTag,
        _ => Markup::Text,
    }
}

/// Tokenizes into a token stream with interned tag/attribute names.
pub fn tokenize(input: &str) -> TokenStream {
    let mut out = Vec::new();
    let mut atoms = AtomTable::new();
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    // Pending text run; a stray `<` is folded into it rather than ending it.
    let mut text_start: Option<usize> = None;

    // Invariant: slice endpoints are only cut at ASCII structural bytes, so they remain
    // UTF-8 char boundaries.
    while i < len {
        if bytes[i] != b'<' {
            text_start.get_or_insert(i);
            i = memchr(b'<', &bytes[i..]).map_or(len, |rel| i + rel);
            continue;
        }
        let markup = classify_markup(input, i);
        if markup == Markup::Text {
            text_start.get_or_insert(i);
            i += 1;
            continue;
        }
        if let Some(start) = text_start.take() {
            push_text(&mut out, &input[start..i]);
        }
        match markup {
            Markup::Comment => {
                let body_start = i + HTML_COMMENT_START.len();
                match input[body_start..].find(HTML_COMMENT_END) {
                    Some(end) => {
                        out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                        i = body_start + end + HTML_COMMENT_END.len();
                    }
                    None => {
                        out.push(Token::Comment(input[body_start..].to_string()));
                        i = len;
                    }
                }
            }
            Markup::Doctype => {
                let rest = &input[i + 2..];
                match rest.find('>') {
                    Some(end) => {
                        out.push(Token::Doctype(rest[..end].trim().to_string()));
                        i += 2 + end + 1;
                    }
                    None => i = len,
                }
            }
            Markup::EndTag => {
                let start = i + 2;
                let mut j = start;
                while j < len && is_tag_name_char(bytes[j]) {
                    j += 1;
                }
                let name = atoms.intern_ascii_lowercase(&input[start..j]);
                j = memchr(b'>', &bytes[j..]).map_or(len, |rel| j + rel + 1);
                out.push(Token::EndTag(name));
                i = j;
            }
            Markup::StartTag => {
                let (token, name, content_start) = read_start_tag(input, i, &mut atoms);
                let self_closing = matches!(token, Token::StartTag { self_closing: true, .. });
                out.push(token);
                i = content_start;

                let name_str = atoms.resolve(name);
                if (name_str == "script" || name_str == "style") && !self_closing {
                    let close_tag = if name_str == "script" {
                        SCRIPT_CLOSE_TAG
                    } else {
                        STYLE_CLOSE_TAG
                    };
                    match find_rawtext_close_tag(&input[i..], close_tag) {
                        Some((rel_start, rel_end)) => {
                            let raw = &input[i..i + rel_start];
                            if !raw.is_empty() {
                                out.push(Token::Text(raw.to_string()));
                            }
                            out.push(Token::EndTag(name));
                            i += rel_end;
                        }
                        None => {
                            // Missing close tag: the remainder is rawtext with an implied end.
                            let raw = &input[i..];
                            if !raw.is_empty() {
                                out.push(Token::Text(raw.to_string()));
                            }
                            out.push(Token::EndTag(name));
                            i = len;
                        }
                    }
                }
            }
            Markup::Text => unreachable!("text markup handled above"),
        }
    }
    if let Some(start) = text_start {
        push_text(&mut out, &input[start..]);
    }
    TokenStream::new(out, atoms)
}

fn push_text(out: &mut Vec<Token>, raw: &str) {
    let decoded = decode_entities(raw);
    if !decoded.is_empty() {
        out.push(Token::Text(decoded));
    }
}

/// Reads a start tag beginning at `i` (`bytes[i] == b'<'`). Returns the token, the interned
/// tag name and the byte offset just past the tag.
fn read_start_tag(input: &str, i: usize, atoms: &mut AtomTable) -> (Token, AtomId, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let start = i + 1;
    let mut k = start;
    while k < len && is_tag_name_char(bytes[k]) {
        k += 1;
    }
    let name = atoms.intern_ascii_lowercase(&input[start..k]);
    let mut attributes: Vec<(AtomId, Option<String>)> = Vec::new();
    let mut self_closing = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let name_start = k;
        while k < len && is_attr_name_char(bytes[k]) {
            k += 1;
        }
        if name_start == k {
            // Stray quote or `=` in attribute-name position.
            k += 1;
            continue;
        }
        let attribute_name = atoms.intern(&input[name_start..k]);

        skip_whitespace(&mut k);
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let vstart = k;
                k = memchr(quote, &bytes[k..]).map_or(len, |rel| k + rel);
                let raw = &input[vstart..k];
                if k < len {
                    k += 1;
                }
                Some(decode_entities(raw))
            } else {
                let vstart = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                        break;
                    }
                    k += 1;
                }
                Some(decode_entities(&input[vstart..k]))
            }
        } else {
            None
        };
        attributes.push((attribute_name, value));
    }
    if is_void_element(atoms.resolve(name)) {
        self_closing = true;
    }

    let token = Token::StartTag {
        name,
        attributes,
        self_closing,
    };
    (token, name, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(stream: &TokenStream) -> Vec<String> {
        let atoms = stream.atoms();
        stream
            .iter()
            .map(|t| match t {
                Token::StartTag { name, .. } => format!("<{}>", atoms.resolve(*name)),
                Token::EndTag(name) => format!("</{}>", atoms.resolve(*name)),
                Token::Text(s) => format!("'{s}'"),
                Token::Comment(s) => format!("<!--{s}-->"),
                Token::Doctype(s) => format!("<!{s}>"),
            })
            .collect()
    }

    #[test]
    fn tokenize_keeps_placeholder_text_intact() {
        let stream = tokenize("<span>#$$lit_mangler_0$$World/$$lit_mangler_0$$</span>");
        assert_eq!(
            names(&stream),
            vec![
                "<span>",
                "'#$$lit_mangler_0$$World/$$lit_mangler_0$$'",
                "</span>"
            ]
        );
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let stream = tokenize("<p>a < b <= c</p>");
        assert_eq!(names(&stream), vec!["<p>", "'a < b <= c'", "</p>"]);
    }

    #[test]
    fn binding_prefixed_attribute_names_keep_case() {
        let stream = tokenize("<DIV ?hidden=x .someProp=${v} @click='h'></div>");
        let atoms = stream.atoms();
        let Token::StartTag {
            name, attributes, ..
        } = &stream.tokens()[0]
        else {
            panic!("expected start tag, got: {stream:?}");
        };
        assert_eq!(atoms.resolve(*name), "div");
        let attrs: Vec<(&str, Option<&str>)> = attributes
            .iter()
            .map(|(k, v)| (atoms.resolve(*k), v.as_deref()))
            .collect();
        assert_eq!(
            attrs,
            vec![
                ("?hidden", Some("x")),
                (".someProp", Some("${v}")),
                ("@click", Some("h"))
            ]
        );
    }

    #[test]
    fn entities_are_decoded_in_text_and_attributes() {
        let stream = tokenize("<a title=\"x &quot;y&quot;\">&lt;b&gt; &amp; c</a>");
        let atoms = stream.atoms();
        match stream.tokens() {
            [
                Token::StartTag { attributes, .. },
                Token::Text(text),
                Token::EndTag(_),
            ] => {
                assert_eq!(atoms.resolve(attributes[0].0), "title");
                assert_eq!(attributes[0].1.as_deref(), Some("x \"y\""));
                assert_eq!(text, "<b> & c");
            }
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn script_body_is_rawtext() {
        let stream = tokenize("<script>if (a < b && c) {}</ScRiPt >after");
        assert_eq!(
            names(&stream),
            vec!["<script>", "'if (a < b && c) {}'", "</script>", "'after'"]
        );
    }

    #[test]
    fn void_elements_self_close() {
        let stream = tokenize("<br><img src=x>");
        assert!(stream.iter().all(|t| matches!(
            t,
            Token::StartTag {
                self_closing: true,
                ..
            }
        )));
    }

    #[test]
    fn comments_and_doctype() {
        let stream = tokenize("<!DOCTYPE html><!-- note --><p>x</p><!-- open");
        assert_eq!(
            names(&stream),
            vec!["<!DOCTYPE html>", "<!-- note -->", "<p>", "'x'", "</p>", "<!-- open-->"]
        );
    }

    #[test]
    fn tokenize_handles_tons_of_angle_brackets() {
        let input = "<".repeat(50_000);
        let stream = tokenize(&input);
        assert_eq!(stream.tokens().len(), 1);
    }
}
