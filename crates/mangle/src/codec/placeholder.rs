//! Placeholder token syntax.
//!
//! A token is `open + id + ["_" + sub] + close`. Pair tokens carry a one-byte prefix:
//! `#` on the open token, `/` on the close token. With the default markers, value 3 reads
//! `$$lit_mangler_3$$` and its pair is `#$$lit_mangler_3$$ ... /$$lit_mangler_3$$`.

use crate::error::{ConfigError, DecodeError};
use memchr::memmem;

pub const DEFAULT_OPEN: &str = "$$lit_mangler_";
pub const DEFAULT_CLOSE: &str = "$$";

pub(crate) const PAIR_OPEN_PREFIX: u8 = b'#';
pub(crate) const PAIR_CLOSE_PREFIX: u8 = b'/';

/// Marker strings surrounding a placeholder index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderSyntax {
    open: String,
    close: String,
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
        }
    }
}

// Bytes the HTML round trip would rewrite (entities, quoting), split on (class tokens,
// attribute names) or confuse with the id/sub-index grammar.
fn check_marker(marker: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidMarker {
        marker: marker.to_string(),
        reason,
    };
    if marker.is_empty() {
        return Err(invalid("marker is empty"));
    }
    if marker.bytes().any(|b| b.is_ascii_whitespace()) {
        return Err(invalid("marker contains whitespace"));
    }
    if marker
        .bytes()
        .any(|b| matches!(b, b'<' | b'>' | b'"' | b'\'' | b'&' | b'=' | b'/'))
    {
        return Err(invalid("marker contains an HTML-significant character"));
    }
    Ok(())
}

impl PlaceholderSyntax {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, ConfigError> {
        let open = open.into();
        let close = close.into();
        check_marker(&open)?;
        check_marker(&close)?;
        if close.starts_with(|c: char| c.is_ascii_digit() || c == '_') {
            return Err(ConfigError::InvalidMarker {
                marker: close,
                reason: "close marker must not start with a digit or `_`",
            });
        }
        Ok(Self { open, close })
    }

    pub fn open_marker(&self) -> &str {
        &self.open
    }

    pub fn close_marker(&self) -> &str {
        &self.close
    }

    fn token(&self, prefix: Option<u8>, id: usize, sub: Option<usize>) -> String {
        let mut out = String::with_capacity(self.open.len() + self.close.len() + 8);
        if let Some(prefix) = prefix {
            out.push(char::from(prefix));
        }
        out.push_str(&self.open);
        out.push_str(&id.to_string());
        if let Some(sub) = sub {
            out.push('_');
            out.push_str(&sub.to_string());
        }
        out.push_str(&self.close);
        out
    }

    /// Bare token standing in for the value itself.
    pub fn literal(&self, id: usize) -> String {
        self.token(None, id, None)
    }

    pub fn open(&self, id: usize, sub: Option<usize>) -> String {
        self.token(Some(PAIR_OPEN_PREFIX), id, sub)
    }

    pub fn close(&self, id: usize, sub: Option<usize>) -> String {
        self.token(Some(PAIR_CLOSE_PREFIX), id, sub)
    }

    /// Leftmost well-formed token in `text[start..end]` that ends at or before `end`.
    ///
    /// Marker occurrences not followed by digits and the close marker are ordinary text.
    pub(crate) fn find_token(
        &self,
        text: &str,
        start: usize,
        end: usize,
    ) -> Result<Option<RawToken>, DecodeError> {
        let bytes = text.as_bytes();
        let finder = memmem::Finder::new(self.open.as_bytes());
        let mut from = start;
        while from < end {
            let Some(rel) = finder.find(&bytes[from..end]) else {
                return Ok(None);
            };
            let at = from + rel;
            from = at + 1;

            let mut k = at + self.open.len();
            let Some(id_end) = digits_end(bytes, k, end) else {
                continue;
            };
            let id = parse_index(&text[k..id_end])?;
            k = id_end;

            let mut sub = None;
            if k < end && bytes[k] == b'_' {
                let Some(sub_end) = digits_end(bytes, k + 1, end) else {
                    continue;
                };
                sub = Some(parse_index(&text[k + 1..sub_end])?);
                k = sub_end;
            }
            if !text[k..end].starts_with(self.close.as_str()) {
                continue;
            }
            let token_end = k + self.close.len();

            let prefix = if at > start {
                match bytes[at - 1] {
                    PAIR_OPEN_PREFIX => Prefix::Open,
                    PAIR_CLOSE_PREFIX => Prefix::Close,
                    _ => Prefix::Bare,
                }
            } else {
                Prefix::Bare
            };
            let token_start = if prefix == Prefix::Bare { at } else { at - 1 };
            return Ok(Some(RawToken {
                prefix,
                id,
                sub,
                start: token_start,
                end: token_end,
            }));
        }
        Ok(None)
    }
}

fn digits_end(bytes: &[u8], start: usize, end: usize) -> Option<usize> {
    let mut k = start;
    while k < end && bytes[k].is_ascii_digit() {
        k += 1;
    }
    (k > start).then_some(k)
}

fn parse_index(digits: &str) -> Result<usize, DecodeError> {
    digits.parse().map_err(|_| DecodeError::InvalidId {
        text: digits.to_string(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Prefix {
    Open,
    Close,
    Bare,
}

/// A single token as found in the text, before pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub(crate) prefix: Prefix,
    pub(crate) id: usize,
    pub(crate) sub: Option<usize>,
    /// Byte range including the prefix.
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// A decoded placeholder spanning `start..end` of the serialized HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    pub kind: PlaceholderKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaceholderKind {
    Literal,
    Pair { value_start: usize, value_end: usize },
    Array { items: Vec<Placeholder> },
}
