//! Placeholder-bearing HTML → Template reconstruction.

use super::placeholder::{Placeholder, PlaceholderKind, PlaceholderSyntax, Prefix, RawToken};
use crate::error::DecodeError;
use crate::template::{Template, TemplateKind, Value, ValueShape};
use crate::value_table::ValueTable;
use memchr::memmem;

/// Rebuilds a template from `text`, resolving literal tokens against `table`.
pub fn decode(
    text: &str,
    table: &ValueTable,
    syntax: &PlaceholderSyntax,
    kind: TemplateKind,
) -> Result<Template, DecodeError> {
    Decoder::new(text, table, syntax).parse_template(kind, 0, text.len())
}

pub struct Decoder<'a> {
    text: &'a str,
    table: &'a ValueTable,
    syntax: &'a PlaceholderSyntax,
}

impl<'a> Decoder<'a> {
    pub fn new(text: &'a str, table: &'a ValueTable, syntax: &'a PlaceholderSyntax) -> Self {
        Self {
            text,
            table,
            syntax,
        }
    }

    /// Leftmost placeholder within `start..end`.
    ///
    /// A pair's close token is the first textual occurrence of it after the open token;
    /// pairs are not nesting aware. An array is the run of sub-indexed pairs that starts at
    /// sub-index 0 and continues with same-id pairs that directly abut each other.
    ///
    /// Genuine close tokens are always consumed by their open token, so a `/`-prefixed token
    /// reached here is a bare token after a literal `/`. A `#`-prefixed token is bare when its
    /// value is opaque, or when it is a known unindexed value with no close token.
    pub fn find_next_tag(
        &self,
        start: usize,
        end: usize,
    ) -> Result<Option<Placeholder>, DecodeError> {
        let Some(token) = self.syntax.find_token(self.text, start, end)? else {
            return Ok(None);
        };
        match token.prefix {
            Prefix::Bare | Prefix::Close => Ok(Some(bare(&token))),
            Prefix::Open if token.sub.is_none() && self.is_opaque(token.id) => {
                Ok(Some(bare(&token)))
            }
            Prefix::Open => {
                let first = match self.pair(&token, end) {
                    Ok(first) => first,
                    Err(DecodeError::Unterminated { .. })
                        if token.sub.is_none() && self.table.get(token.id).is_some() =>
                    {
                        return Ok(Some(bare(&token)));
                    }
                    Err(err) => return Err(err),
                };
                if token.sub != Some(0) {
                    return Ok(Some(first));
                }
                let mut cursor = first.end;
                let mut items = vec![first];
                while let Some(next) = self.syntax.find_token(self.text, cursor, end)? {
                    let continues = next.prefix == Prefix::Open
                        && next.id == token.id
                        && next.sub.is_some_and(|sub| sub > 0)
                        && next.start == cursor;
                    if !continues {
                        break;
                    }
                    let item = self.pair(&next, end)?;
                    cursor = item.end;
                    items.push(item);
                }
                Ok(Some(Placeholder {
                    id: token.id,
                    start: token.start,
                    end: cursor,
                    kind: PlaceholderKind::Array { items },
                }))
            }
        }
    }

    fn is_opaque(&self, id: usize) -> bool {
        self.table
            .get(id)
            .is_some_and(|value| value.shape() == ValueShape::Opaque)
    }

    fn pair(&self, open: &RawToken, end: usize) -> Result<Placeholder, DecodeError> {
        let close = self.syntax.close(open.id, open.sub);
        let Some(rel) = memmem::find(&self.text.as_bytes()[open.end..end], close.as_bytes())
        else {
            return Err(DecodeError::Unterminated { id: open.id });
        };
        let value_end = open.end + rel;
        Ok(Placeholder {
            id: open.id,
            start: open.start,
            end: value_end + close.len(),
            kind: PlaceholderKind::Pair {
                value_start: open.end,
                value_end,
            },
        })
    }

    /// Chunks and values of `text[start..end]`; parity holds by construction.
    pub fn parse_template(
        &self,
        kind: TemplateKind,
        start: usize,
        end: usize,
    ) -> Result<Template, DecodeError> {
        let mut strings = Vec::new();
        let mut values = Vec::new();
        let mut cursor = start;
        while let Some(placeholder) = self.find_next_tag(cursor, end)? {
            log::trace!(
                target: "mangle.codec",
                "placeholder {} at {}..{}",
                placeholder.id,
                placeholder.start,
                placeholder.end
            );
            strings.push(self.text[cursor..placeholder.start].to_string());
            values.push(self.resolve(&placeholder)?);
            cursor = placeholder.end;
        }
        strings.push(self.text[cursor..end].to_string());
        Ok(Template::from_parts(kind, strings, values))
    }

    fn resolve(&self, placeholder: &Placeholder) -> Result<Value, DecodeError> {
        match &placeholder.kind {
            PlaceholderKind::Literal => self
                .table
                .get(placeholder.id)
                .cloned()
                .ok_or(DecodeError::UnknownId { id: placeholder.id }),
            PlaceholderKind::Pair {
                value_start,
                value_end,
            } => Ok(Value::from(self.parse_template(
                TemplateKind::Html,
                *value_start,
                *value_end,
            )?)),
            PlaceholderKind::Array { items } => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from),
        }
    }
}

/// `token` as a literal placeholder; a prefix byte stays in the preceding chunk.
fn bare(token: &RawToken) -> Placeholder {
    let start = match token.prefix {
        Prefix::Bare => token.start,
        Prefix::Open | Prefix::Close => token.start + 1,
    };
    Placeholder {
        id: token.id,
        start,
        end: token.end,
        kind: PlaceholderKind::Literal,
    }
}
