//! Template → HTML flattening.

use super::placeholder::PlaceholderSyntax;
use crate::template::{Template, Value, ValueShape};
use crate::value_table::ValueTable;
use html::escape_html;

/// Flattens templates into placeholder-bearing HTML, registering every value it meets.
pub struct Encoder<'a> {
    table: &'a mut ValueTable,
    syntax: &'a PlaceholderSyntax,
}

impl<'a> Encoder<'a> {
    pub fn new(table: &'a mut ValueTable, syntax: &'a PlaceholderSyntax) -> Self {
        Self { table, syntax }
    }

    /// `S[0] enc(V[0]) S[1] ... enc(V[n-1]) S[n]`.
    pub fn flatten(&mut self, template: &Template) -> String {
        let mut out = String::new();
        self.write_template(&mut out, template);
        out
    }

    /// Encoding of a single value, chosen by its [`ValueShape`].
    pub fn encode(&mut self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(&mut out, value);
        out
    }

    /// Bare literal token for `value`; decodes back to the value itself.
    pub fn encode_literal(&mut self, value: &Value) -> String {
        let id = self.table.index_of(value);
        self.syntax.literal(id)
    }

    fn write_template(&mut self, out: &mut String, template: &Template) {
        let strings = template.strings();
        out.push_str(&strings[0]);
        for (value, chunk) in template.values().iter().zip(&strings[1..]) {
            self.write_value(out, value);
            out.push_str(chunk);
        }
    }

    fn write_value(&mut self, out: &mut String, value: &Value) {
        let id = self.table.index_of(value);
        let shape = value.shape();
        match shape {
            ValueShape::Scalar | ValueShape::NestedTemplate => {
                out.push_str(&self.syntax.open(id, None));
                self.write_body(out, value);
                out.push_str(&self.syntax.close(id, None));
            }
            ValueShape::Sequence => {
                for (sub, item) in value.as_list().unwrap_or_default().iter().enumerate() {
                    out.push_str(&self.syntax.open(id, Some(sub)));
                    self.write_body(out, item);
                    out.push_str(&self.syntax.close(id, Some(sub)));
                }
            }
            ValueShape::Opaque => out.push_str(&self.syntax.literal(id)),
        }
        log::trace!(target: "mangle.codec", "encoded value {id} as {shape:?}");
    }

    /// Text between a pair's tokens: escaped scalar text, a nested template's own
    /// flattening, or the full encoding of anything else.
    fn write_body(&mut self, out: &mut String, value: &Value) {
        match value {
            Value::Template(nested) => self.write_template(out, nested),
            _ => match value.scalar_text() {
                Some(text) => out.push_str(&escape_html(&text)),
                None => self.write_value(out, value),
            },
        }
    }
}
