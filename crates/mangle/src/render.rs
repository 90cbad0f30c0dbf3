//! Static string rendering of a template, for inspection and tests.

use crate::template::{Template, Value, format_number};
use html::escape_html;

impl Template {
    /// Concatenates chunks with rendered values.
    ///
    /// Scalars are HTML-escaped; `null`, `undefined` and `false` render empty; functions
    /// are called and their result rendered; lists render each element in order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_template(&mut out, self);
        out
    }
}

impl Value {
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_value(&mut out, self);
        out
    }
}

fn render_template(out: &mut String, template: &Template) {
    let strings = template.strings();
    out.push_str(&strings[0]);
    for (value, chunk) in template.values().iter().zip(&strings[1..]) {
        render_value(out, value);
        out.push_str(chunk);
    }
}

fn render_value(out: &mut String, value: &Value) {
    match value {
        Value::Undefined | Value::Null | Value::Bool(false) => {}
        Value::Bool(true) => out.push_str("true"),
        Value::Number(n) => out.push_str(&escape_html(&format_number(*n))),
        Value::Str(s) => out.push_str(&escape_html(s)),
        Value::Template(nested) => render_template(out, nested),
        Value::List(items) => items.iter().for_each(|item| render_value(out, item)),
        Value::Function(f) => render_value(out, &f.call()),
    }
}
