//! Line-oriented structural dump of a template, for golden comparisons.
//!
//! ```text
//! template html
//!   "<div><span>"
//!   template html
//!     "World"
//!   "</span></div>"
//! ```

use crate::escape_text;
use mangle::{Template, TemplateKind, Value};

pub fn template_snapshot(template: &Template) -> Vec<String> {
    let mut lines = Vec::new();
    push_template(&mut lines, template, 0);
    lines
}

fn push_template(lines: &mut Vec<String>, template: &Template, depth: usize) {
    let kind = match template.kind() {
        TemplateKind::Html => "html",
        TemplateKind::Svg => "svg",
    };
    lines.push(format!("{}template {kind}", indent(depth)));
    let strings = template.strings();
    push_chunk(lines, &strings[0], depth + 1);
    for (value, chunk) in template.values().iter().zip(&strings[1..]) {
        push_value(lines, value, depth + 1);
        push_chunk(lines, chunk, depth + 1);
    }
}

fn push_chunk(lines: &mut Vec<String>, chunk: &str, depth: usize) {
    lines.push(format!("{}\"{}\"", indent(depth), escape_text(chunk)));
}

fn push_value(lines: &mut Vec<String>, value: &Value, depth: usize) {
    let pad = indent(depth);
    match value {
        Value::Undefined => lines.push(format!("{pad}undefined")),
        Value::Null => lines.push(format!("{pad}null")),
        Value::Bool(b) => lines.push(format!("{pad}bool {b}")),
        Value::Number(n) => lines.push(format!("{pad}number {n}")),
        Value::Str(s) => lines.push(format!("{pad}str \"{}\"", escape_text(s))),
        Value::Function(_) => lines.push(format!("{pad}function")),
        Value::Template(nested) => push_template(lines, nested, depth),
        Value::List(items) => {
            lines.push(format!("{pad}list [{}]", items.len()));
            for item in items.iter() {
                push_value(lines, item, depth + 1);
            }
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
