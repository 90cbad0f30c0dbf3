//! HTML serialization for the arena DOM.
//!
//! - Attribute values are always double-quoted; bare attributes are emitted without `=`.
//! - Text escapes `&`, `<`, `>` and U+00A0; attribute values escape `&`, `"` and U+00A0.
//! - Void elements have no end tag. `script`/`style` text is written raw.

use crate::dom::Document;
use crate::entities::{escape_attribute, escape_text};
use crate::types::{NodeId, NodeKind, is_rawtext_element, is_void_element};

pub(crate) fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    let raw = doc.tag_name(id).is_some_and(is_rawtext_element);
    for child in doc.children(id) {
        write_node(doc, *child, raw, &mut out);
    }
    out
}

pub(crate) fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    let raw = doc
        .parent(id)
        .and_then(|p| doc.tag_name(p))
        .is_some_and(is_rawtext_element);
    write_node(doc, id, raw, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    match doc.kind(id) {
        NodeKind::Fragment => {
            for child in doc.children(id) {
                write_node(doc, *child, false, out);
            }
        }
        NodeKind::Doctype(doctype) => {
            out.push_str("<!");
            out.push_str(doctype);
            out.push('>');
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_text(out, text);
            }
        }
        NodeKind::Element { name, attributes } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                if let Some(value) = value {
                    out.push_str("=\"");
                    escape_attribute(out, value);
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            let raw = is_rawtext_element(name);
            for child in doc.children(id) {
                write_node(doc, *child, raw, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}
