use crate::dom::Document;
use crate::types::{NodeId, NodeKind, Token, TokenStream, is_void_element};

/// Appends the nodes described by `stream` as children of `parent`.
///
/// Tree construction is a plain open-elements stack: start tags push, end tags pop up to
/// the nearest open element with the same name. End tags with no matching open element are
/// dropped rather than closing unrelated ancestors.
pub(crate) fn build_into(doc: &mut Document, parent: NodeId, stream: &TokenStream) {
    let atoms = stream.atoms();
    let mut open_elements: Vec<(NodeId, &str)> = Vec::new();

    for token in stream.tokens() {
        let current = open_elements.last().map_or(parent, |(id, _)| *id);
        match token {
            Token::Doctype(s) => {
                let node = doc.create(NodeKind::Doctype(s.clone()));
                doc.append_child(current, node);
            }
            Token::Comment(c) => {
                let node = doc.create(NodeKind::Comment(c.clone()));
                doc.append_child(current, node);
            }
            Token::Text(txt) => {
                if !txt.is_empty() {
                    let node = doc.create(NodeKind::Text(txt.clone()));
                    doc.append_child(current, node);
                }
            }
            Token::StartTag {
                name, attributes, ..
            } => {
                let attributes = attributes
                    .iter()
                    .map(|(k, v)| (atoms.resolve_arc(*k), v.clone()))
                    .collect();
                let node = doc.create(NodeKind::Element {
                    name: atoms.resolve_arc(*name),
                    attributes,
                });
                doc.append_child(current, node);

                // `<div/>` stays open, matching browser behavior for non-void elements.
                let name = atoms.resolve(*name);
                if !is_void_element(name) {
                    open_elements.push((node, name));
                }
            }
            Token::EndTag(name) => {
                let target = atoms.resolve(*name);
                if let Some(pos) = open_elements.iter().rposition(|(_, open)| *open == target) {
                    open_elements.truncate(pos);
                }
            }
        }
    }
}
