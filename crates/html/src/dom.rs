//! Mutable arena DOM.
//!
//! Invariants:
//! - `NodeId`s are arena indices and stay valid for the lifetime of the document; removed
//!   nodes are detached, never freed or reused.
//! - A node has at most one parent, and appears exactly once in that parent's children.
//! - Only `Fragment` and `Element` nodes have children.

use crate::dom_builder::build_into;
use crate::selector::SelectorList;
use crate::serialize;
use crate::tokenizer::tokenize;
use crate::types::{Attribute, NodeId, NodeKind};
use crate::SelectorError;
use std::sync::Arc;

/// Where `insert_adjacent_html` splices the parsed nodes, relative to the target node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdjacentPosition {
    /// Before the node, as a sibling.
    BeforeBegin,
    /// Inside the node, before its first child.
    AfterBegin,
    /// Inside the node, after its last child.
    BeforeEnd,
    /// After the node, as a sibling.
    AfterEnd,
}

#[derive(Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Fragment | NodeKind::Element { .. })
    }
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    root: NodeId,
}

impl Document {
    /// Creates a document holding an empty fragment root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.create(NodeKind::Fragment);
        doc
    }

    /// Parses `html` as the content of a fragment root.
    pub fn parse_fragment(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        let stream = tokenize(html);
        build_into(&mut doc, root, &stream);
        log::trace!(
            target: "html.dom",
            "parsed fragment: {} bytes, {} tokens, {} nodes",
            html.len(),
            stream.tokens().len(),
            doc.nodes.len()
        );
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn record(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.index()]
    }

    fn record_mut(&mut self, id: NodeId) -> &mut NodeRecord {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.record(id).kind
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.record(id).children
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|c| *c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Appends a detached node to `parent`.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.record(parent).allows_children());
        debug_assert!(self.record(child).parent.is_none(), "child already attached");
        self.record_mut(parent).children.push(child);
        self.record_mut(child).parent = Some(parent);
    }

    fn insert_children_at(&mut self, parent: NodeId, index: usize, children: &[NodeId]) {
        for child in children {
            self.record_mut(*child).parent = Some(parent);
        }
        let siblings = &mut self.record_mut(parent).children;
        siblings.splice(index..index, children.iter().copied());
    }

    /// Detaches `id` (and its subtree) from its parent. Returns false if it had no parent.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.record_mut(id).parent.take() else {
            return false;
        };
        self.record_mut(parent).children.retain(|c| *c != id);
        true
    }

    fn detach_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.record_mut(id).children);
        for child in children {
            self.record_mut(child).parent = None;
        }
    }

    /// Concatenated text of `id`: own text for text/comment nodes, descendant text otherwise.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
            NodeKind::Doctype(_) => String::new(),
            NodeKind::Fragment | NodeKind::Element { .. } => {
                let mut out = String::new();
                let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
                while let Some(current) = stack.pop() {
                    match self.kind(current) {
                        NodeKind::Text(text) => out.push_str(text),
                        NodeKind::Element { .. } => {
                            stack.extend(self.children(current).iter().rev().copied())
                        }
                        _ => {}
                    }
                }
                out
            }
        }
    }

    /// DOM `textContent` assignment: replaces children with a single text node (none when
    /// `text` is empty), or overwrites the data of a text/comment node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if self.record(id).allows_children() {
            self.detach_children(id);
            if !text.is_empty() {
                let node = self.create(NodeKind::Text(text.to_string()));
                self.append_child(id, node);
            }
            return;
        }
        if let NodeKind::Text(existing) | NodeKind::Comment(existing) =
            &mut self.record_mut(id).kind
        {
            existing.clear();
            existing.push_str(text);
        }
    }

    fn attributes(&self, id: NodeId) -> Option<&[Attribute]> {
        match self.kind(id) {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    fn attributes_mut(&mut self, id: NodeId) -> Option<&mut Vec<Attribute>> {
        match &mut self.record_mut(id).kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Attribute value; bare attributes read as the empty string.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)?
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attributes(id)
            .is_some_and(|attrs| attrs.iter().any(|(k, _)| k.as_ref() == name))
    }

    /// Sets (or appends) an attribute. No-op on non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(attributes) = self.attributes_mut(id) else {
            return;
        };
        match attributes.iter_mut().find(|(k, _)| k.as_ref() == name) {
            Some((_, v)) => *v = Some(value.to_string()),
            None => attributes.push((Arc::from(name), Some(value.to_string()))),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let Some(attributes) = self.attributes_mut(id) else {
            return false;
        };
        let before = attributes.len();
        attributes.retain(|(k, _)| k.as_ref() != name);
        attributes.len() != before
    }

    /// Parses `html` and splices the resulting nodes relative to `id`.
    ///
    /// Returns false (and changes nothing) when the position needs a parent `id` doesn't
    /// have, or needs children `id` can't hold.
    pub fn insert_adjacent_html(
        &mut self,
        id: NodeId,
        position: AdjacentPosition,
        html: &str,
    ) -> bool {
        let (parent, index) = match position {
            AdjacentPosition::BeforeBegin | AdjacentPosition::AfterEnd => {
                let Some(parent) = self.parent(id) else {
                    return false;
                };
                let Some(pos) = self.children(parent).iter().position(|c| *c == id) else {
                    return false;
                };
                let index = if position == AdjacentPosition::BeforeBegin {
                    pos
                } else {
                    pos + 1
                };
                (parent, index)
            }
            AdjacentPosition::AfterBegin | AdjacentPosition::BeforeEnd => {
                if !self.record(id).allows_children() {
                    return false;
                }
                let index = if position == AdjacentPosition::AfterBegin {
                    0
                } else {
                    self.children(id).len()
                };
                (id, index)
            }
        };

        let holder = self.create(NodeKind::Fragment);
        build_into(self, holder, &tokenize(html));
        let parsed = std::mem::take(&mut self.record_mut(holder).children);
        log::trace!(
            target: "html.dom",
            "insert_adjacent_html {position:?}: {} nodes under {parent:?}",
            parsed.len()
        );
        self.insert_children_at(parent, index, &parsed);
        true
    }

    /// First descendant element of `scope` (document order) matching `selectors`.
    pub fn query_selector(
        &self,
        scope: NodeId,
        selectors: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        let list = SelectorList::parse(selectors)?;
        Ok(self.descendants(scope).find(|id| list.matches(self, *id)))
    }

    /// All descendant elements of `scope` (document order) matching `selectors`.
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selectors: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selectors)?;
        Ok(self
            .descendants(scope)
            .filter(|id| list.matches(self, *id))
            .collect())
    }

    /// Descendant elements of `scope` in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        std::iter::from_fn(move || {
            while let Some(current) = stack.pop() {
                if self.is_element(current) {
                    stack.extend(self.children(current).iter().rev().copied());
                    return Some(current);
                }
            }
            None
        })
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        serialize::inner_html(self, id)
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::outer_html(self, id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
