use super::Element;
use crate::error::DecodeError;
use crate::session::SharedState;
use crate::template::Value;
use html::{AdjacentPosition, NodeId, NodeKind};
use std::fmt;
use std::rc::Rc;

/// Handle to any node of a session's tree.
///
/// Edits that introduce values go through the session's value table, so the new content
/// decodes back to those values when the session finishes.
#[derive(Clone)]
pub struct Node {
    pub(crate) state: SharedState,
    pub(crate) id: NodeId,
}

impl Node {
    pub(crate) fn new(state: SharedState, id: NodeId) -> Self {
        Self { state, id }
    }

    fn with_id(&self, id: NodeId) -> Node {
        Node::new(Rc::clone(&self.state), id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_element(&self) -> bool {
        self.state.borrow().doc.is_element(self.id)
    }

    pub fn as_element(&self) -> Option<Element> {
        self.is_element()
            .then(|| Element::new(Rc::clone(&self.state), self.id))
    }

    /// `SPAN`, `#text`, `#comment`, `#document-fragment` or the doctype name.
    pub fn node_name(&self) -> String {
        match self.state.borrow().doc.kind(self.id) {
            NodeKind::Element { name, .. } => name.to_ascii_uppercase(),
            NodeKind::Text(_) => "#text".to_string(),
            NodeKind::Comment(_) => "#comment".to_string(),
            NodeKind::Fragment => "#document-fragment".to_string(),
            NodeKind::Doctype(doctype) => doctype.clone(),
        }
    }

    pub fn parent_node(&self) -> Option<Node> {
        let parent = self.state.borrow().doc.parent(self.id)?;
        Some(self.with_id(parent))
    }

    pub fn parent_element(&self) -> Option<Element> {
        self.parent_node()?.as_element()
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        let state = self.state.borrow();
        state
            .doc
            .children(self.id)
            .iter()
            .map(|&child| self.with_id(child))
            .collect()
    }

    /// Raw text of the subtree, placeholder tokens included.
    pub fn text_content(&self) -> String {
        self.state.borrow().doc.text_content(self.id)
    }

    /// Replaces the node's content with a literal placeholder for `value`.
    pub fn set_text_content(&self, value: impl Into<Value>) {
        let mut state = self.state.borrow_mut();
        let token = state.encode_literal(&value.into());
        state.doc.set_text_content(self.id, &token);
    }

    /// Value registered for the first placeholder token in `text`.
    ///
    /// `Ok(None)` when `text` holds no token or the token's index was never issued. Token
    /// digits too large for an index are a [`DecodeError::InvalidId`].
    pub fn resolve_placeholder(&self, text: &str) -> Result<Option<Value>, DecodeError> {
        self.state.borrow().resolve_placeholder(text)
    }

    /// Detaches the node. No-op for the root.
    pub fn remove(&self) {
        self.state.borrow_mut().doc.detach(self.id);
    }

    /// Replaces the node with the encoding of `value`. No-op for the root.
    pub fn replace(&self, value: impl Into<Value>) {
        if self.insert_adjacent(AdjacentPosition::BeforeBegin, value.into()) {
            self.remove();
        }
    }

    pub fn insert_before(&self, value: impl Into<Value>) {
        self.insert_adjacent(AdjacentPosition::BeforeBegin, value.into());
    }

    pub fn insert_after(&self, value: impl Into<Value>) {
        self.insert_adjacent(AdjacentPosition::AfterEnd, value.into());
    }

    pub(crate) fn insert_adjacent(&self, position: AdjacentPosition, value: Value) -> bool {
        let mut state = self.state.borrow_mut();
        let outside = matches!(
            position,
            AdjacentPosition::BeforeBegin | AdjacentPosition::AfterEnd
        );
        if outside && state.doc.parent(self.id).is_none() {
            return false;
        }
        let html = state.encode(&value);
        state.doc.insert_adjacent_html(self.id, position, &html)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state) && self.id == other.id
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.node_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{DecodeError, MangleConfig, MutationSession, Template, Value};

    fn session(html: &str) -> MutationSession {
        MutationSession::new(&Template::text(html), &MangleConfig::default())
    }

    #[test]
    fn navigation_stops_at_the_root() {
        let s = session("<div><p>t</p></div>");
        let root = s.root();
        assert!(root.parent_node().is_none());
        let p = root
            .query_selector("p")
            .expect("valid")
            .expect("p present");
        let div = p.parent_element().expect("div parent");
        assert_eq!(div.node_name(), "DIV");
        assert_eq!(div.parent_node().map(|n| n.node_name()).as_deref(), Some("#document-fragment"));
        assert!(div.parent_element().is_none());
        let text = &p.child_nodes()[0];
        assert_eq!(text.node_name(), "#text");
        assert!(text.as_element().is_none());
    }

    #[test]
    fn root_edits_are_noops() {
        let s = session("<p>x</p>");
        let root = s.root();
        root.remove();
        root.replace("y");
        root.insert_before("y");
        root.insert_after("y");
        assert_eq!(s.to_html(), "<p>x</p>");
        assert_eq!(s.value_count(), 0);
    }

    #[test]
    fn replace_and_siblings_splice_encoded_html() {
        let s = session("<ul><li>a</li></ul>");
        let li = s
            .root()
            .query_selector("li")
            .expect("valid")
            .expect("li present");
        li.insert_before(Template::text("<li>0</li>"));
        li.insert_after(Value::from("b"));
        li.replace(Value::lazy(|| Value::Null));
        assert_eq!(
            s.to_html(),
            "<ul>#$$lit_mangler_0$$<li>0</li>/$$lit_mangler_0$$\
             $$lit_mangler_2$$#$$lit_mangler_1$$b/$$lit_mangler_1$$</ul>"
        );
    }

    #[test]
    fn detached_node_stays_detached() {
        let s = session("<p><b>x</b></p>");
        let b = s
            .root()
            .query_selector("b")
            .expect("valid")
            .expect("b present");
        b.remove();
        assert!(b.parent_node().is_none());
        b.insert_after("ignored");
        assert_eq!(s.to_html(), "<p></p>");
    }

    #[test]
    fn text_content_assignment_uses_a_literal_placeholder() {
        let s = session("<span>World</span>");
        let span = s
            .root()
            .query_selector("span")
            .expect("valid")
            .expect("span present");
        span.set_text_content("Earth");
        assert_eq!(span.text_content(), "$$lit_mangler_0$$");
        let value = span
            .resolve_placeholder(&span.text_content())
            .expect("well formed")
            .expect("registered");
        assert_eq!(value.as_str(), Some("Earth"));
        let unresolved = |text: &str| span.resolve_placeholder(text).map(|v| v.is_none());
        assert_eq!(unresolved("no token"), Ok(true));
        assert_eq!(unresolved("$$lit_mangler_7$$"), Ok(true));
        assert_eq!(
            unresolved("$$lit_mangler_99999999999999999999999$$"),
            Err(DecodeError::InvalidId {
                text: "99999999999999999999999".to_string()
            })
        );
    }
}
