use super::{ClassList, Node};
use crate::session::SharedState;
use crate::template::Value;
use html::{AdjacentPosition, NodeId, SelectorError};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Element node handle. Dereferences to [`Node`] for the node-level operations.
#[derive(Clone, PartialEq, Eq)]
pub struct Element {
    node: Node,
}

impl Element {
    pub(crate) fn new(state: SharedState, id: NodeId) -> Self {
        Self {
            node: Node::new(state, id),
        }
    }

    fn wrap(&self, ids: impl IntoIterator<Item = NodeId>) -> Vec<Element> {
        ids.into_iter()
            .map(|id| Element::new(Rc::clone(&self.state), id))
            .collect()
    }

    /// Upper-case tag name; the fragment root reports `#document-fragment`.
    pub fn tag_name(&self) -> String {
        self.node_name()
    }

    pub fn local_name(&self) -> Option<String> {
        self.state.borrow().doc.tag_name(self.id).map(str::to_string)
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.state
            .borrow()
            .doc
            .attribute(self.id, name)
            .map(str::to_string)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.state.borrow().doc.has_attribute(self.id, name)
    }

    /// Writes a literal placeholder for `value` as the attribute's text.
    pub fn set_attribute(&self, name: &str, value: impl Into<Value>) {
        let mut state = self.state.borrow_mut();
        let token = state.encode_literal(&value.into());
        state.doc.set_attribute(self.id, name, &token);
    }

    pub fn remove_attribute(&self, name: &str) {
        self.state.borrow_mut().doc.remove_attribute(self.id, name);
    }

    pub fn query_selector(&self, selectors: &str) -> Result<Option<Element>, SelectorError> {
        let found = self.state.borrow().doc.query_selector(self.id, selectors)?;
        Ok(found.map(|id| Element::new(Rc::clone(&self.state), id)))
    }

    pub fn query_selector_all(&self, selectors: &str) -> Result<Vec<Element>, SelectorError> {
        let found = self
            .state
            .borrow()
            .doc
            .query_selector_all(self.id, selectors)?;
        Ok(self.wrap(found))
    }

    pub fn children(&self) -> Vec<Element> {
        let ids = self.state.borrow().doc.element_children(self.id);
        self.wrap(ids)
    }

    /// Encodes `value` and splices it in as the last child content.
    pub fn append_child(&self, value: impl Into<Value>) {
        self.insert_adjacent(AdjacentPosition::BeforeEnd, value.into());
    }

    pub fn prepend_child(&self, value: impl Into<Value>) {
        self.insert_adjacent(AdjacentPosition::AfterBegin, value.into());
    }

    pub fn inner_html(&self) -> String {
        self.state.borrow().doc.inner_html(self.id)
    }

    pub fn outer_html(&self) -> String {
        self.state.borrow().doc.outer_html(self.id)
    }

    pub fn class_list(&self) -> ClassList<'_> {
        ClassList::new(self)
    }
}

impl Deref for Element {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Node {
        element.node
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.local_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{MangleConfig, MutationSession, Template, Value};

    fn session(html: &str) -> MutationSession {
        MutationSession::new(&Template::text(html), &MangleConfig::default())
    }

    #[test]
    fn attributes_round_trip_through_placeholders() {
        let s = session("<a href=\"/x\" hidden>t</a>");
        let a = s
            .root()
            .query_selector("a")
            .expect("valid")
            .expect("a present");
        assert_eq!(a.get_attribute("href").as_deref(), Some("/x"));
        assert_eq!(a.get_attribute("hidden").as_deref(), Some(""));
        a.set_attribute("title", 42);
        a.remove_attribute("hidden");
        assert!(!a.has_attribute("hidden"));
        assert_eq!(a.get_attribute("title").as_deref(), Some("$$lit_mangler_0$$"));

        let out = s.finish().expect("decodes");
        assert_eq!(out.strings(), ["<a href=\"/x\" title=\"", "\">t</a>"]);
        assert!(out.values()[0].same(&Value::from(42)));
    }

    #[test]
    fn selectors_and_children_are_scoped_to_the_element() {
        let s = session("<ul><li>a</li><li>b</li></ul><li>c</li>");
        let ul = s
            .root()
            .query_selector("ul")
            .expect("valid")
            .expect("ul present");
        assert_eq!(ul.query_selector_all("li").expect("valid").len(), 2);
        assert_eq!(s.root().query_selector_all("li").expect("valid").len(), 3);
        let children = ul.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].text_content(), "b");
        assert_eq!(children[1].parent_element(), Some(ul.clone()));
        assert_eq!(ul.tag_name(), "UL");
        assert_eq!(ul.local_name().as_deref(), Some("ul"));
        assert!(ul.query_selector("li >").is_err());
    }

    #[test]
    fn append_and_prepend_keep_existing_children() {
        let s = session("<div><b>x</b></div>");
        let div = s
            .root()
            .query_selector("div")
            .expect("valid")
            .expect("div present");
        let b = div
            .query_selector("b")
            .expect("valid")
            .expect("b present");
        div.append_child(Template::text("<i>z</i>"));
        div.prepend_child(Value::from("a"));
        assert_eq!(
            div.inner_html(),
            "#$$lit_mangler_1$$a/$$lit_mangler_1$$<b>x</b>\
             #$$lit_mangler_0$$<i>z</i>/$$lit_mangler_0$$"
        );
        assert_eq!(b.parent_element(), Some(div.clone()));
        assert!(div.outer_html().starts_with("<div>"));
    }
}
