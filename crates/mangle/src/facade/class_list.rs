//! `classList` over placeholder-bearing class attributes.
//!
//! Classes written through this view are always bound values: `add` stores a literal
//! placeholder token, never the bare string. Reads and removals consider both forms, so
//! classes that were literal text in the source markup stay reachable by name.

use super::Element;
use crate::template::Value;

/// Stateless view over an element's class tokens.
#[derive(Clone, Copy, Debug)]
pub struct ClassList<'a> {
    element: &'a Element,
}

impl<'a> ClassList<'a> {
    pub(crate) fn new(element: &'a Element) -> Self {
        Self { element }
    }

    /// Current tokens as they appear in the markup, placeholders included.
    pub fn tokens(&self) -> Vec<String> {
        self.element.state.borrow().doc.class_tokens(self.element.id)
    }

    /// Adds each token as a placeholder for its value, registering the value if needed.
    pub fn add<V: Into<Value>>(&self, tokens: impl IntoIterator<Item = V>) {
        // Collected first: the iterator may read the tree.
        let values: Vec<Value> = tokens.into_iter().map(Into::into).collect();
        let mut state = self.element.state.borrow_mut();
        for value in &values {
            let literal = state.encode_literal(value);
            state.doc.add_class(self.element.id, &[literal.as_str()]);
        }
    }

    /// Removes both the literal string form and the placeholder form of each token.
    pub fn remove<V: Into<Value>>(&self, tokens: impl IntoIterator<Item = V>) {
        let values: Vec<Value> = tokens.into_iter().map(Into::into).collect();
        let mut state = self.element.state.borrow_mut();
        for value in &values {
            if let Some(text) = value.as_str() {
                state.doc.remove_class(self.element.id, &[text]);
            }
            if let Some(literal) = state.known_literal(value) {
                state.doc.remove_class(self.element.id, &[literal.as_str()]);
            }
        }
    }

    /// Toggles the literal string when it is present as-is, otherwise the placeholder form.
    /// Returns whether the toggled form is present afterwards.
    pub fn toggle(&self, token: impl Into<Value>) -> bool {
        let value = token.into();
        let mut state = self.element.state.borrow_mut();
        let id = self.element.id;
        if let Some(text) = value.as_str()
            && state.doc.contains_class(id, text)
        {
            return state.doc.toggle_class(id, text);
        }
        let literal = state.encode_literal(&value);
        state.doc.toggle_class(id, &literal)
    }

    pub fn contains(&self, token: impl Into<Value>) -> bool {
        let value = token.into();
        let state = self.element.state.borrow();
        let id = self.element.id;
        let literal_present = value
            .as_str()
            .is_some_and(|text| state.doc.contains_class(id, text));
        literal_present
            || state
                .known_literal(&value)
                .is_some_and(|literal| state.doc.contains_class(id, &literal))
    }
}

#[cfg(test)]
mod tests {
    use crate::{MangleConfig, MutationSession, Template, Value};

    fn div_session(class: &str) -> MutationSession {
        let html = format!("<div class=\"{class}\"></div>");
        MutationSession::new(&Template::text(html), &MangleConfig::default())
    }

    #[test]
    fn add_binds_even_literal_strings() {
        let s = div_session("a");
        let div = s
            .root()
            .query_selector("div")
            .expect("valid")
            .expect("div present");
        div.class_list().add(["c"]);
        assert_eq!(div.class_list().tokens(), ["a", "$$lit_mangler_0$$"]);
        assert!(div.class_list().contains("c"));
        assert!(div.class_list().contains("a"));
        assert!(!div.class_list().contains("z"));
        assert_eq!(s.value_count(), 1);
    }

    #[test]
    fn remove_covers_literal_and_bound_forms_without_allocating() {
        let s = div_session("a b");
        let div = s
            .root()
            .query_selector("div")
            .expect("valid")
            .expect("div present");
        div.class_list().add(["b"]);
        div.class_list().remove(["b", "never-seen"]);
        assert_eq!(div.class_list().tokens(), ["a"]);
        assert_eq!(s.value_count(), 1);
    }

    #[test]
    fn toggle_prefers_the_literal_string() {
        let s = div_session("a b");
        let div = s
            .root()
            .query_selector("div")
            .expect("valid")
            .expect("div present");
        assert!(!div.class_list().toggle("b"));
        assert_eq!(div.class_list().tokens(), ["a"]);
        assert_eq!(s.value_count(), 0);
        assert!(div.class_list().toggle("b"));
        assert_eq!(div.class_list().tokens(), ["a", "$$lit_mangler_0$$"]);
        assert!(!div.class_list().toggle("b"));
        assert_eq!(div.class_list().tokens(), ["a"]);
    }

    #[test]
    fn tokens_may_come_from_a_lazy_iterator_over_the_tree() {
        let s = MutationSession::new(
            &Template::text("<div class=\"a\"><span>hot</span><span>a</span></div>"),
            &MangleConfig::default(),
        );
        let div = s
            .root()
            .query_selector("div")
            .expect("valid")
            .expect("div present");
        let spans = div.query_selector_all("span").expect("valid");
        div.class_list().add(spans[..1].iter().map(|span| span.text_content()));
        assert!(div.class_list().contains("hot"));
        div.class_list().remove(spans[1..].iter().map(|span| span.text_content()));
        assert_eq!(div.class_list().tokens(), ["$$lit_mangler_0$$"]);
    }

    #[test]
    fn non_string_tokens_only_use_the_bound_form() {
        let s = div_session("1");
        let div = s
            .root()
            .query_selector("div")
            .expect("valid")
            .expect("div present");
        assert!(!div.class_list().contains(1));
        div.class_list().add([Value::from(1)]);
        assert!(div.class_list().contains(1));
        div.class_list().remove([1]);
        assert_eq!(div.class_list().tokens(), ["1"]);
    }
}
