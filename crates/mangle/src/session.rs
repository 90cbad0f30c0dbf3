//! Mutation sessions: flatten → parse → mutate → serialize → decode.

use crate::codec::{Encoder, PlaceholderSyntax, decode};
use crate::config::MangleConfig;
use crate::error::{DecodeError, MangleError};
use crate::facade::Element;
use crate::template::{Template, TemplateKind, Value};
use crate::value_table::ValueTable;
use html::Document;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything one session owns. Facade handles share it through [`SharedState`].
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) doc: Document,
    pub(crate) table: ValueTable,
    pub(crate) syntax: PlaceholderSyntax,
}

pub(crate) type SharedState = Rc<RefCell<SessionState>>;

impl SessionState {
    /// Full encoding of `value`, as used for node content.
    pub(crate) fn encode(&mut self, value: &Value) -> String {
        Encoder::new(&mut self.table, &self.syntax).encode(value)
    }

    /// Bare literal token for `value`, as used for text, attribute and class values.
    pub(crate) fn encode_literal(&mut self, value: &Value) -> String {
        Encoder::new(&mut self.table, &self.syntax).encode_literal(value)
    }

    /// Literal token for `value` only if it is already registered.
    pub(crate) fn known_literal(&self, value: &Value) -> Option<String> {
        self.table.lookup(value).map(|id| self.syntax.literal(id))
    }

    pub(crate) fn resolve_placeholder(&self, text: &str) -> Result<Option<Value>, DecodeError> {
        let Some(token) = self.syntax.find_token(text, 0, text.len())? else {
            return Ok(None);
        };
        Ok(self.table.get(token.id).cloned())
    }
}

/// One template exposed as a mutable HTML tree.
///
/// The source template is never modified; [`finish`](Self::finish) builds a new one from the
/// tree as it stands.
pub struct MutationSession {
    state: SharedState,
    kind: TemplateKind,
}

impl MutationSession {
    pub fn new(template: &Template, config: &MangleConfig) -> Self {
        let mut table = ValueTable::new();
        let syntax = config.placeholder.clone();
        let html = Encoder::new(&mut table, &syntax).flatten(template);
        log::debug!(
            target: "mangle.session",
            "flattened {} values into {} bytes of html",
            table.len(),
            html.len()
        );
        let doc = Document::parse_fragment(&html);
        Self {
            state: Rc::new(RefCell::new(SessionState { doc, table, syntax })),
            kind: template.kind(),
        }
    }

    /// The fragment root wrapping the template's top-level nodes.
    pub fn root(&self) -> Element {
        let root = self.state.borrow().doc.root();
        Element::new(Rc::clone(&self.state), root)
    }

    /// Current serialized tree, placeholders included.
    pub fn to_html(&self) -> String {
        let state = self.state.borrow();
        state.doc.inner_html(state.doc.root())
    }

    /// Number of values registered so far, including those added by edits.
    pub fn value_count(&self) -> usize {
        self.state.borrow().table.len()
    }

    pub fn finish(self) -> Result<Template, MangleError> {
        let state = self.state.borrow();
        let html = state.doc.inner_html(state.doc.root());
        let template = decode(&html, &state.table, &state.syntax, self.kind)?;
        log::debug!(
            target: "mangle.session",
            "decoded {} bytes into {} chunks",
            html.len(),
            template.strings().len()
        );
        Ok(template)
    }
}

/// Runs `mutator` over the tree of the template produced by `get_template` and returns the
/// rebuilt template, using the default placeholder markers.
pub fn mutate<R, G, M>(get_template: G, receiver: &R, mutator: M) -> Result<Template, MangleError>
where
    G: FnOnce(&R) -> Template,
    M: FnOnce(&R, &Element) -> Result<(), MangleError>,
{
    mutate_with(&MangleConfig::default(), get_template, receiver, mutator)
}

pub fn mutate_with<R, G, M>(
    config: &MangleConfig,
    get_template: G,
    receiver: &R,
    mutator: M,
) -> Result<Template, MangleError>
where
    G: FnOnce(&R) -> Template,
    M: FnOnce(&R, &Element) -> Result<(), MangleError>,
{
    let template = get_template(receiver);
    let session = MutationSession::new(&template, config);
    mutator(receiver, &session.root())?;
    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting() -> Template {
        Template::html(["<div><span>", "</span></div>"], [Value::from("World")]).expect("parity")
    }

    #[test]
    fn noop_session_preserves_render() {
        let source = greeting();
        let session = MutationSession::new(&source, &MangleConfig::default());
        assert_eq!(
            session.to_html(),
            "<div><span>#$$lit_mangler_0$$World/$$lit_mangler_0$$</span></div>"
        );
        let out = session.finish().expect("decodes");
        assert_eq!(out.render(), source.render());
        assert_eq!(out.strings().len(), out.values().len() + 1);
    }

    #[test]
    fn receiver_is_passed_to_both_callbacks() {
        struct Greeter {
            name: &'static str,
        }
        let greeter = Greeter { name: "Ada" };
        let out = mutate(
            |g: &Greeter| {
                Template::html(["<p>", "</p>"], [Value::from(g.name)]).expect("parity")
            },
            &greeter,
            |g, root| {
                let p = root.query_selector("p")?.expect("p present");
                p.set_attribute("title", g.name);
                Ok(())
            },
        )
        .expect("mutation succeeds");
        assert_eq!(out.render(), "<p title=\"Ada\">Ada</p>");
    }

    #[test]
    fn mutator_errors_abort_the_session() {
        let err = mutate(|_: &()| greeting(), &(), |_, root| {
            root.query_selector("span[")?;
            Ok(())
        })
        .expect_err("bad selector");
        assert!(matches!(err, MangleError::Selector(_)));
    }

    #[test]
    fn sessions_number_values_independently() {
        let first = MutationSession::new(&greeting(), &MangleConfig::default());
        let second = MutationSession::new(&greeting(), &MangleConfig::default());
        assert_eq!(first.to_html(), second.to_html());
        assert_eq!(first.value_count(), 1);
    }

    #[test]
    fn custom_markers_flow_through() {
        let config = MangleConfig::with_markers("{{", "}}").expect("valid markers");
        let session = MutationSession::new(&greeting(), &config);
        assert_eq!(session.to_html(), "<div><span>#{{0}}World/{{0}}</span></div>");
        assert_eq!(session.finish().expect("decodes").render(), greeting().render());
    }
}
