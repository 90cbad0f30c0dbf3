use std::collections::HashMap;
use std::sync::Arc;

/// Arena index of a node inside a [`crate::Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque atom identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

/// Per-parse interning table for tag and attribute names.
///
/// Tag names are interned in ASCII-lowercase form. Attribute names keep the
/// case they were written with so binding prefixes like `.someProp` survive a
/// parse/serialize round trip.
#[derive(Debug, Default)]
pub struct AtomTable {
    atoms: Vec<Arc<str>>,
    map: HashMap<Arc<str>, AtomId>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> AtomId {
        if let Some(id) = self.map.get(name) {
            return *id;
        }
        let atom = Arc::<str>::from(name);
        let id = AtomId(self.atoms.len() as u32);
        self.atoms.push(Arc::clone(&atom));
        self.map.insert(atom, id);
        id
    }

    pub fn intern_ascii_lowercase(&mut self, name: &str) -> AtomId {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.intern(&name.to_ascii_lowercase())
        } else {
            self.intern(name)
        }
    }

    pub fn resolve(&self, id: AtomId) -> &str {
        &self.atoms[id.0 as usize]
    }

    pub fn resolve_arc(&self, id: AtomId) -> Arc<str> {
        Arc::clone(&self.atoms[id.0 as usize])
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[derive(Debug)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: AtomId,
        attributes: Vec<(AtomId, Option<String>)>,
        self_closing: bool,
    },
    EndTag(AtomId),
    Comment(String),
    Text(String),
}

#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    atoms: AtomTable,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, atoms: AtomTable) -> Self {
        Self { tokens, atoms }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

/// Attribute list entry: name plus optional value (`None` for bare attributes).
pub type Attribute = (Arc<str>, Option<String>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a parsed fragment; serializes as its children only.
    Fragment,
    Doctype(String),
    Element {
        name: Arc<str>,
        attributes: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub(crate) fn is_rawtext_element(name: &str) -> bool {
    name == "script" || name == "style"
}
