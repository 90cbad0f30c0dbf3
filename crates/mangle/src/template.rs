//! Template data model: literal chunks interleaved with interpolated values.

use crate::error::TemplateError;
use std::fmt;
use std::rc::Rc;

/// Kind tag identifying a value as a rendered template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TemplateKind {
    #[default]
    Html,
    Svg,
}

/// Ordered literal chunks `S[0..=n]` and values `V[0..n]`, with `S.len() == V.len() + 1`.
///
/// Immutable once constructed; a mutation session always produces a new template.
#[derive(Clone, Debug)]
pub struct Template {
    kind: TemplateKind,
    strings: Vec<String>,
    values: Vec<Value>,
}

impl Template {
    pub fn new(
        kind: TemplateKind,
        strings: Vec<String>,
        values: Vec<Value>,
    ) -> Result<Self, TemplateError> {
        if strings.len() != values.len() + 1 {
            return Err(TemplateError::ChunkMismatch {
                strings: strings.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            kind,
            strings,
            values,
        })
    }

    pub fn html<S: Into<String>>(
        strings: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self, TemplateError> {
        Self::new(
            TemplateKind::Html,
            strings.into_iter().map(Into::into).collect(),
            values.into_iter().collect(),
        )
    }

    pub fn svg<S: Into<String>>(
        strings: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self, TemplateError> {
        Self::new(
            TemplateKind::Svg,
            strings.into_iter().map(Into::into).collect(),
            values.into_iter().collect(),
        )
    }

    pub(crate) fn from_parts(kind: TemplateKind, strings: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(strings.len(), values.len() + 1);
        Self {
            kind,
            strings,
            values,
        }
    }

    /// A template with a single chunk and no values.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TemplateKind::Html,
            strings: vec![text.into()],
            values: Vec::new(),
        }
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Zero-argument deferred value.
#[derive(Clone)]
pub struct Lazy(Rc<dyn Fn() -> Value>);

impl Lazy {
    pub fn new(f: impl Fn() -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) -> Value {
        (self.0)()
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lazy({:#x})", self.addr())
    }
}

/// An interpolated value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Template(Rc<Template>),
    List(Rc<[Value]>),
    Function(Lazy),
}

/// How a value is placed into flattened HTML, decided once per encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueShape {
    /// Text between a pair of tokens.
    Scalar,
    /// The nested template's own flattened HTML between a pair of tokens.
    NestedTemplate,
    /// A run of sub-indexed pairs, one per element.
    Sequence,
    /// A bare literal token; the value is restored verbatim on decode.
    Opaque,
}

/// Identity used for deduplication: primitives by value, heap values by pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Undefined,
    Null,
    Bool(bool),
    Number(u64),
    Str(u64),
    Ptr(usize),
}

impl Value {
    pub fn lazy(f: impl Fn() -> Value + 'static) -> Self {
        Value::Function(Lazy::new(f))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            Value::Bool(_) | Value::Number(_) | Value::Str(_) => ValueShape::Scalar,
            Value::Template(_) => ValueShape::NestedTemplate,
            Value::List(items) if !items.is_empty() => ValueShape::Sequence,
            Value::List(_) | Value::Function(_) | Value::Null | Value::Undefined => {
                ValueShape::Opaque
            }
        }
    }

    /// Textual form of a scalar; `None` for every other shape.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Str(s) => Some(s.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_template(&self) -> Option<&Rc<Template>> {
        match self {
            Value::Template(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Deduplication key.
    ///
    /// Strings hash by content; the full string is compared by [`ValueTable`] on collision.
    ///
    /// [`ValueTable`]: crate::ValueTable
    pub fn identity(&self) -> ValueKey {
        match self {
            Value::Undefined => ValueKey::Undefined,
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            // -0.0 and 0.0 are the same value under strict equality.
            Value::Number(n) if *n == 0.0 => ValueKey::Number(0f64.to_bits()),
            Value::Number(n) => ValueKey::Number(n.to_bits()),
            Value::Str(s) => ValueKey::Str(hash_str(s)),
            Value::Template(t) => ValueKey::Ptr(Rc::as_ptr(t) as usize),
            Value::List(items) => ValueKey::Ptr(Rc::as_ptr(items) as *const () as usize),
            Value::Function(f) => ValueKey::Ptr(f.addr()),
        }
    }

    /// Identity comparison: primitives by value, templates/lists/functions by reference.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => self.identity() == other.identity(),
        }
    }
}

fn hash_str(s: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Formats a number the way script engines print it: `1`, `1.5`, `NaN`, `Infinity`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Template> for Value {
    fn from(t: Template) -> Self {
        Value::Template(Rc::new(t))
    }
}

impl From<Rc<Template>> for Value {
    fn from(t: Rc<Template>) -> Self {
        Value::Template(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }
}

impl From<Lazy> for Value {
    fn from(f: Lazy) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
