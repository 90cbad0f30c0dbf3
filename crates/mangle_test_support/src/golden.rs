//! Golden mutation fixtures.
//!
//! A fixture file is TOML with a `format` header and a list of `[[cases]]`. Each case
//! describes a source template, the edits a mutator performs, and the expected results:
//!
//! ```toml
//! format = "mangle-golden-v1"
//!
//! [[cases]]
//! id = "text-swap"
//! strings = ["<div><span>", "</span></div>"]
//! values = [{ kind = "str", value = "World" }]
//! edits = [{ op = "set_text", selector = "span", value = { kind = "str", value = "Earth" } }]
//! rendered = "<div><span>Earth</span></div>"
//! ```

use mangle::{Element, MangleError, Template, TemplateKind, Value};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const GOLDEN_FORMAT_V1: &str = "mangle-golden-v1";

#[derive(Clone, Debug, Deserialize)]
struct GoldenManifest {
    format: String,
    cases: Vec<GoldenCase>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GoldenCase {
    pub id: String,
    #[serde(default)]
    pub svg: bool,
    pub strings: Vec<String>,
    #[serde(default)]
    pub values: Vec<ValueSpec>,
    #[serde(default)]
    pub edits: Vec<EditSpec>,
    /// Serialized tree before any edit.
    pub flattened: Option<String>,
    pub rendered: String,
    /// Expected [`template_snapshot`](crate::snapshot::template_snapshot) of the result.
    pub snapshot: Option<Vec<String>>,
}

impl GoldenCase {
    pub fn template(&self) -> Template {
        let kind = if self.svg {
            TemplateKind::Svg
        } else {
            TemplateKind::Html
        };
        let values = self.values.iter().map(ValueSpec::to_value).collect();
        Template::new(kind, self.strings.clone(), values)
            .unwrap_or_else(|err| panic!("golden case '{}' is malformed: {err}", self.id))
    }
}

/// Serialized form of a [`Value`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValueSpec {
    Str {
        value: String,
    },
    Number {
        value: f64,
    },
    Bool {
        value: bool,
    },
    Null,
    Undefined,
    Template {
        strings: Vec<String>,
        #[serde(default)]
        values: Vec<ValueSpec>,
    },
    List {
        items: Vec<ValueSpec>,
    },
    /// A function returning `returns` when called.
    Function {
        returns: Box<ValueSpec>,
    },
}

impl ValueSpec {
    pub fn to_value(&self) -> Value {
        match self {
            ValueSpec::Str { value } => Value::from(value.as_str()),
            ValueSpec::Number { value } => Value::from(*value),
            ValueSpec::Bool { value } => Value::from(*value),
            ValueSpec::Null => Value::Null,
            ValueSpec::Undefined => Value::Undefined,
            ValueSpec::Template { strings, values } => {
                let values = values.iter().map(ValueSpec::to_value).collect::<Vec<_>>();
                match Template::html(strings.clone(), values) {
                    Ok(template) => Value::from(template),
                    Err(err) => panic!("nested template spec is malformed: {err}"),
                }
            }
            ValueSpec::List { items } => Value::list(items.iter().map(ValueSpec::to_value)),
            ValueSpec::Function { returns } => {
                let returns = returns.to_value();
                Value::lazy(move || returns.clone())
            }
        }
    }
}

/// One mutator step, applied to every element matching `selector` under the root.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditSpec {
    SetText { selector: String, value: ValueSpec },
    SetAttribute { selector: String, name: String, value: ValueSpec },
    RemoveAttribute { selector: String, name: String },
    Append { selector: String, value: ValueSpec },
    Prepend { selector: String, value: ValueSpec },
    InsertBefore { selector: String, value: ValueSpec },
    InsertAfter { selector: String, value: ValueSpec },
    Replace { selector: String, value: ValueSpec },
    Remove { selector: String },
    ClassAdd { selector: String, tokens: Vec<ValueSpec> },
    ClassRemove { selector: String, tokens: Vec<ValueSpec> },
    ClassToggle { selector: String, token: ValueSpec },
}

impl EditSpec {
    fn selector(&self) -> &str {
        match self {
            EditSpec::SetText { selector, .. }
            | EditSpec::SetAttribute { selector, .. }
            | EditSpec::RemoveAttribute { selector, .. }
            | EditSpec::Append { selector, .. }
            | EditSpec::Prepend { selector, .. }
            | EditSpec::InsertBefore { selector, .. }
            | EditSpec::InsertAfter { selector, .. }
            | EditSpec::Replace { selector, .. }
            | EditSpec::Remove { selector }
            | EditSpec::ClassAdd { selector, .. }
            | EditSpec::ClassRemove { selector, .. }
            | EditSpec::ClassToggle { selector, .. } => selector,
        }
    }

    pub fn apply(&self, root: &Element) -> Result<(), MangleError> {
        for element in root.query_selector_all(self.selector())? {
            match self {
                EditSpec::SetText { value, .. } => element.set_text_content(value.to_value()),
                EditSpec::SetAttribute { name, value, .. } => {
                    element.set_attribute(name, value.to_value())
                }
                EditSpec::RemoveAttribute { name, .. } => element.remove_attribute(name),
                EditSpec::Append { value, .. } => element.append_child(value.to_value()),
                EditSpec::Prepend { value, .. } => element.prepend_child(value.to_value()),
                EditSpec::InsertBefore { value, .. } => element.insert_before(value.to_value()),
                EditSpec::InsertAfter { value, .. } => element.insert_after(value.to_value()),
                EditSpec::Replace { value, .. } => element.replace(value.to_value()),
                EditSpec::Remove { .. } => element.remove(),
                EditSpec::ClassAdd { tokens, .. } => {
                    element.class_list().add(tokens.iter().map(ValueSpec::to_value))
                }
                EditSpec::ClassRemove { tokens, .. } => {
                    element.class_list().remove(tokens.iter().map(ValueSpec::to_value))
                }
                EditSpec::ClassToggle { token, .. } => {
                    element.class_list().toggle(token.to_value());
                }
            }
        }
        Ok(())
    }
}

pub fn load_golden_cases(path: &Path) -> Vec<GoldenCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read golden fixture {path:?}: {err}"));
    let manifest: GoldenManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse golden fixture {path:?}: {err}"));
    validate_manifest(&manifest, path);
    manifest.cases
}

fn validate_manifest(manifest: &GoldenManifest, path: &Path) {
    assert_eq!(
        manifest.format, GOLDEN_FORMAT_V1,
        "unsupported golden fixture format in {path:?}"
    );
    assert!(!manifest.cases.is_empty(), "golden fixture {path:?} has no cases");
    let mut seen = BTreeSet::new();
    for case in &manifest.cases {
        assert!(
            !case.id.trim().is_empty(),
            "empty id in golden fixture {path:?}"
        );
        assert!(
            seen.insert(case.id.as_str()),
            "duplicate golden case id in {path:?}: {}",
            case.id
        );
        assert_eq!(
            case.strings.len(),
            case.values.len() + 1,
            "golden case '{}' in {path:?} needs one more string than values",
            case.id
        );
    }
}
