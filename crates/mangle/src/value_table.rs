//! Per-session registry mapping values to stable placeholder indices.

use crate::template::{Value, ValueKey};
use std::collections::HashMap;

/// Ordered, append-only, deduplicating value registry.
///
/// Indices are issued in first-seen order and never change or get reused.
#[derive(Clone, Debug, Default)]
pub struct ValueTable {
    values: Vec<Value>,
    // Strings share a key on hash collision, so each key keeps every index issued for it.
    index: HashMap<ValueKey, Vec<usize>>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, appending it when it has not been seen yet.
    pub fn index_of(&mut self, value: &Value) -> usize {
        if let Some(found) = self.lookup(value) {
            return found;
        }
        let id = self.values.len();
        self.values.push(value.clone());
        self.index.entry(value.identity()).or_default().push(id);
        log::trace!(target: "mangle.codec", "value table: allocated index {id}");
        id
    }

    /// Index of `value` if already registered. Never allocates.
    pub fn lookup(&self, value: &Value) -> Option<usize> {
        self.index
            .get(&value.identity())?
            .iter()
            .copied()
            .find(|&id| self.values[id].same(value))
    }

    pub fn get(&self, id: usize) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;
    use std::rc::Rc;

    #[test]
    fn same_value_gets_same_index() {
        let mut table = ValueTable::new();
        let t = Value::from(Template::text("<b>x</b>"));
        assert_eq!(table.index_of(&Value::from("a")), 0);
        assert_eq!(table.index_of(&t), 1);
        assert_eq!(table.index_of(&Value::from("a")), 0);
        assert_eq!(table.index_of(&t.clone()), 1);
        assert_eq!(table.index_of(&Value::from(-0.0)), 2);
        assert_eq!(table.index_of(&Value::from(0.0)), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn structurally_equal_templates_are_distinct() {
        let mut table = ValueTable::new();
        let a = table.index_of(&Value::from(Template::text("x")));
        let b = table.index_of(&Value::from(Template::text("x")));
        assert_ne!(a, b);
    }

    #[test]
    fn lookup_never_allocates() {
        let mut table = ValueTable::new();
        assert_eq!(table.lookup(&Value::from("a")), None);
        assert!(table.is_empty());
        table.index_of(&Value::from("a"));
        assert_eq!(table.lookup(&Value::from("a")), Some(0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_returns_the_registered_value() {
        let mut table = ValueTable::new();
        let t = Rc::new(Template::text("x"));
        let id = table.index_of(&Value::Template(Rc::clone(&t)));
        let got = table
            .get(id)
            .and_then(Value::as_template)
            .expect("template stored");
        assert!(Rc::ptr_eq(got, &t));
        assert!(table.get(id + 1).is_none());
        assert_eq!(table.iter().count(), 1);
    }
}
