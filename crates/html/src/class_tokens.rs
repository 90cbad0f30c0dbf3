//! `class` attribute token operations with DOMTokenList semantics.
//!
//! Tokens are split on ASCII whitespace. Every write rewrites the attribute as the
//! deduplicated token list joined by single spaces, keeping first-seen order.

use crate::dom::Document;
use crate::types::NodeId;

const CLASS: &str = "class";

impl Document {
    pub fn class_tokens(&self, id: NodeId) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        for token in self.attribute(id, CLASS).unwrap_or("").split_ascii_whitespace() {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        tokens
    }

    pub fn contains_class(&self, id: NodeId, token: &str) -> bool {
        self.attribute(id, CLASS)
            .is_some_and(|list| list.split_ascii_whitespace().any(|t| t == token))
    }

    fn write_class_tokens(&mut self, id: NodeId, tokens: &[String]) {
        self.set_attribute(id, CLASS, &tokens.join(" "));
    }

    /// Adds each token not already present. Empty or whitespace-bearing tokens are skipped.
    pub fn add_class(&mut self, id: NodeId, tokens: &[&str]) {
        if !self.is_element(id) {
            return;
        }
        let mut list = self.class_tokens(id);
        for token in tokens {
            if is_valid_token(token) && !list.iter().any(|t| t == token) {
                list.push(token.to_string());
            }
        }
        self.write_class_tokens(id, &list);
    }

    /// Removes each token; absent tokens are ignored. The attribute is only rewritten when
    /// it exists.
    pub fn remove_class(&mut self, id: NodeId, tokens: &[&str]) {
        if !self.has_attribute(id, CLASS) {
            return;
        }
        let mut list = self.class_tokens(id);
        list.retain(|t| !tokens.contains(&t.as_str()));
        self.write_class_tokens(id, &list);
    }

    /// Toggles `token`, returning whether it is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, token: &str) -> bool {
        if self.contains_class(id, token) {
            self.remove_class(id, &[token]);
            false
        } else if self.is_element(id) && is_valid_token(token) {
            self.add_class(id, &[token]);
            true
        } else {
            false
        }
    }
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && !token.bytes().any(|b| b.is_ascii_whitespace())
}
