//! HTML tree service: parse a fragment into a mutable arena DOM, edit it with DOM-style
//! primitives, and serialize it back to HTML text.

mod class_tokens;
mod dom;
mod dom_builder;
mod entities;
mod selector;
mod serialize;
mod tokenizer;
mod types;

pub use crate::dom::{AdjacentPosition, Document};
pub use crate::entities::escape_html;
pub use crate::selector::{SelectorError, SelectorList};
pub use crate::tokenizer::tokenize;
pub use crate::types::{AtomId, AtomTable, Attribute, NodeId, NodeKind, Token, TokenStream};
