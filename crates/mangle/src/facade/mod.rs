//! DOM-style editing surface handed to mutators.
//!
//! Handles are cheap clones sharing their session's state. Any edit that introduces a value
//! encodes it through the session's value table first: text, attribute and class values as
//! literal placeholders, node content with the full codec encoding.

mod class_list;
mod element;
mod node;

pub use class_list::ClassList;
pub use element::Element;
pub use node::Node;
