//! Template mangling: expose a template as a mutable HTML tree, edit it with DOM-style
//! operations, and rebuild a template whose interpolated values survive untouched.
//!
//! ```
//! use mangle::{Template, Value, mutate};
//!
//! let out = mutate(
//!     |_: &()| Template::html(["<div><span>", "</span></div>"], [Value::from("World")]).unwrap(),
//!     &(),
//!     |_, root| {
//!         if let Some(span) = root.query_selector("span")? {
//!             span.set_text_content("Earth");
//!         }
//!         Ok(())
//!     },
//! )
//! .unwrap();
//! assert_eq!(out.render(), "<div><span>Earth</span></div>");
//! ```

pub mod codec;
mod config;
mod error;
pub mod facade;
mod render;
mod session;
mod template;
mod value_table;

pub use crate::config::MangleConfig;
pub use crate::error::{ConfigError, DecodeError, MangleError, TemplateError};
pub use crate::facade::{ClassList, Element, Node};
pub use crate::session::{MutationSession, mutate, mutate_with};
pub use crate::template::{Lazy, Template, TemplateKind, Value, ValueKey, ValueShape};
pub use crate::value_table::ValueTable;
pub use html::SelectorError;
