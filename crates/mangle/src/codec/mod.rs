//! Placeholder codec: flattens a template into HTML text and rebuilds it afterwards.
//!
//! Every value gets an index in a per-session [`ValueTable`](crate::ValueTable). How the
//! value appears in the HTML depends on its [`ValueShape`](crate::ValueShape):
//!
//! | shape            | flattened form                                   |
//! |------------------|--------------------------------------------------|
//! | scalar           | `#TOKEN` escaped text `/TOKEN`                   |
//! | nested template  | `#TOKEN` nested flattening `/TOKEN`              |
//! | sequence         | one `#TOKEN_j ... /TOKEN_j` pair per element     |
//! | opaque           | bare `TOKEN`                                     |
//!
//! Decoding maps bare tokens back to the table entry, pairs to nested templates and runs
//! of sub-indexed pairs to lists.

mod decode;
mod encode;
mod placeholder;

pub use decode::{Decoder, decode};
pub use encode::Encoder;
pub use placeholder::{
    DEFAULT_CLOSE, DEFAULT_OPEN, Placeholder, PlaceholderKind, PlaceholderSyntax,
};
