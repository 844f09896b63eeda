//! Front-matter metadata codec.
//!
//! Every Kanri entity file is a YAML front-matter block fenced by `---`
//! lines, a blank line, then a free-form markdown body. This crate splits
//! and reassembles the two halves and type-checks headers against per-kind
//! schemas. Nothing here touches the disk.

pub mod codec;
pub mod value;

pub use codec::{decode, encode, encode_typed, update, validate_and_decode};
pub use value::{FrontMatter, HeaderValue};
