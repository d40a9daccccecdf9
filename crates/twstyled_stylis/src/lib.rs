//! A small nested-CSS compiler in the spirit of stylis.
//!
//! [`compile`] turns a block of CSS-like text (`.a{color:red;&:hover{color:blue}}`) into a flat
//! list of [`Element`] trees. [`serialize`] renders them back to CSS while threading every node
//! through a caller-supplied middleware callback first.

mod element;
pub mod list;
mod parser;
mod serializer;

pub use element::*;
pub use parser::compile;
pub use serializer::*;
