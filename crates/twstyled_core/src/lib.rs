//! Compile-time extraction of `css`, `styled` and `tw` styles.
//!
//! Each source file is rewritten so that its templates resolve to class names, its CSS lands in
//! a companion stylesheet and its utility classes feed one global stylesheet per build.

pub mod ast;
pub mod bindings;
pub mod combine;
mod error;
pub mod extract;
pub mod hash;
pub mod imports;
pub mod literals;
pub mod middleware;
pub mod normalize;
pub mod occurrence;
mod options;
pub mod paths;
pub mod preprocess;
pub mod processor;
mod session;
pub mod state;
mod transform;
pub mod uid;
pub mod writer;

pub use error::*;
pub use options::*;
pub use session::*;
pub use transform::*;
