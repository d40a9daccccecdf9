//! Writers persisting the CSS of a build: one stylesheet per source file, and the global
//! utility-class stylesheet shared by every file.

mod global;
mod stylesheet;

pub use global::GlobalStylesheetWriter;
pub use stylesheet::StylesheetWriter;
