use std::path::Path;

use regex::Regex;
use swc_core::ecma::visit::VisitMut;

use crate::runner::run_visit;
pub use crate::runner::{RunContext, RunVisitResult};

/// Helper to test SWC visitors.
///
/// * Parse `code` with SWC as JSX
/// * Run a visitor over it
/// * Return the result
///
pub fn run_test_visit<V: VisitMut>(
  code: &str,
  make_visit: impl FnOnce(RunContext) -> V,
) -> RunVisitResult<V> {
  run_visit(code, Path::new("test.jsx"), make_visit).unwrap()
}

/// Remove whitespace from line starts and ends
pub fn remove_code_whitespace(code: &str) -> String {
  let re = Regex::new(r"\s*\n\s*").unwrap();
  re.replace_all(code, "\n").trim().to_string()
}
