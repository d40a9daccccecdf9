use std::collections::HashMap;
use std::path::PathBuf;

use swc_core::common::Span;

use crate::hash::content_hash;
use crate::literals::StringLiteral;
use crate::occurrence::Location;

/// One entry of a per-file stylesheet's source map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapping {
  pub generated: Location,
  pub original: Location,
  pub name: String,
  pub source: String,
}

/// Everything the pipeline accumulates for one source file during one pass.
#[derive(Debug)]
pub struct FileState {
  /// Absolute path of the source file
  pub filename: PathBuf,
  pub cwd: PathBuf,
  pub code: String,
  /// Cache key of `code`
  pub code_hash: String,
  /// CSS of every processed occurrence, one rule block per line
  pub css_text: String,
  pub output_filename: Option<PathBuf>,
  pub resource_filename: Option<String>,
  /// Stylesheet path relative to the source file's directory, as required from the source
  pub css_filename: Option<String>,
  pub mappings: Vec<Mapping>,
  /// Utility classes of referenced occurrences, in discovery order
  pub utility_classes: Vec<String>,
  /// String literals of the module, in source order
  pub literals: Vec<StringLiteral>,
  /// New values for string literals, applied once extraction is done
  pub literal_rewrites: HashMap<Span, String>,
}

impl FileState {
  pub fn new(filename: PathBuf, cwd: PathBuf, code: &str) -> Self {
    FileState {
      filename,
      cwd,
      code: code.to_string(),
      code_hash: content_hash(code),
      css_text: String::new(),
      output_filename: None,
      resource_filename: None,
      css_filename: None,
      mappings: Vec::new(),
      utility_classes: Vec::new(),
      literals: Vec::new(),
      literal_rewrites: HashMap::new(),
    }
  }

  /// Literals lexically inside `scope`.
  pub fn literals_within(&self, scope: Span) -> impl Iterator<Item = &StringLiteral> + '_ {
    self
      .literals
      .iter()
      .filter(move |literal| literal.span.lo >= scope.lo && literal.span.hi <= scope.hi)
  }
}
