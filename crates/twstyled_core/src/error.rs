use std::path::PathBuf;

use twstyled_swc_runner::RunError;
use twstyled_tailwind::EngineError;

/// Errors that abort the transform of one file.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
  #[error("Not yet implemented -- object expression in css or tw attribute")]
  UnsupportedObjectStyle,
  #[error("Spread elements are not supported in inline Tailwind variant {attribute}")]
  SpreadInVariantArray { attribute: String },
  #[error("inline Tailwind variant {attribute} must be an array expression")]
  VariantNotArray { attribute: String },
  #[error("Cannot turn a {kind} into a style template")]
  UnclassifiableNode { kind: &'static str },
  #[error("Cannot infer name from node with type \"{kind}\"")]
  CannotInferName { kind: &'static str },
  #[error("Cannot evaluate interpolation `{source_text}` in {filename}:{line}")]
  UnevaluatedInterpolation {
    filename: String,
    line: usize,
    source_text: String,
  },
  #[error("Invalid plugin options in {path}: {message}")]
  InvalidOptions { path: PathBuf, message: String },
  #[error(transparent)]
  Run(#[from] RunError),
  #[error(transparent)]
  Engine(#[from] EngineError),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  SourceMap(#[from] sourcemap::Error),
}
