use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error("Failed to parse utility config {}: {message}", .path.display())]
  InvalidConfig { path: PathBuf, message: String },
  #[error("Failed to read utility config {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("Failed to normalize utility config: {0}")]
  Normalize(#[from] serde_json::Error),
}
