use std::path::Path;

use serde::{Deserialize, Serialize};
use twstyled_filesystem::FileSystem;
use xxhash_rust::xxh3::xxh3_64;

use crate::{EngineError, Theme};

/// Pseudo-class and parent-state variants, in precedence order (later wins)
pub fn default_variants() -> Vec<String> {
  [
    "dark",
    "group-hover",
    "group-focus",
    "focus-within",
    "first",
    "last",
    "odd",
    "even",
    "visited",
    "hover",
    "focus",
    "active",
    "disabled",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TailwindConfig {
  /// Separates variants from the utility, `hover:bg-red-500`
  pub separator: String,
  /// Prepended to every generated utility name
  pub prefix: String,
  pub theme: Theme,
  pub variants: Vec<String>,
}

impl Default for TailwindConfig {
  fn default() -> Self {
    TailwindConfig {
      separator: String::from(":"),
      prefix: String::new(),
      theme: Theme::default(),
      variants: default_variants(),
    }
  }
}

impl TailwindConfig {
  /// Parse a config document. JSON is tried first, then JSON5 (comments, trailing commas,
  /// unquoted keys).
  pub fn parse(source: &str, path: &Path) -> Result<Self, EngineError> {
    match serde_json::from_str::<TailwindConfig>(source) {
      Ok(config) => Ok(config),
      Err(json_error) => {
        tracing::debug!(
          path = %path.display(),
          "Config is not strict JSON ({}), retrying as JSON5",
          json_error
        );
        json5::from_str::<TailwindConfig>(source).map_err(|error| EngineError::InvalidConfig {
          path: path.to_path_buf(),
          message: error.to_string(),
        })
      }
    }
  }

  /// Load the config at `path`, falling back to the built-in defaults when no file exists.
  pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, EngineError> {
    if !fs.is_file(path) {
      tracing::debug!(path = %path.display(), "No utility config found, using defaults");
      return Ok(TailwindConfig::default());
    }

    let source = fs.read_to_string(path).map_err(|source| EngineError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&source, path)
  }

  /// Content hash of the normalized config.
  ///
  /// Two configs that deserialize to the same values hash equally regardless of formatting.
  pub fn content_hash(&self) -> Result<String, EngineError> {
    let normalized = serde_json::to_string(self)?;
    Ok(format!("{:016x}", xxh3_64(normalized.as_bytes())))
  }
}
