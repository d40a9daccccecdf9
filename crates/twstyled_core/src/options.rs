use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use twstyled_filesystem::FileSystem;

use crate::TransformError;

/// Options accepted by the pipeline. Relative paths resolve against the working directory.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
  /// Global utility-class stylesheet
  pub output_path: PathBuf,
  /// Utility engine config (JSON or JSON5). A missing file means the built-in theme.
  pub config_path: PathBuf,
  /// Root of the per-file stylesheets
  pub cache_directory: PathBuf,
  /// Replaces the source file's extension for its stylesheet
  pub extension: String,
  /// Append an inline source map to every per-file stylesheet
  pub source_map: bool,
  /// Prepend the preflight rules to the global stylesheet
  pub include_base: bool,
  /// Prefix class names with the name of the binding that declares them
  pub display_name: bool,
  /// Module the `css`, `styled` and `tw` helpers are imported from
  pub import_source: String,
}

impl Default for PluginOptions {
  fn default() -> Self {
    PluginOptions {
      output_path: PathBuf::from("./pages/global.twstyled.css"),
      config_path: PathBuf::from("./tailwind.config.json"),
      cache_directory: PathBuf::from("./.linaria-cache"),
      extension: String::from(".linaria.module.css"),
      source_map: false,
      include_base: true,
      display_name: false,
      import_source: String::from("@twstyled/core"),
    }
  }
}

impl PluginOptions {
  /// Read options from a JSON (or JSON5) document.
  pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, TransformError> {
    let source = fs.read_to_string(path)?;
    serde_json::from_str::<PluginOptions>(&source)
      .or_else(|_| json5::from_str::<PluginOptions>(&source))
      .map_err(|error| TransformError::InvalidOptions {
        path: path.to_path_buf(),
        message: error.to_string(),
      })
  }
}
