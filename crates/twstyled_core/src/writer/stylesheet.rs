use std::collections::HashMap;
use std::path::{Path, PathBuf};

use base64::prelude::BASE64_STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use sourcemap::SourceMapBuilder;
use twstyled_filesystem::FileSystem;

use crate::state::FileState;
use crate::TransformError;

static SCRIPT_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(js|jsx|ts|tsx)$").unwrap());

/// What was emitted for a file the last time its source was processed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedStylesheet {
  pub code_hash: String,
  /// Module specifier of the stylesheet, `None` when the file produced no CSS
  pub css_filename: Option<String>,
}

/// Writes one stylesheet per source file, skipping files whose source is unchanged.
#[derive(Debug, Default)]
pub struct StylesheetWriter {
  cache: HashMap<PathBuf, CachedStylesheet>,
}

impl StylesheetWriter {
  /// The previous result for `file` if its source hashes the same.
  pub fn cached(&self, file: &FileState) -> Option<&CachedStylesheet> {
    self
      .cache
      .get(&file.filename)
      .filter(|cached| cached.code_hash == file.code_hash)
  }

  /// Write the stylesheet of `file` if it has any CSS, and return the specifier to require it by.
  pub fn write(
    &mut self,
    fs: &dyn FileSystem,
    file: &FileState,
    source_map: bool,
  ) -> Result<Option<String>, TransformError> {
    let css_filename = match &file.output_filename {
      Some(output) if !file.css_text.trim().is_empty() => {
        write_stylesheet(fs, file, output, source_map)?;
        file.css_filename.clone()
      }
      _ => {
        tracing::debug!(filename = %file.filename.display(), "No CSS to write");
        None
      }
    };

    self.cache.insert(
      file.filename.clone(),
      CachedStylesheet {
        code_hash: file.code_hash.clone(),
        css_filename: css_filename.clone(),
      },
    );
    Ok(css_filename)
  }
}

fn write_stylesheet(
  fs: &dyn FileSystem,
  file: &FileState,
  output: &Path,
  source_map: bool,
) -> Result<(), TransformError> {
  let mut content = file.css_text.clone();
  if source_map {
    content.push_str(&inline_source_map(file)?);
  }

  // A missing or unreadable stylesheet is rewritten
  let previous = fs.read_to_string(output).ok();
  if previous.as_deref() == Some(content.as_str()) {
    tracing::debug!(output = %output.display(), "Stylesheet unchanged, skipping write");
    return Ok(());
  }

  if let Some(directory) = output.parent() {
    fs.create_dir_all(directory)?;
  }
  tracing::info!("Writing to {}", output.display());
  fs.write(output, content.as_bytes())?;
  Ok(())
}

/// `/*# sourceMappingURL=data:application/json;base64,… */` for the file's mappings.
fn inline_source_map(file: &FileState) -> Result<String, TransformError> {
  let resource = file.resource_filename.as_deref().unwrap_or_default();
  let map_file = format!("./{}", SCRIPT_EXTENSION.replace(resource, ".css"));

  let mut builder = SourceMapBuilder::new(Some(map_file.as_str()));
  for mapping in &file.mappings {
    let source = builder.add_source(&mapping.source);
    builder.set_source_contents(source, Some(&file.code));
    let name = builder.add_name(&mapping.name);
    builder.add_raw(
      mapping.generated.line.saturating_sub(1),
      mapping.generated.column,
      mapping.original.line.saturating_sub(1),
      mapping.original.column,
      Some(source),
      Some(name),
      false,
    );
  }

  let mut buffer = Vec::new();
  builder.into_sourcemap().to_writer(&mut buffer)?;
  Ok(format!(
    "/*# sourceMappingURL=data:application/json;base64,{}*/",
    BASE64_STANDARD.encode(buffer)
  ))
}
