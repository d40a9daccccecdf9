use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};
use twstyled_filesystem::normalize_path;
use twstyled_stylis::Element;

use super::Middleware;
use crate::occurrence::{Location, OccurrenceState};
use crate::paths::{module_specifier, relative_path};
use crate::state::{FileState, Mapping};
use crate::TransformError;

static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^./]+$").unwrap());
static RELATIVE_URL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r#"\burl\((["']?)(\.[^)'"]+?)(["']?)\)"#).unwrap());

/// Places the occurrence's CSS in the file's stylesheet: picks the stylesheet path, rebases
/// relative `url()`s onto it and records source-map entries.
#[derive(Debug)]
pub struct CssEmitter {
  cache_directory: PathBuf,
  extension: String,
}

impl CssEmitter {
  pub fn new(cache_directory: PathBuf, extension: String) -> Self {
    CssEmitter {
      cache_directory,
      extension,
    }
  }

  /// `<cache>/<source relative to cwd, extension replaced>`
  pub fn output_filename(&self, file: &FileState) -> PathBuf {
    let cache_directory = normalize_path(&file.cwd, &self.cache_directory);
    let resource = relative_path(&file.cwd, &file.filename);
    let output = EXTENSION.replace(&resource, NoExpand(&self.extension));
    normalize_path(&cache_directory, Path::new(output.as_ref()))
  }
}

impl Middleware for CssEmitter {
  fn enter(
    &self,
    file: &mut FileState,
    state: &mut OccurrenceState<'_>,
  ) -> Result<(), TransformError> {
    let output = match &file.output_filename {
      Some(output) => output.clone(),
      None => self.output_filename(file),
    };
    state.output_filename = Some(output);
    state.resource_filename = Some(relative_path(&file.cwd, &file.filename));
    Ok(())
  }

  fn stylis(
    &self,
    file: &mut FileState,
    state: &mut OccurrenceState<'_>,
    mut element: Element,
  ) -> Result<Element, TransformError> {
    if !element.is_declaration() {
      return Ok(element);
    }
    let (Some(output), Some(source)) = (&state.output_filename, file.filename.parent()) else {
      return Ok(element);
    };
    let Some(output_directory) = output.parent() else {
      return Ok(element);
    };

    let value = element.output.as_deref().unwrap_or(&element.value);
    if !value.contains("url(") {
      return Ok(element);
    }

    let rewritten = RELATIVE_URL.replace_all(value, |captures: &Captures<'_>| {
      let (open, url, close) = (&captures[1], &captures[2], &captures[3]);
      if open != close {
        return captures[0].to_string();
      }
      let asset = normalize_path(source, Path::new(url));
      format!(
        "url({open}{}{close})",
        relative_path(output_directory, &asset)
      )
    });
    element.output = Some(rewritten.into_owned());
    Ok(element)
  }

  fn exit(
    &self,
    file: &mut FileState,
    state: &mut OccurrenceState<'_>,
  ) -> Result<(), TransformError> {
    if let (false, Some(output)) = (state.css_text.is_empty(), state.output_filename.clone()) {
      if let Some(source_directory) = file.filename.parent() {
        file.css_filename = Some(module_specifier(source_directory, &output));
      }
      file.output_filename = Some(output);
      file.resource_filename = state.resource_filename.clone();
    }

    if let (Some(start), Some(resource)) = (state.occurrence.start, &state.resource_filename) {
      file.mappings.push(Mapping {
        generated: Location {
          line: state.index as u32 + 1,
          column: 0,
        },
        original: start,
        name: state.occurrence.selector.clone(),
        source: resource.clone(),
      });
    }
    Ok(())
  }
}
