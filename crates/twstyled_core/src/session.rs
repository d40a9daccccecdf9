use std::path::{Path, PathBuf};
use std::sync::Arc;

use twstyled_filesystem::{normalize_path, FileSystemRef};
use twstyled_tailwind::{Engine, EngineCache};

use crate::transform::{transform, TransformOutput};
use crate::writer::{GlobalStylesheetWriter, StylesheetWriter};
use crate::{PluginOptions, TransformError};

/// State shared by every file of one build run.
///
/// Holds the utility engine, the per-file stylesheet cache and the global utility-class set.
/// Construct one per build and drop it when the build ends.
#[derive(Debug)]
pub struct BuildSession {
  pub(crate) fs: FileSystemRef,
  pub(crate) options: PluginOptions,
  pub(crate) cwd: PathBuf,
  engines: EngineCache,
  pub(crate) stylesheets: StylesheetWriter,
  pub(crate) global: GlobalStylesheetWriter,
}

impl BuildSession {
  pub fn new(fs: FileSystemRef, options: PluginOptions) -> Result<Self, TransformError> {
    let cwd = fs.cwd()?;
    let output_path = normalize_path(&cwd, &options.output_path);
    let global = GlobalStylesheetWriter::new(output_path, options.include_base);

    Ok(BuildSession {
      fs,
      cwd,
      engines: EngineCache::default(),
      stylesheets: StylesheetWriter::default(),
      global,
      options,
    })
  }

  pub fn options(&self) -> &PluginOptions {
    &self.options
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  /// Path of the global utility-class stylesheet
  pub fn global_stylesheet(&self) -> &Path {
    self.global.output_path()
  }

  /// The engine for the current contents of the configured utility config.
  pub fn engine(&mut self) -> Result<Arc<Engine>, TransformError> {
    let config_path = normalize_path(&self.cwd, &self.options.config_path);
    Ok(self.engines.load(&*self.fs, &config_path)?)
  }

  /// Transform one source file. See [`transform`].
  pub fn transform(
    &mut self,
    filename: &Path,
    code: &str,
  ) -> Result<TransformOutput, TransformError> {
    transform(self, filename, code)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use twstyled_filesystem::{FileSystem, InMemoryFileSystem};

  use super::*;

  fn fs() -> Arc<InMemoryFileSystem> {
    let fs = Arc::new(InMemoryFileSystem::default());
    fs.set_current_working_directory(Path::new("/app"));
    fs
  }

  #[test]
  fn test_paths_resolve_against_cwd() {
    let session = BuildSession::new(fs(), PluginOptions::default()).unwrap();

    assert_eq!(session.cwd(), Path::new("/app"));
    assert_eq!(
      session.global_stylesheet(),
      Path::new("/app/pages/global.twstyled.css")
    );
  }

  #[test]
  fn test_engine_is_rebuilt_when_config_changes() {
    let fs = fs();
    let mut session = BuildSession::new(fs.clone(), PluginOptions::default()).unwrap();

    let defaults = session.engine().unwrap();
    assert!(Arc::ptr_eq(&defaults, &session.engine().unwrap()));
    assert_eq!(defaults.separator(), ":");

    fs.write(
      Path::new("/app/tailwind.config.json"),
      br#"{ "separator": "_" }"#,
    )
    .unwrap();
    let changed = session.engine().unwrap();

    assert!(!Arc::ptr_eq(&defaults, &changed));
    assert_eq!(changed.separator(), "_");
  }
}
