use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use twstyled_filesystem::FileSystem;
use twstyled_tailwind::Engine;

use crate::hash::content_hash;
use crate::TransformError;

/// Aggregates the utility classes of every file of a build into one stylesheet.
///
/// The stylesheet is regenerated only when the sorted class set, or the engine config that
/// renders it, changes.
#[derive(Debug)]
pub struct GlobalStylesheetWriter {
  output_path: PathBuf,
  include_base: bool,
  classes: BTreeMap<PathBuf, Vec<String>>,
  last_hash: Option<String>,
  created_directory: bool,
}

impl GlobalStylesheetWriter {
  pub fn new(output_path: PathBuf, include_base: bool) -> Self {
    GlobalStylesheetWriter {
      output_path,
      include_base,
      classes: BTreeMap::new(),
      last_hash: None,
      created_directory: false,
    }
  }

  pub fn output_path(&self) -> &Path {
    &self.output_path
  }

  /// Replace the classes recorded for `filename` and rewrite the stylesheet if the combined set
  /// changed. Returns whether the stylesheet was written.
  pub fn update(
    &mut self,
    fs: &dyn FileSystem,
    engine: &Engine,
    filename: &Path,
    classes: &[String],
  ) -> Result<bool, TransformError> {
    let previous = self.classes.remove(filename);
    if classes.is_empty() && previous.is_none() {
      return Ok(false);
    }
    if !classes.is_empty() {
      self.classes.insert(filename.to_path_buf(), classes.to_vec());
    }

    self.rewrite(fs, engine)
  }

  /// The sorted, deduplicated class set of the whole build.
  pub fn classes(&self, engine: &Engine) -> Vec<String> {
    let mut classes = engine.compose(self.classes.values().map(Vec::as_slice));
    classes.sort();
    classes
  }

  fn rewrite(&mut self, fs: &dyn FileSystem, engine: &Engine) -> Result<bool, TransformError> {
    let classes = self.classes(engine);
    let hash = content_hash(&format!("{}|{}", classes.join(","), engine.config_hash()));
    if self.last_hash.as_deref() == Some(hash.as_str()) {
      tracing::debug!("Utility classes unchanged, skipping global stylesheet");
      return Ok(false);
    }

    let css = engine.generate(&classes, self.include_base);
    if !self.created_directory {
      if let Some(directory) = self.output_path.parent() {
        fs.create_dir_all(directory)?;
      }
      self.created_directory = true;
    }
    tracing::info!("Writing to {}", self.output_path.display());
    fs.write(&self.output_path, css.as_bytes())?;

    self.last_hash = Some(hash);
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use twstyled_filesystem::{InMemoryFileSystem, MockFileSystem};
  use twstyled_tailwind::TailwindConfig;

  use super::*;

  const OUTPUT: &str = "/app/pages/global.twstyled.css";

  fn engine() -> Engine {
    Engine::new(TailwindConfig::default()).unwrap()
  }

  fn classes(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
  }

  fn writer() -> GlobalStylesheetWriter {
    GlobalStylesheetWriter::new(PathBuf::from(OUTPUT), false)
  }

  #[test]
  fn test_shared_class_is_written_once() {
    let fs = InMemoryFileSystem::default();
    let engine = engine();
    let mut writer = writer();

    writer
      .update(&fs, &engine, Path::new("/app/src/a.jsx"), &classes(&["p-4"]))
      .unwrap();
    writer
      .update(&fs, &engine, Path::new("/app/src/b.jsx"), &classes(&["p-4", "m-2"]))
      .unwrap();

    let css = fs.read_to_string(Path::new(OUTPUT)).unwrap();
    assert_eq!(css.matches(".p-4 {").count(), 1);
    assert_eq!(css.matches(".m-2 {").count(), 1);
    assert_eq!(writer.classes(&engine), vec!["m-2", "p-4"]);
  }

  #[test]
  fn test_output_does_not_depend_on_file_order() {
    let engine = engine();
    let files = [
      ("/app/src/a.jsx", classes(&["p-4", "hover:text-red-500"])),
      ("/app/src/b.jsx", classes(&["flex", "p-4"])),
      ("/app/src/c.jsx", classes(&["md:m-2"])),
    ];

    let render = |order: &[usize]| {
      let fs = InMemoryFileSystem::default();
      let mut writer = writer();
      for index in order {
        let (filename, classes) = &files[*index];
        writer
          .update(&fs, &engine, Path::new(filename), classes)
          .unwrap();
      }
      fs.read_to_string(Path::new(OUTPUT)).unwrap()
    };

    assert_eq!(render(&[0, 1, 2]), render(&[2, 0, 1]));
    assert_eq!(render(&[0, 1, 2]), render(&[1, 2, 0]));
  }

  #[test]
  fn test_unchanged_class_set_is_not_rewritten() {
    let engine = engine();
    let mut fs = MockFileSystem::new();
    fs.expect_create_dir_all().times(1).returning(|_| Ok(()));
    fs.expect_write().times(1).returning(|_, _| Ok(()));

    let mut writer = writer();
    assert!(writer
      .update(&fs, &engine, Path::new("/app/src/a.jsx"), &classes(&["p-4"]))
      .unwrap());
    // Same set through another file
    assert!(!writer
      .update(&fs, &engine, Path::new("/app/src/b.jsx"), &classes(&["p-4"]))
      .unwrap());
    assert!(!writer
      .update(&fs, &engine, Path::new("/app/src/a.jsx"), &classes(&["p-4"]))
      .unwrap());
  }

  #[test]
  fn test_files_without_classes_are_ignored() {
    let engine = engine();
    let mut fs = MockFileSystem::new();
    fs.expect_create_dir_all().never();
    fs.expect_write().never();

    let mut writer = writer();
    assert!(!writer
      .update(&fs, &engine, Path::new("/app/src/a.jsx"), &[])
      .unwrap());
  }

  #[test]
  fn test_removed_classes_are_dropped() {
    let fs = InMemoryFileSystem::default();
    let engine = engine();
    let mut writer = writer();

    writer
      .update(&fs, &engine, Path::new("/app/src/a.jsx"), &classes(&["p-4"]))
      .unwrap();
    assert!(writer
      .update(&fs, &engine, Path::new("/app/src/a.jsx"), &[])
      .unwrap());

    assert!(writer.classes(&engine).is_empty());
    assert_eq!(fs.read_to_string(Path::new(OUTPUT)).unwrap(), "");
  }

  #[test]
  fn test_config_change_forces_rewrite() {
    let fs = InMemoryFileSystem::default();
    let mut writer = writer();
    let classes = classes(&["p-4"]);

    assert!(writer
      .update(&fs, &engine(), Path::new("/app/src/a.jsx"), &classes)
      .unwrap());

    let changed = Engine::new(TailwindConfig {
      separator: "_".into(),
      ..Default::default()
    })
    .unwrap();
    assert!(writer
      .update(&fs, &changed, Path::new("/app/src/a.jsx"), &classes)
      .unwrap());
  }

  #[test]
  fn test_base_styles_are_prepended() {
    let fs = InMemoryFileSystem::default();
    let engine = engine();
    let mut writer = GlobalStylesheetWriter::new(PathBuf::from(OUTPUT), true);

    writer
      .update(&fs, &engine, Path::new("/app/src/a.jsx"), &classes(&["p-4"]))
      .unwrap();

    let css = fs.read_to_string(Path::new(OUTPUT)).unwrap();
    let with_classes = engine.generate(&classes(&["p-4"]), true);
    assert_eq!(css, with_classes);
    assert!(css.len() > engine.generate(&classes(&["p-4"]), false).len());
  }
}
