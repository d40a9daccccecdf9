use std::path::Path;
use std::sync::Arc;

use twstyled_filesystem::FileSystem;

use crate::{Engine, EngineError, TailwindConfig};

/// Holds the engine for the most recently seen config.
///
/// The engine is rebuilt only when the config's content hash changes.
#[derive(Debug, Default)]
pub struct EngineCache {
  current: Option<Arc<Engine>>,
}

impl EngineCache {
  pub fn get_or_build(&mut self, config: &TailwindConfig) -> Result<Arc<Engine>, EngineError> {
    self.invalidate_if_changed(config)?;

    if let Some(engine) = &self.current {
      return Ok(engine.clone());
    }

    let engine = Arc::new(Engine::new(config.clone())?);
    self.current = Some(engine.clone());
    Ok(engine)
  }

  /// Drop the cached engine when `config` hashes differently from the config it was built
  /// from. Returns whether an engine was dropped.
  pub fn invalidate_if_changed(&mut self, config: &TailwindConfig) -> Result<bool, EngineError> {
    let hash = config.content_hash()?;
    match &self.current {
      Some(engine) if engine.config_hash() != hash => {
        tracing::debug!(
          previous = %engine.config_hash(),
          next = %hash,
          "Utility config changed, rebuilding engine"
        );
        self.current = None;
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  /// Load the config at `path` and return the engine for it.
  pub fn load(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<Arc<Engine>, EngineError> {
    let config = TailwindConfig::load(fs, path)?;
    self.get_or_build(&config)
  }
}

#[cfg(test)]
mod tests {
  use twstyled_filesystem::InMemoryFileSystem;

  use super::*;

  #[test]
  fn test_same_content_reuses_engine() {
    let mut cache = EngineCache::default();
    let first = cache.get_or_build(&TailwindConfig::default()).unwrap();
    let second = cache.get_or_build(&TailwindConfig::default()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
  }

  #[test]
  fn test_changed_content_rebuilds_engine() {
    let mut cache = EngineCache::default();
    let first = cache.get_or_build(&TailwindConfig::default()).unwrap();

    let changed = TailwindConfig {
      separator: "_".into(),
      ..Default::default()
    };
    assert!(cache.invalidate_if_changed(&changed).unwrap());
    assert!(!cache.invalidate_if_changed(&changed).unwrap());

    let second = cache.get_or_build(&changed).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.separator(), "_");
  }

  #[test]
  fn test_load_reads_through_file_system() {
    let fs = InMemoryFileSystem::default();
    fs.write(Path::new("/tw.json"), br#"{ "prefix": "tw-" }"#)
      .unwrap();

    let mut cache = EngineCache::default();
    let engine = cache.load(&fs, Path::new("/tw.json")).unwrap();
    assert_eq!(engine.config().prefix, "tw-");

    fs.write(Path::new("/tw.json"), br#"{ "prefix": "tw-" }"#)
      .unwrap();
    let reloaded = cache.load(&fs, Path::new("/tw.json")).unwrap();
    assert!(Arc::ptr_eq(&engine, &reloaded));
  }
}
