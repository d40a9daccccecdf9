use std::path::Path;
use std::path::PathBuf;

use crate::FileSystem;

/// The real file-system. Relative paths resolve against the process working directory unless
/// another one is pinned with [`OsFileSystem::with_cwd`].
#[derive(Default, Debug)]
pub struct OsFileSystem {
  cwd: Option<PathBuf>,
}

impl OsFileSystem {
  pub fn with_cwd(cwd: PathBuf) -> Self {
    OsFileSystem { cwd: Some(cwd) }
  }
}

impl FileSystem for OsFileSystem {
  fn cwd(&self) -> std::io::Result<PathBuf> {
    match &self.cwd {
      Some(cwd) => Ok(cwd.clone()),
      None => std::env::current_dir(),
    }
  }

  fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
  }

  fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
  }

  fn write(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
  }

  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }
}
