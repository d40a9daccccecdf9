use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// In-memory file-system for testing
pub mod in_memory_file_system;

/// File-system implementation using std::fs
pub mod os_file_system;

pub use in_memory_file_system::InMemoryFileSystem;
pub use os_file_system::OsFileSystem;

/// FileSystem abstraction instance
///
/// This should be `OsFileSystem` for non-testing environments and `InMemoryFileSystem` for testing.
pub type FileSystemRef = Arc<dyn FileSystem + Send + Sync>;

/// Trait abstracting the file-system operations the stylesheet writers need.
///
/// Every operation is synchronous; the build pipeline processes one file at a time.
#[mockall::automock]
pub trait FileSystem: std::fmt::Debug {
  fn cwd(&self) -> std::io::Result<PathBuf>;

  /// Create a directory and all of its missing parents
  fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

  fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

  fn write(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;

  fn is_file(&self, path: &Path) -> bool;
}

/// Lexically normalize `path` against `cwd`: resolve `.` and `..` without touching the disk.
pub fn normalize_path(cwd: &Path, path: &Path) -> PathBuf {
  use std::path::Component;

  let mut result: Vec<Component<'_>> = if path.is_absolute() {
    vec![]
  } else {
    cwd.components().collect()
  };

  for component in path.components() {
    match component {
      Component::Prefix(prefix) => {
        result = vec![Component::Prefix(prefix)];
      }
      Component::RootDir => {
        result.push(Component::RootDir);
      }
      Component::CurDir => {}
      Component::ParentDir => {
        if !matches!(result.last(), Some(Component::RootDir) | None) {
          result.pop();
        }
      }
      Component::Normal(part) => {
        result.push(Component::Normal(part));
      }
    }
  }

  PathBuf::from_iter(result)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_normalize_path_is_lexical() {
    assert_eq!(
      normalize_path(Path::new("/app"), Path::new("/a/./b/../c")),
      PathBuf::from("/a/c")
    );
    assert_eq!(
      normalize_path(Path::new("/app"), Path::new("./src/./a/../b.tsx")),
      PathBuf::from("/app/src/b.tsx")
    );
    assert_eq!(
      normalize_path(Path::new("/app"), Path::new("../../../x.css")),
      PathBuf::from("/x.css")
    );
  }
}
