use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::normalize_path;
use crate::FileSystem;

#[cfg(not(target_os = "windows"))]
fn root_dir() -> PathBuf {
  PathBuf::from("/")
}

#[cfg(target_os = "windows")]
fn root_dir() -> PathBuf {
  PathBuf::from("C:/")
}

/// In memory implementation of a file-system entry
#[derive(Debug)]
enum InMemoryFileSystemEntry {
  File { contents: Vec<u8> },
  Directory,
}

/// In memory implementation of the `FileSystem` trait, for testing purposes.
#[derive(Debug)]
pub struct InMemoryFileSystem {
  files: RwLock<HashMap<PathBuf, InMemoryFileSystemEntry>>,
  current_working_directory: RwLock<PathBuf>,
}

impl Default for InMemoryFileSystem {
  fn default() -> Self {
    Self {
      files: Default::default(),
      current_working_directory: RwLock::new(root_dir()),
    }
  }
}

impl InMemoryFileSystem {
  /// Change the current working directory. Used for resolving relative paths.
  pub fn set_current_working_directory(&self, cwd: &Path) {
    let cwd = self.resolve(cwd);
    *self.current_working_directory.write() = cwd;
  }

  /// Paths of every file currently stored, sorted.
  pub fn files(&self) -> Vec<PathBuf> {
    let files = self.files.read();
    let mut paths: Vec<PathBuf> = files
      .iter()
      .filter(|(_, entry)| matches!(entry, InMemoryFileSystemEntry::File { .. }))
      .map(|(path, _)| path.clone())
      .collect();
    paths.sort();
    paths
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    normalize_path(&self.current_working_directory.read(), path)
  }
}

impl FileSystem for InMemoryFileSystem {
  fn cwd(&self) -> io::Result<PathBuf> {
    Ok(self.current_working_directory.read().clone())
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    let mut files = self.files.write();
    let mut dir = Some(self.resolve(path));
    while let Some(path) = dir {
      if let Some(InMemoryFileSystemEntry::File { .. }) = files.get(&path) {
        return Err(io::Error::new(
          io::ErrorKind::AlreadyExists,
          "A file exists at a directory path",
        ));
      }
      dir = path.parent().map(Path::to_path_buf);
      files.insert(path, InMemoryFileSystemEntry::Directory);
    }
    Ok(())
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let path = self.resolve(path);
    let files = self.files.read();
    match files.get(&path) {
      None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
      Some(InMemoryFileSystemEntry::File { contents }) => String::from_utf8(contents.clone())
        .map_err(|_| io::Error::other("Unable to read file as string")),
      Some(InMemoryFileSystemEntry::Directory) => Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        "Path is a directory",
      )),
    }
  }

  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
    let path = self.resolve(path);
    let mut files = self.files.write();

    let mut dir = path.parent();
    while let Some(parent) = dir {
      files.insert(parent.to_path_buf(), InMemoryFileSystemEntry::Directory);
      dir = parent.parent();
    }

    files.insert(
      path,
      InMemoryFileSystemEntry::File {
        contents: contents.to_vec(),
      },
    );

    Ok(())
  }

  fn is_file(&self, path: &Path) -> bool {
    let path = self.resolve(path);
    matches!(
      self.files.read().get(&path),
      Some(InMemoryFileSystemEntry::File { .. })
    )
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_paths_are_resolved_lexically() {
    let fs = InMemoryFileSystem::default();
    fs.write(&root_dir().join("foo/./bar/../baz/a.css"), b"").unwrap();
    assert_eq!(fs.files(), vec![root_dir().join("foo/baz/a.css")]);
  }

  #[test]
  fn test_relative_paths_resolve_against_cwd() {
    let fs = InMemoryFileSystem::default();
    fs.set_current_working_directory(Path::new("/project"));
    fs.write(Path::new("./src/./a/../b.tsx"), b"").unwrap();

    assert!(fs.is_file(&root_dir().join("project/src/b.tsx")));
    assert_eq!(fs.cwd().unwrap(), root_dir().join("project"));
  }

  #[test]
  fn test_write_creates_parent_directories() {
    let fs = InMemoryFileSystem::default();
    fs.write(Path::new("/foo/bar/baz.css"), b"contents").unwrap();

    assert!(fs.create_dir_all(Path::new("/foo/bar")).is_ok());
    assert!(fs.is_file(Path::new("/foo/bar/baz.css")));
    assert_eq!(
      fs.read_to_string(Path::new("/foo/bar/baz.css")).unwrap(),
      "contents"
    );
    assert_eq!(fs.files(), vec![PathBuf::from("/foo/bar/baz.css")]);
  }

  #[test]
  fn test_read_file_not_found() {
    let fs = InMemoryFileSystem::default();
    let result = fs.read_to_string(Path::new("/foo/bar"));
    assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
  }

  #[test]
  fn test_create_dir_all_over_file_fails() {
    let fs = InMemoryFileSystem::default();
    fs.write(Path::new("/foo"), b"").unwrap();
    assert!(fs.create_dir_all(Path::new("/foo/bar")).is_err());
  }
}
