use std::path::Path;

use path_slash::PathBufExt;
use pathdiff::diff_paths;

/// `to` relative to the directory `from`, with forward slashes. Falls back to `to` itself when
/// no relative path exists.
pub fn relative_path(from: &Path, to: &Path) -> String {
  diff_paths(to, from)
    .unwrap_or_else(|| to.to_path_buf())
    .to_slash_lossy()
    .to_string()
}

/// Relative path usable as a module specifier (`./a.css`, `../b.css`).
pub fn module_specifier(from: &Path, to: &Path) -> String {
  let relative = relative_path(from, to);
  if relative.starts_with("./") || relative.starts_with("../") {
    relative
  } else {
    format!("./{relative}")
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_module_specifier() {
    assert_eq!(
      module_specifier(Path::new("/app/src"), Path::new("/app/src/a.css")),
      "./a.css"
    );
    assert_eq!(
      module_specifier(Path::new("/app/src"), Path::new("/app/.cache/src/a.css")),
      "../.cache/src/a.css"
    );
    assert_eq!(
      module_specifier(Path::new("/app"), Path::new("/app/.linaria-cache/a.css")),
      "./.linaria-cache/a.css"
    );
  }
}
