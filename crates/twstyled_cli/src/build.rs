use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use twstyled_core::{BuildSession, PluginOptions};
use twstyled_filesystem::{normalize_path, FileSystem, OsFileSystem};

use crate::command::TwstyledCommand;

const EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

#[derive(Debug, Default)]
pub struct BuildSummary {
  pub transformed: Vec<PathBuf>,
  pub failed: Vec<PathBuf>,
  /// Rewritten source of a single-file target built without an output directory
  pub stdout: Option<String>,
}

/// Transform the command's target with one build session.
pub fn run(command: &TwstyledCommand) -> anyhow::Result<BuildSummary> {
  let cwd = match &command.cwd {
    Some(cwd) => normalize_path(&std::env::current_dir()?, cwd),
    None => std::env::current_dir()?,
  };
  let fs = Arc::new(OsFileSystem::with_cwd(cwd.clone()));

  let mut options = match &command.config {
    Some(config) => PluginOptions::load(&*fs, &normalize_path(&cwd, config))?,
    None => PluginOptions::default(),
  };
  options.source_map |= command.source_map;

  let target = normalize_path(&cwd, &command.target);
  let out_dir = command.out_dir.as_ref().map(|dir| normalize_path(&cwd, dir));
  let mut session = BuildSession::new(fs.clone(), options)?;

  let start = Instant::now();
  let mut summary = BuildSummary::default();

  if fs.is_file(&target) {
    let root = target.parent().unwrap_or(&cwd).to_path_buf();
    let code = build_file(&mut session, &*fs, &target, &root, out_dir.as_deref())?;
    if out_dir.is_none() {
      summary.stdout = Some(code);
    }
    summary.transformed.push(target);
    return Ok(summary);
  }

  for source in sources(&target)? {
    match build_file(&mut session, &*fs, &source, &target, out_dir.as_deref()) {
      Ok(_) => summary.transformed.push(source),
      Err(err) => {
        tracing::error!("Error: {}: {:#}", source.display(), err);
        summary.failed.push(source);
      }
    }
  }

  tracing::info!(
    "processed {} files errors {} in {:?}",
    summary.transformed.len() + summary.failed.len(),
    summary.failed.len(),
    start.elapsed()
  );
  Ok(summary)
}

/// Script files under `root` in a stable order, skipping hidden entries and `node_modules`.
fn sources(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
  let mut sources = Vec::new();
  for entry in jwalk::WalkDir::new(root).sort(true) {
    let entry = entry?;
    let path = entry.path();
    if !entry.file_type().is_file()
      || path
        .components()
        .any(|component| component.as_os_str() == "node_modules")
    {
      continue;
    }

    let extension = path
      .extension()
      .and_then(|extension| extension.to_str())
      .unwrap_or_default();
    if EXTENSIONS.contains(&extension) {
      sources.push(path);
    }
  }
  Ok(sources)
}

fn build_file(
  session: &mut BuildSession,
  fs: &dyn FileSystem,
  source: &Path,
  root: &Path,
  out_dir: Option<&Path>,
) -> anyhow::Result<String> {
  let code = fs.read_to_string(source)?;
  let output = session.transform(source, &code)?;

  if let Some(out_dir) = out_dir {
    let relative = source.strip_prefix(root).unwrap_or(source);
    let destination = out_dir.join(relative);
    if let Some(directory) = destination.parent() {
      fs.create_dir_all(directory)?;
    }
    fs.write(&destination, output.code.as_bytes())?;
  }

  tracing::debug!(
    source = %source.display(),
    occurrences = output.occurrences,
    "Built"
  );
  Ok(output.code)
}
