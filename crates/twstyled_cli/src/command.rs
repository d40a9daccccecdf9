use std::path::PathBuf;

use clap::Parser;

/// Extract css/styled/tw styles from JavaScript and TypeScript sources
#[derive(Parser, Debug)]
#[command(name = "twstyled", version)]
pub struct TwstyledCommand {
  /// Source file or directory to transform
  pub target: PathBuf,
  /// Directory option paths resolve against [default: current directory]
  #[arg(long, env = "TWSTYLED_CWD")]
  pub cwd: Option<PathBuf>,
  /// JSON or JSON5 file with the pipeline options
  #[arg(long)]
  pub config: Option<PathBuf>,
  /// Append an inline source map to every stylesheet
  #[arg(long)]
  pub source_map: bool,
  /// Write rewritten sources here, mirroring their layout under the target
  #[arg(long)]
  pub out_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_command_is_well_formed() {
    TwstyledCommand::command().debug_assert();
  }

  #[test]
  fn test_parse_flags() {
    let command = TwstyledCommand::parse_from([
      "twstyled",
      "src",
      "--cwd",
      "/app",
      "--source-map",
      "--out-dir",
      "dist",
    ]);

    assert_eq!(command.target, PathBuf::from("src"));
    assert_eq!(command.cwd, Some(PathBuf::from("/app")));
    assert!(command.source_map);
    assert_eq!(command.out_dir, Some(PathBuf::from("dist")));
    assert_eq!(command.config, None);
  }
}
