mod build;
mod command;

use clap::Parser;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use command::TwstyledCommand;

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_span_events(FmtSpan::CLOSE)
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let command = TwstyledCommand::parse();
  let summary = build::run(&command)?;

  if let Some(code) = &summary.stdout {
    println!("{code}");
  }

  if !summary.failed.is_empty() {
    anyhow::bail!("{} file(s) failed to transform", summary.failed.len());
  }
  Ok(())
}
