//! Command-line wrapper that rewrites one stylesheet file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::asset_paths::{PatternSet, dirname};
use crate::config::{DEFAULT_CONFIG_FILE, discover, load_option_sets};
use crate::processor::ProcessorSet;
use crate::stylesheet::{RewriteOptions, rewrite_stylesheet};

/// Rewrite url(...) references in a stylesheet by copying, inlining or rebasing assets.
#[derive(Debug, Parser)]
#[command(name = "css-asset-url", version, about)]
pub struct Cli {
  /// Stylesheet to rewrite.
  pub input: PathBuf,

  /// JSON file holding one options object or a list of them.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Where to write the rewritten stylesheet. Defaults to stdout.
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Directory rewritten references are made relative to.
  #[arg(long, value_name = "DIR")]
  pub relative_to: Option<PathBuf>,

  /// Regex naming references to leave untouched. May be repeated.
  #[arg(long = "ignore", value_name = "REGEX")]
  pub ignore: Vec<String>,

  /// Log level used when RUST_LOG is not set.
  #[arg(long, default_value = "info")]
  pub log_level: String,
}

/// Parse arguments from the process environment.
pub fn parse_cli() -> Cli {
  Cli::parse()
}

/// Rewrite the input stylesheet according to the parsed arguments.
pub async fn run(cli: Cli) -> Result<()> {
  let config_path = match &cli.config {
    Some(path) => path.clone(),
    None => discover(&dirname(&cli.input)).ok_or_else(|| {
      anyhow!(
        "no {} next to {}; pass --config",
        DEFAULT_CONFIG_FILE,
        cli.input.display()
      )
    })?,
  };

  let option_sets = load_option_sets(&config_path)?;
  let processors = ProcessorSet::new(&option_sets)
    .with_context(|| format!("invalid options in {}", config_path.display()))?;

  let css = fs::read_to_string(&cli.input)
    .with_context(|| format!("failed to read {}", cli.input.display()))?;
  let rewrite = RewriteOptions {
    relative_to: cli.relative_to.clone(),
    ignore: PatternSet::new(&cli.ignore)?,
  };

  let outcome = rewrite_stylesheet(&css, &processors, &rewrite).await;
  for warning in &outcome.warnings {
    eprintln!("warning: {warning}");
  }

  match &cli.output {
    Some(path) => {
      if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {}", parent.display()))?;
      }
      fs::write(path, &outcome.css)
        .with_context(|| format!("failed to write {}", path.display()))?;
      tracing::info!(output = %path.display(), "wrote stylesheet");
    }
    None => print!("{}", outcome.css),
  }

  Ok(())
}
