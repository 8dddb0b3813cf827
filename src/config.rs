//! Loading processor option sets from JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::options::ProcessorOptions;

/// File name looked up next to a stylesheet when no options file is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "asset-url.config.json";

/// Parse either a single options object or a list of them.
///
/// Relative paths inside the options are left as written and resolve against the working
/// directory of the process, not the location of the file.
pub fn parse_option_sets(content: &str) -> Result<Vec<ProcessorOptions>> {
  let value: Value = serde_json::from_str(content).context("options are not valid JSON")?;
  let option_sets = match value {
    Value::Array(items) => items
      .into_iter()
      .enumerate()
      .map(|(index, item)| {
        serde_json::from_value(item).with_context(|| format!("invalid options at index {index}"))
      })
      .collect::<Result<Vec<ProcessorOptions>>>()?,
    Value::Object(_) => vec![serde_json::from_value(value).context("invalid options")?],
    _ => bail!("options must be an object or a list of objects"),
  };

  if option_sets.is_empty() {
    bail!("options list is empty");
  }
  Ok(option_sets)
}

/// Read option sets from a JSON file.
pub fn load_option_sets(path: &Path) -> Result<Vec<ProcessorOptions>> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("failed to read options from {}", path.display()))?;
  parse_option_sets(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Locate the default options file inside `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
  let candidate = dir.join(DEFAULT_CONFIG_FILE);
  candidate.is_file().then_some(candidate)
}
