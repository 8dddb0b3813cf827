//! In-memory configuration consumed by the processor dispatcher.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

/// Digest length used when `hashOptions.length` is not supplied.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Filename template used by the copy processor when none is configured.
pub const DEFAULT_FILE_NAME_FORMAT: &str = "[name].[contenthash].[ext]";

/// Number of references a processor works on at once when `concurrency` is not supplied.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Argument handed to a function-valued `url` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
  /// Reference exactly as written inside `url(...)`.
  pub url: String,
}

/// User supplied transform used in place of a named processor.
pub type AssetFn = Arc<dyn Fn(&Asset) -> String + Send + Sync>;

/// Discriminator selecting which processor handles a batch.
#[derive(Clone)]
pub enum UrlMode {
  /// One of `copy`, `custom`, `inline` or `rebase`. Validated when the processor is built.
  Named(String),
  /// Escape hatch mapping every reference through a closure.
  Function(AssetFn),
}

impl fmt::Debug for UrlMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
      Self::Function(_) => f.write_str("Function(..)"),
    }
  }
}

impl<'de> Deserialize<'de> for UrlMode {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    String::deserialize(deserializer).map(Self::Named)
  }
}

impl From<&str> for UrlMode {
  fn from(value: &str) -> Self {
    Self::Named(value.to_string())
  }
}

/// One or more directories searched, in order, for referenced assets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BasePath {
  /// A single directory.
  Single(PathBuf),
  /// An ordered list of directories; the first one containing the asset wins.
  Multiple(Vec<PathBuf>),
}

impl BasePath {
  /// Candidate directories in declaration order.
  pub fn candidates(&self) -> &[PathBuf] {
    match self {
      Self::Single(path) => std::slice::from_ref(path),
      Self::Multiple(paths) => paths,
    }
  }

  /// Returns `true` when no candidate directory is configured.
  pub fn is_empty(&self) -> bool {
    self.candidates().is_empty()
  }
}

impl From<&str> for BasePath {
  fn from(value: &str) -> Self {
    Self::Single(PathBuf::from(value))
  }
}

impl From<&Path> for BasePath {
  fn from(value: &Path) -> Self {
    Self::Single(value.to_path_buf())
  }
}

impl From<PathBuf> for BasePath {
  fn from(value: PathBuf) -> Self {
    Self::Single(value)
  }
}

impl<P: Into<PathBuf>> FromIterator<P> for BasePath {
  fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
    Self::Multiple(iter.into_iter().map(Into::into).collect())
  }
}

/// Digest settings for the copy processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HashOptions {
  /// Number of hex characters kept from the digest.
  pub length: usize,
}

impl Default for HashOptions {
  fn default() -> Self {
    Self {
      length: DEFAULT_HASH_LENGTH,
    }
  }
}

/// Options record for a single processing pass.
///
/// Only the fields relevant to the selected processor are read; processors validate their
/// mandatory fields when they are built, before any filesystem access happens.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorOptions {
  /// Processor discriminator or custom transform.
  pub url: UrlMode,
  /// Directories searched for referenced assets.
  #[serde(default)]
  pub base_path: Option<BasePath>,
  /// Destination directory for copied assets, or the anchor for rebased paths.
  #[serde(default)]
  pub assets_path: Option<PathBuf>,
  /// Whether copied filenames receive a content hash.
  #[serde(default)]
  pub use_hash: bool,
  /// Digest settings applied when `use_hash` is enabled.
  #[serde(default)]
  pub hash_options: HashOptions,
  /// Extensions a reference must end with to be copied.
  #[serde(default)]
  pub filter_extensions: Option<Vec<String>>,
  /// Template with `[name]`, `[contenthash]` and `[ext]` placeholders.
  #[serde(default)]
  pub file_name_format: Option<String>,
  /// Stylesheet the references were authored against (rebase).
  #[serde(default)]
  pub from: Option<PathBuf>,
  /// Directory rebased references are re-rooted under (rebase).
  #[serde(default)]
  pub to: Option<PathBuf>,
  /// Prefix prepended by the custom processor.
  #[serde(default)]
  pub custom_prefix: Option<String>,
  /// Upper bound on references processed at once within a batch.
  #[serde(default)]
  pub concurrency: Option<usize>,
}

impl ProcessorOptions {
  /// Options selecting a processor by name, with every other field left unset.
  pub fn named(name: &str) -> Self {
    Self::with_mode(UrlMode::from(name))
  }

  /// Options wrapping a closure as a pseudo-processor.
  pub fn function<F>(transform: F) -> Self
  where
    F: Fn(&Asset) -> String + Send + Sync + 'static,
  {
    Self::with_mode(UrlMode::Function(Arc::new(transform)))
  }

  fn with_mode(url: UrlMode) -> Self {
    Self {
      url,
      base_path: None,
      assets_path: None,
      use_hash: false,
      hash_options: HashOptions::default(),
      filter_extensions: None,
      file_name_format: None,
      from: None,
      to: None,
      custom_prefix: None,
      concurrency: None,
    }
  }

  /// Effective concurrency bound, never below one.
  pub fn concurrency_limit(&self) -> usize {
    self.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1)
  }

  /// Configured base paths, treating an empty list as absent.
  pub(crate) fn base_path_set(&self) -> Option<&BasePath> {
    self.base_path.as_ref().filter(|base| !base.is_empty())
  }
}
