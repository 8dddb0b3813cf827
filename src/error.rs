//! Error type shared by every processor and path helper.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type UrlResult<T> = Result<T, UrlError>;

/// Errors raised while building processors or transforming asset references.
#[derive(Debug, Error)]
pub enum UrlError {
  /// A processor was configured without an option its mode depends on.
  #[error("{option} is required for the {processor} processor")]
  MissingRequiredOption {
    /// Processor that rejected the options.
    processor: &'static str,
    /// Name of the missing option as it appears in the options schema.
    option: &'static str,
  },

  /// The `url` discriminator names no known processor.
  #[error("unknown processor type: {0}")]
  UnknownProcessorType(String),

  /// No base path candidate contains the referenced file.
  #[error("cannot resolve path: {reference}")]
  AssetNotFound {
    /// Reference exactly as written in the stylesheet.
    reference: String,
  },

  /// Reading or writing an asset failed after it was located.
  #[error("failed to access {}: {source}", path.display())]
  Io {
    /// Path involved in the failing operation.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },

  /// A match pattern could not be compiled.
  #[error("invalid pattern {pattern:?}: {source}")]
  InvalidPattern {
    /// Pattern as supplied by the caller.
    pattern: String,
    /// Compilation error reported by the regex engine.
    source: regex::Error,
  },
}

impl UrlError {
  pub(crate) fn missing(processor: &'static str, option: &'static str) -> Self {
    Self::MissingRequiredOption { processor, option }
  }

  pub(crate) fn not_found(reference: impl Into<String>) -> Self {
    Self::AssetNotFound {
      reference: reference.into(),
    }
  }

  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}
