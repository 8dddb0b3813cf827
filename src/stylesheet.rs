//! Find `url(...)` references in stylesheet text and splice processor output back in.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::asset_paths::{
  PatternSet, relative_path, should_ignore_asset_reference, split_reference, to_forward_slashes,
};
use crate::error::UrlResult;
use crate::processor::{Processor, ProcessorSet};

fn url_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("invalid url() regex")
  })
}

/// A reference found inside a `url(...)` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlToken {
  /// Reference without surrounding quotes.
  pub value: String,
  /// Byte range of `value` inside the stylesheet.
  pub span: Range<usize>,
}

/// Settings for the host side of a rewrite.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
  /// Directory replacements are made relative to. Left as returned by the processor when unset.
  pub relative_to: Option<PathBuf>,
  /// Extra patterns naming references that are left untouched.
  pub ignore: PatternSet,
}

/// Result of running every pass over a stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
  /// Rewritten stylesheet text.
  pub css: String,
  /// One message per pass that failed and was skipped.
  pub warnings: Vec<String>,
}

/// Collect every processable `url(...)` reference in source order.
pub fn collect_url_tokens(css: &str, ignore: &PatternSet) -> Vec<UrlToken> {
  url_pattern()
    .captures_iter(css)
    .filter_map(|captures| captures.get(1))
    .filter(|found| {
      let value = found.as_str();
      !should_ignore_asset_reference(value) && !ignore.is_match(value)
    })
    .map(|found| UrlToken {
      value: found.as_str().to_string(),
      span: found.range(),
    })
    .collect()
}

/// Run one processor over the references in `css` and return the rewritten text.
pub async fn rewrite_pass(
  css: &str,
  processor: &Processor,
  options: &RewriteOptions,
) -> UrlResult<String> {
  let tokens = collect_url_tokens(css, &options.ignore);
  if tokens.is_empty() {
    return Ok(css.to_string());
  }

  let references: Vec<String> = tokens.iter().map(|token| token.value.clone()).collect();
  let outputs = processor.process(&references).await?;
  let retained: Vec<&UrlToken> = tokens
    .iter()
    .filter(|token| processor.retains(&token.value))
    .collect();

  if retained.len() != outputs.len() {
    tracing::warn!(
      retained = retained.len(),
      outputs = outputs.len(),
      "processor output does not line up with its input; pairing by position"
    );
  }

  let mut result = String::with_capacity(css.len());
  let mut last = 0;
  for (token, output) in retained.into_iter().zip(outputs) {
    result.push_str(&css[last..token.span.start]);
    result.push_str(&display_path(&output, options.relative_to.as_deref()));
    last = token.span.end;
  }
  result.push_str(&css[last..]);
  Ok(result)
}

/// Apply every processor in turn, skipping passes that fail.
///
/// A failed pass is logged, recorded in [`RewriteOutcome::warnings`] and leaves the text as
/// the previous pass produced it.
pub async fn rewrite_stylesheet(
  css: &str,
  processors: &ProcessorSet,
  options: &RewriteOptions,
) -> RewriteOutcome {
  let mut outcome = RewriteOutcome {
    css: css.to_string(),
    warnings: Vec::new(),
  };

  for (index, processor) in processors.processors().iter().enumerate() {
    match rewrite_pass(&outcome.css, processor, options).await {
      Ok(css) => outcome.css = css,
      Err(err) => {
        tracing::warn!(pass = index, error = %err, "skipping asset pass");
        outcome
          .warnings
          .push(format!("Error processing files: {err}"));
      }
    }
  }

  outcome
}

fn display_path(output: &str, relative_to: Option<&Path>) -> String {
  let Some(dir) = relative_to else {
    return output.to_string();
  };
  if should_ignore_asset_reference(output) {
    return output.to_string();
  }

  let (file, suffix) = split_reference(output);
  let relative = relative_path(dir, Path::new(file));
  format!("{}{}", to_forward_slashes(&relative), suffix)
}
