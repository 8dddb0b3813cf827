//! Processors turning batches of `url(...)` references into replacement strings.
//!
//! Every processor implements [`UrlProcessor`]; the [`Processor`] dispatcher picks one from the
//! `url` discriminator of a [`ProcessorOptions`] record.

mod copy;
mod custom;
mod function;
mod inline;
mod rebase;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::{UrlError, UrlResult};
use crate::options::{ProcessorOptions, UrlMode};

pub use copy::{CopyProcessor, format_file_name};
pub use custom::CustomProcessor;
pub use function::FunctionProcessor;
pub use inline::{InlineProcessor, mime_type};
pub use rebase::RebaseProcessor;

/// Contract shared by every processor.
///
/// `process` returns one replacement per retained reference, in input order. A processor that
/// filters references must report the same decision through [`UrlProcessor::retains`] so
/// callers can pair outputs with inputs.
#[async_trait]
pub trait UrlProcessor: Send + Sync {
  /// Transform a batch of references. The first failing reference fails the whole batch.
  async fn process(&self, references: &[String]) -> UrlResult<Vec<String>>;

  /// Whether `reference` produces an entry in the output of [`UrlProcessor::process`].
  fn retains(&self, _reference: &str) -> bool {
    true
  }
}

/// Built-in processors selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorKind {
  /// Copy assets into the assets directory.
  Copy,
  /// Prefix references with a fixed string.
  Custom,
  /// Embed assets as base64 data URIs.
  Inline,
  /// Rewrite references relative to a new location.
  Rebase,
}

impl ProcessorKind {
  /// Name used for this processor in options.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Copy => "copy",
      Self::Custom => "custom",
      Self::Inline => "inline",
      Self::Rebase => "rebase",
    }
  }

  fn build(self, options: &ProcessorOptions) -> UrlResult<Box<dyn UrlProcessor>> {
    let processor: Box<dyn UrlProcessor> = match self {
      Self::Copy => Box::new(CopyProcessor::new(options)?),
      Self::Custom => Box::new(CustomProcessor::new(options)),
      Self::Inline => Box::new(InlineProcessor::new(options)?),
      Self::Rebase => Box::new(RebaseProcessor::new(options)?),
    };
    Ok(processor)
  }
}

impl FromStr for ProcessorKind {
  type Err = UrlError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "copy" => Ok(Self::Copy),
      "custom" => Ok(Self::Custom),
      "inline" => Ok(Self::Inline),
      "rebase" => Ok(Self::Rebase),
      other => Err(UrlError::UnknownProcessorType(other.to_string())),
    }
  }
}

impl fmt::Display for ProcessorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Dispatcher owning the processor selected for one set of options.
pub struct Processor {
  inner: Box<dyn UrlProcessor>,
}

impl Processor {
  /// Select and build the processor named by `options.url`.
  ///
  /// Unknown names and missing mandatory options are reported here, before any I/O.
  pub fn new(options: &ProcessorOptions) -> UrlResult<Self> {
    let inner: Box<dyn UrlProcessor> = match &options.url {
      UrlMode::Function(transform) => {
        tracing::debug!("using function url processor");
        Box::new(FunctionProcessor::new(transform.clone()))
      }
      UrlMode::Named(name) => {
        let kind: ProcessorKind = name.parse()?;
        tracing::debug!(processor = %kind, "using named url processor");
        kind.build(options)?
      }
    };
    Ok(Self { inner })
  }

  /// Wrap a caller supplied processor.
  pub fn from_processor<P: UrlProcessor + 'static>(processor: P) -> Self {
    Self {
      inner: Box::new(processor),
    }
  }

  /// Forward a batch to the selected processor.
  pub async fn process(&self, references: &[String]) -> UrlResult<Vec<String>> {
    self.inner.process(references).await
  }

  /// Whether `reference` yields an output from [`Processor::process`].
  pub fn retains(&self, reference: &str) -> bool {
    self.inner.retains(reference)
  }
}

impl fmt::Debug for Processor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Processor").finish_non_exhaustive()
  }
}

/// Several processors, each run as an independent pass.
#[derive(Debug, Default)]
pub struct ProcessorSet {
  processors: Vec<Processor>,
}

impl ProcessorSet {
  /// Build one processor per options record, failing on the first invalid record.
  pub fn new(option_sets: &[ProcessorOptions]) -> UrlResult<Self> {
    let processors = option_sets
      .iter()
      .map(Processor::new)
      .collect::<UrlResult<Vec<_>>>()?;
    Ok(Self { processors })
  }

  /// Processors in configuration order.
  pub fn processors(&self) -> &[Processor] {
    &self.processors
  }

  /// Run every processor over the same batch, returning one result list per processor.
  pub async fn process(&self, references: &[String]) -> UrlResult<Vec<Vec<String>>> {
    let mut results = Vec::with_capacity(self.processors.len());
    for processor in &self.processors {
      results.push(processor.process(references).await?);
    }
    Ok(results)
  }
}

/// Run `transform` over `references` with at most `limit` in flight, keeping input order.
pub(crate) async fn process_ordered<'a, I, F, Fut>(
  references: I,
  limit: usize,
  mut transform: F,
) -> UrlResult<Vec<String>>
where
  I: IntoIterator<Item = &'a String>,
  F: FnMut(&'a String) -> Fut,
  Fut: Future<Output = UrlResult<String>> + Send + 'a,
{
  let pending: Vec<BoxFuture<'a, UrlResult<String>>> = references
    .into_iter()
    .map(|reference| Box::pin(transform(reference)) as BoxFuture<'a, _>)
    .collect();

  stream::iter(pending)
    .buffered(limit.max(1))
    .try_collect()
    .await
}
