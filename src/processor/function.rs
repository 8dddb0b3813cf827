use std::fmt;

use async_trait::async_trait;

use crate::error::UrlResult;
use crate::options::{Asset, AssetFn};
use crate::processor::UrlProcessor;

/// Maps each reference through a caller supplied closure, without touching the filesystem.
#[derive(Clone)]
pub struct FunctionProcessor {
  transform: AssetFn,
}

impl FunctionProcessor {
  /// Wrap `transform` as a processor.
  pub fn new(transform: AssetFn) -> Self {
    Self { transform }
  }
}

impl fmt::Debug for FunctionProcessor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FunctionProcessor").finish_non_exhaustive()
  }
}

#[async_trait]
impl UrlProcessor for FunctionProcessor {
  async fn process(&self, references: &[String]) -> UrlResult<Vec<String>> {
    Ok(
      references
        .iter()
        .map(|reference| {
          (self.transform)(&Asset {
            url: reference.clone(),
          })
        })
        .collect(),
    )
  }
}
