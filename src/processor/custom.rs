use async_trait::async_trait;

use crate::error::UrlResult;
use crate::options::ProcessorOptions;
use crate::processor::UrlProcessor;

/// Prepends `customPrefix` to every reference.
#[derive(Debug, Clone, Default)]
pub struct CustomProcessor {
  prefix: String,
}

impl CustomProcessor {
  /// Capture the configured prefix, defaulting to an empty string.
  pub fn new(options: &ProcessorOptions) -> Self {
    Self {
      prefix: options.custom_prefix.clone().unwrap_or_default(),
    }
  }
}

#[async_trait]
impl UrlProcessor for CustomProcessor {
  async fn process(&self, references: &[String]) -> UrlResult<Vec<String>> {
    Ok(
      references
        .iter()
        .map(|reference| format!("{}{}", self.prefix, reference))
        .collect(),
    )
  }
}
