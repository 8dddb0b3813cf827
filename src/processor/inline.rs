//! Embed referenced assets directly into the stylesheet as base64 data URIs.

use std::path::Path;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};

use crate::asset_paths::{read_asset, split_reference};
use crate::error::{UrlError, UrlResult};
use crate::options::{BasePath, ProcessorOptions};
use crate::processor::{UrlProcessor, process_ordered};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Replaces every reference with `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone)]
pub struct InlineProcessor {
  base_path: BasePath,
  concurrency: usize,
}

impl InlineProcessor {
  /// Capture the base path set assets are read from.
  pub fn new(options: &ProcessorOptions) -> UrlResult<Self> {
    let base_path = options
      .base_path_set()
      .cloned()
      .ok_or_else(|| UrlError::missing("inline", "basePath"))?;
    Ok(Self {
      base_path,
      concurrency: options.concurrency_limit(),
    })
  }

  async fn inline_file(&self, reference: &str) -> UrlResult<String> {
    let (file, _) = split_reference(reference);
    let (_, content) = read_asset(&self.base_path, reference).await?;
    let payload = general_purpose::STANDARD.encode(content);
    Ok(format!("data:{};base64,{}", mime_type(Path::new(file)), payload))
  }
}

#[async_trait]
impl UrlProcessor for InlineProcessor {
  async fn process(&self, references: &[String]) -> UrlResult<Vec<String>> {
    tracing::debug!(references = references.len(), "inlining assets");
    process_ordered(references, self.concurrency, |reference| self.inline_file(reference)).await
  }
}

/// MIME type inferred from the extension of `path`, ignoring case.
pub fn mime_type(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    .unwrap_or_default();

  match ext.as_str() {
    "jpg" | "jpeg" => "image/jpeg",
    "png" => "image/png",
    "gif" => "image/gif",
    "svg" => "image/svg+xml",
    "webp" => "image/webp",
    "woff" => "font/woff",
    "woff2" => "font/woff2",
    "eot" => "application/vnd.ms-fontobject",
    "ttf" => "font/ttf",
    "otf" => "font/otf",
    _ => FALLBACK_MIME,
  }
}
