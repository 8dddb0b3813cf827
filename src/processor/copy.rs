//! Copy referenced assets into the assets directory under templated names.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use same_file::is_same_file;
use tokio::{fs, task};

use crate::asset_paths::{match_extensions, read_asset, split_reference, to_forward_slashes};
use crate::error::{UrlError, UrlResult};
use crate::hash::generate_hash;
use crate::options::{BasePath, DEFAULT_FILE_NAME_FORMAT, ProcessorOptions};
use crate::processor::{UrlProcessor, process_ordered};

const NAME: &str = "copy";

/// Copies each retained asset to `<assetsPath>/<formatted name>` and returns that path.
#[derive(Debug, Clone)]
pub struct CopyProcessor {
  base_path: BasePath,
  assets_path: PathBuf,
  hash_length: Option<usize>,
  file_name_format: String,
  filter_extensions: Option<Vec<String>>,
  concurrency: usize,
}

impl CopyProcessor {
  /// Capture the copy settings, requiring both `assetsPath` and `basePath`.
  pub fn new(options: &ProcessorOptions) -> UrlResult<Self> {
    let assets_path = options
      .assets_path
      .clone()
      .filter(|path| !path.as_os_str().is_empty())
      .ok_or_else(|| UrlError::missing(NAME, "assetsPath"))?;
    let base_path = options
      .base_path_set()
      .cloned()
      .ok_or_else(|| UrlError::missing(NAME, "basePath"))?;

    Ok(Self {
      base_path,
      assets_path,
      hash_length: options.use_hash.then_some(options.hash_options.length),
      file_name_format: options
        .file_name_format
        .clone()
        .unwrap_or_else(|| DEFAULT_FILE_NAME_FORMAT.to_string()),
      filter_extensions: options.filter_extensions.clone(),
      concurrency: options.concurrency_limit(),
    })
  }

  async fn copy_file(&self, reference: &str) -> UrlResult<String> {
    let (file, suffix) = split_reference(reference);
    let (source, content) = read_asset(&self.base_path, reference).await?;

    let hash = self
      .hash_length
      .map(|length| generate_hash(&content, length))
      .unwrap_or_default();
    let file_name = format_file_name(&self.file_name_format, Path::new(file), &hash);
    let destination = self.assets_path.join(contained(&file_name));

    if let Some(parent) = destination.parent() {
      fs::create_dir_all(parent)
        .await
        .map_err(|source| UrlError::io(parent, source))?;
    }

    let target = destination.clone();
    let in_place = task::spawn_blocking(move || is_same_file(source, target).unwrap_or(false))
      .await
      .unwrap_or(false);
    if in_place {
      tracing::trace!(reference, "asset already in place");
    } else {
      fs::write(&destination, &content)
        .await
        .map_err(|source| UrlError::io(&destination, source))?;
      tracing::trace!(reference, destination = %destination.display(), "copied asset");
    }

    Ok(format!("{}{}", to_forward_slashes(&destination), suffix))
  }
}

#[async_trait]
impl UrlProcessor for CopyProcessor {
  async fn process(&self, references: &[String]) -> UrlResult<Vec<String>> {
    tracing::debug!(
      references = references.len(),
      assets_path = %self.assets_path.display(),
      "copying assets"
    );
    let retained = references.iter().filter(|reference| self.retains(reference));
    process_ordered(retained, self.concurrency, |reference| self.copy_file(reference)).await
  }

  fn retains(&self, reference: &str) -> bool {
    let (file, _) = split_reference(reference);
    self
      .filter_extensions
      .as_ref()
      .is_none_or(|extensions| match_extensions(file, extensions))
  }
}

/// Expand `[name]`, `[contenthash]` and `[ext]` in `template` for the file at `path`.
///
/// When the hash or the extension is empty, the separator in front of its placeholder is
/// dropped along with it. With nothing in front, a following `.` is dropped unless it
/// introduces `[ext]`.
pub fn format_file_name(template: &str, path: &Path, hash: &str) -> String {
  let name = path
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default();
  let ext = path
    .extension()
    .map(|ext| ext.to_string_lossy().into_owned())
    .unwrap_or_default();

  let mut template = template.to_string();
  if hash.is_empty() {
    template = drop_placeholder(&template, "[contenthash]");
  }
  if ext.is_empty() {
    template = drop_placeholder(&template, "[ext]");
  }

  template
    .replace("[name]", &name)
    .replace("[contenthash]", hash)
    .replace("[ext]", &ext)
}

const SEPARATORS: &[char] = &['.', '-', '_', '?'];

fn drop_placeholder(template: &str, placeholder: &str) -> String {
  let mut result = String::with_capacity(template.len());
  let mut rest = template;
  while let Some(index) = rest.find(placeholder) {
    let (head, tail) = rest.split_at(index);
    let after = &tail[placeholder.len()..];
    if head.ends_with(SEPARATORS) {
      result.push_str(&head[..head.len() - 1]);
      rest = after;
    } else if let Some(next) = after
      .strip_prefix('.')
      .filter(|next| !next.starts_with("[ext]"))
    {
      result.push_str(head);
      rest = next;
    } else {
      result.push_str(head);
      rest = after;
    }
  }
  result.push_str(rest);
  result
}

/// Keep only the plain segments of a formatted name so it cannot leave the assets directory.
fn contained(file_name: &str) -> PathBuf {
  Path::new(file_name)
    .components()
    .filter(|component| matches!(component, Component::Normal(_)))
    .collect()
}
