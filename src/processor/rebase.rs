//! Rewrite references so they keep pointing at the same asset from a new location.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::asset_paths::{
  dirname, rebase_under, relative_path, resolve_against, resolve_base_path, split_reference,
  to_forward_slashes,
};
use crate::error::{UrlError, UrlResult};
use crate::options::{BasePath, ProcessorOptions};
use crate::processor::{UrlProcessor, process_ordered};

const NAME: &str = "rebase";

#[derive(Debug, Clone)]
enum RebaseMode {
  /// Pure path arithmetic between the source stylesheet and the destination root.
  Roots { from_dir: PathBuf, to: PathBuf },
  /// Locate each asset on disk and point at it from the assets directory.
  Assets {
    base_path: BasePath,
    assets_path: PathBuf,
  },
}

/// Rewrites references relative to a new root. Output always uses forward slashes.
#[derive(Debug, Clone)]
pub struct RebaseProcessor {
  mode: RebaseMode,
  concurrency: usize,
}

impl RebaseProcessor {
  /// Pick the `from`/`to` mode when both are set, otherwise require `basePath` and `assetsPath`.
  pub fn new(options: &ProcessorOptions) -> UrlResult<Self> {
    let mode = match (&options.from, &options.to) {
      (Some(from), Some(to)) => RebaseMode::Roots {
        from_dir: dirname(from),
        to: to.clone(),
      },
      _ => {
        let base_path = options
          .base_path_set()
          .cloned()
          .ok_or_else(|| UrlError::missing(NAME, "from/to or basePath"))?;
        let assets_path = options
          .assets_path
          .clone()
          .filter(|path| !path.as_os_str().is_empty())
          .ok_or_else(|| UrlError::missing(NAME, "assetsPath"))?;
        RebaseMode::Assets {
          base_path,
          assets_path,
        }
      }
    };

    Ok(Self {
      mode,
      concurrency: options.concurrency_limit(),
    })
  }

  async fn rebase_path(&self, reference: &str) -> UrlResult<String> {
    let (file, suffix) = split_reference(reference);
    let rebased = match &self.mode {
      RebaseMode::Roots { from_dir, to } => {
        let asset = resolve_against(from_dir, file);
        rebase_under(to, &relative_path(from_dir, &asset))
      }
      RebaseMode::Assets {
        base_path,
        assets_path,
      } => {
        let resolved = resolve_base_path(base_path, reference).await?;
        relative_path(assets_path, &resolved.path)
      }
    };
    Ok(format!("{}{}", to_forward_slashes(&rebased), suffix))
  }
}

#[async_trait]
impl UrlProcessor for RebaseProcessor {
  async fn process(&self, references: &[String]) -> UrlResult<Vec<String>> {
    tracing::debug!(references = references.len(), "rebasing asset references");
    process_ordered(references, self.concurrency, |reference| self.rebase_path(reference)).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::path::Path;
  use tempfile::tempdir;

  fn batch(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
  }

  fn roots(from: &str, to: &str) -> RebaseProcessor {
    let mut options = ProcessorOptions::named("rebase");
    options.from = Some(from.into());
    options.to = Some(to.into());
    RebaseProcessor::new(&options).unwrap()
  }

  #[tokio::test]
  async fn rebases_from_source_directory_onto_destination() {
    let result = roots("src/a/b.css", "dist")
      .process(&batch(&["../img/x.png", "fonts/a.woff", "./c.gif"]))
      .await
      .unwrap();
    assert_eq!(result, batch(&["dist/img/x.png", "dist/fonts/a.woff", "dist/c.gif"]));
  }

  #[tokio::test]
  async fn roots_mode_never_touches_the_filesystem() {
    let result = roots("does/not/exist.css", "out")
      .process(&batch(&["missing.png?v=2"]))
      .await
      .unwrap();
    assert_eq!(result, batch(&["out/missing.png?v=2"]));
  }

  #[test]
  fn requires_roots_or_base_path() {
    let err = RebaseProcessor::new(&ProcessorOptions::named("rebase")).unwrap_err();
    assert!(matches!(
      err,
      UrlError::MissingRequiredOption {
        option: "from/to or basePath",
        ..
      }
    ));

    let mut only_from = ProcessorOptions::named("rebase");
    only_from.from = Some("src/a.css".into());
    only_from.base_path = Some(BasePath::from("src"));
    let err = RebaseProcessor::new(&only_from).unwrap_err();
    assert!(matches!(err, UrlError::MissingRequiredOption { option: "assetsPath", .. }));
  }

  #[tokio::test]
  async fn locates_assets_across_base_paths() {
    let dir = tempdir().unwrap();
    let dir_a = dir.path().join("dirA");
    let dir_b = dir.path().join("dirB");
    fs::create_dir_all(&dir_a).unwrap();
    fs::create_dir_all(dir_b.join("img")).unwrap();
    fs::write(dir_b.join("img/x.png"), b"x").unwrap();

    let mut options = ProcessorOptions::named("rebase");
    options.base_path = Some([dir_a, dir_b].into_iter().collect());
    options.assets_path = Some(dir.path().join("dist/css"));
    let processor = RebaseProcessor::new(&options).unwrap();

    let result = processor.process(&batch(&["img/x.png"])).await.unwrap();
    assert_eq!(result, batch(&["../../dirB/img/x.png"]));
    assert!(!result[0].contains('\\'));
  }

  #[tokio::test]
  async fn base_path_mode_fails_on_missing_asset() {
    let dir = tempdir().unwrap();
    let mut options = ProcessorOptions::named("rebase");
    options.base_path = Some(BasePath::from(dir.path()));
    options.assets_path = Some(Path::new("dist").to_path_buf());

    let err = RebaseProcessor::new(&options)
      .unwrap()
      .process(&batch(&["gone.png"]))
      .await
      .unwrap_err();
    assert!(matches!(err, UrlError::AssetNotFound { .. }));
  }
}
