use std::path::{Path, PathBuf};

use tokio::fs;

use crate::asset_paths::paths::{resolve_against, split_reference};
use crate::error::{UrlError, UrlResult};
use crate::options::BasePath;

/// Location of a reference once a base path candidate has been found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Candidate directory that contained the asset, as configured.
    pub base: PathBuf,
    /// Absolute, normalised path of the asset on disk.
    pub path: PathBuf,
}

/// Probe every base path candidate in order and return the first one containing `reference`.
///
/// Any `?query` or `#fragment` suffix on the reference is ignored for the lookup. A failed
/// existence probe counts as "not here" and moves on to the next candidate.
pub async fn resolve_base_path(base_path: &BasePath, reference: &str) -> UrlResult<ResolvedAsset> {
    let (file, _) = split_reference(reference);
    for base in base_path.candidates() {
        let candidate = resolve_against(base, file);
        if path_exists(&candidate).await {
            tracing::trace!(reference, base = %base.display(), "resolved asset reference");
            return Ok(ResolvedAsset {
                base: base.clone(),
                path: candidate,
            });
        }
    }
    Err(UrlError::not_found(reference))
}

/// Absolute path of the first existing match for `reference`.
pub async fn resolve_path(base_path: &BasePath, reference: &str) -> UrlResult<PathBuf> {
    resolve_base_path(base_path, reference)
        .await
        .map(|resolved| resolved.path)
}

/// Locate `reference` and read its bytes.
pub async fn read_asset(base_path: &BasePath, reference: &str) -> UrlResult<(PathBuf, Vec<u8>)> {
    let path = resolve_path(base_path, reference).await?;
    let content = fs::read(&path)
        .await
        .map_err(|source| UrlError::io(&path, source))?;
    Ok((path, content))
}

async fn path_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn first_matching_candidate_wins() {
        let dir = tempdir().unwrap();
        let dir_a = dir.path().join("dirA");
        let dir_b = dir.path().join("dirB");
        std_fs::create_dir_all(dir_a.join("img")).unwrap();
        std_fs::create_dir_all(dir_b.join("img")).unwrap();
        std_fs::write(dir_b.join("img/x.png"), b"b").unwrap();

        let base: BasePath = [dir_a.clone(), dir_b.clone()].into_iter().collect();
        let resolved = resolve_base_path(&base, "img/x.png").await.unwrap();
        assert_eq!(resolved.base, dir_b);
        assert!(resolved.path.ends_with("dirB/img/x.png"));

        std_fs::write(dir_a.join("img/x.png"), b"a").unwrap();
        let resolved = resolve_base_path(&base, "img/x.png").await.unwrap();
        assert_eq!(resolved.base, dir_a);
    }

    #[tokio::test]
    async fn missing_everywhere_is_asset_not_found() {
        let dir = tempdir().unwrap();
        let base: BasePath = [dir.path().join("dirA"), dir.path().join("dirB")]
            .into_iter()
            .collect();

        let err = resolve_path(&base, "img/x.png").await.unwrap_err();
        assert!(matches!(err, UrlError::AssetNotFound { reference } if reference == "img/x.png"));
    }

    #[tokio::test]
    async fn ignores_query_suffix_when_probing() {
        let dir = tempdir().unwrap();
        std_fs::write(dir.path().join("font.woff"), b"wOFF").unwrap();

        let base = BasePath::from(dir.path());
        let (path, content) = read_asset(&base, "font.woff?v=3").await.unwrap();
        assert!(path.ends_with("font.woff"));
        assert_eq!(content, b"wOFF");
    }
}
