use std::path::{Component, Path, PathBuf};

/// Split a reference into the part naming a file and any `?query` / `#fragment` suffix.
///
/// Font references frequently carry cache busters (`font.woff?v=3`) or IE hacks
/// (`font.eot?#iefix`); neither is part of the on-disk name.
pub fn split_reference(reference: &str) -> (&str, &str) {
    match reference.find(['?', '#']) {
        Some(index) => reference.split_at(index),
        None => (reference, ""),
    }
}

/// Directory portion of a path, `.` when the path has no parent.
pub fn dirname(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Extension of the final path component including the leading dot, or an empty string.
pub fn extname(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Lexically collapse `.` and `..` components without consulting the filesystem.
///
/// Parent components that would climb above the root of an absolute path are dropped; on a
/// relative path they are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Anchor a path at the current working directory (when relative) and normalise it.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

/// Absolute location of `reference` when read relative to `base`.
pub fn resolve_against(base: &Path, reference: &str) -> PathBuf {
    absolutize(&base.join(reference))
}

/// Path leading from the directory `from` to `to`.
///
/// Both sides are made absolute first, so relative inputs are compared as seen from the
/// current working directory. Identical inputs yield an empty path.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = absolutize(from);
    let to = absolutize(to);
    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(left, right)| left == right)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part);
    }
    result
}

/// Join `relative` under `root`, discarding parent components that would escape `root`.
pub fn rebase_under(root: &Path, relative: &Path) -> PathBuf {
    let mut result = normalize(root);
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
            Component::ParentDir if depth > 0 => {
                result.pop();
                depth -= 1;
            }
            _ => {}
        }
    }
    result
}

/// Render a path with forward slashes regardless of the host separator.
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
