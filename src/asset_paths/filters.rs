use std::sync::OnceLock;

use regex::RegexSet;

use crate::error::{UrlError, UrlResult};

fn asset_reference_ignores() -> &'static RegexSet {
    static PATTERNS: OnceLock<RegexSet> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        RegexSet::new([
            r"(?i)^https?://",
            r"(?i)^data:",
            r"(?i)^mailto:",
            r"^//",
            r"^#",
        ])
            .expect("invalid asset reference ignore patterns")
    })
}

/// Determine whether a stylesheet reference points somewhere no processor can reach.
///
/// Remote URLs, protocol-relative URLs, data URIs and in-document fragments such as
/// `url(#blur)` have no file behind them.
pub fn should_ignore_asset_reference(value: &str) -> bool {
    asset_reference_ignores().is_match(value)
}

/// Returns `true` when `path` ends with any of the given extensions.
///
/// Extensions may be written with or without their leading dot; the comparison is a
/// case-sensitive suffix test.
pub fn match_extensions<S: AsRef<str>>(path: &str, extensions: &[S]) -> bool {
    extensions.iter().any(|ext| {
        let ext = ext.as_ref().trim_start_matches('.');
        !ext.is_empty()
            && path
                .strip_suffix(ext)
                .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Compiled set of unanchored regex patterns tested against whole paths.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: RegexSet,
}

impl PatternSet {
    /// Compile `patterns`, reporting the first one that fails.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> UrlResult<Self> {
        for pattern in patterns {
            regex::Regex::new(pattern.as_ref()).map_err(|source| UrlError::InvalidPattern {
                pattern: pattern.as_ref().to_string(),
                source,
            })?;
        }
        let set = RegexSet::new(patterns).map_err(|source| UrlError::InvalidPattern {
            pattern: String::new(),
            source,
        })?;
        Ok(Self { set })
    }

    /// Set that matches nothing.
    pub fn empty() -> Self {
        Self {
            set: RegexSet::empty(),
        }
    }

    /// Returns `true` when any pattern finds a match anywhere in `path`.
    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// One-shot form of [`PatternSet::is_match`].
pub fn match_patterns<S: AsRef<str>>(path: &str, patterns: &[S]) -> UrlResult<bool> {
    Ok(PatternSet::new(patterns)?.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_remote_and_data_references() {
        assert!(should_ignore_asset_reference("https://example.com/a.png"));
        assert!(should_ignore_asset_reference("HTTP://example.com"));
        assert!(should_ignore_asset_reference("//cdn.example.com/font.woff"));
        assert!(should_ignore_asset_reference("data:image/png;base64,abc"));
        assert!(should_ignore_asset_reference("mailto:user@example.com"));
        assert!(should_ignore_asset_reference("#blur"));
    }

    #[test]
    fn keeps_relative_paths() {
        assert!(!should_ignore_asset_reference("images/photo.png"));
        assert!(!should_ignore_asset_reference("/images/photo.png"));
        assert!(!should_ignore_asset_reference("sprite.svg#icon"));
    }

    #[test]
    fn matches_extensions_with_or_without_dot() {
        assert!(match_extensions("img/logo.png", &[".png", ".jpg"]));
        assert!(match_extensions("img/logo.png", &["png"]));
        assert!(!match_extensions("img/logo.PNG", &[".png"]));
        assert!(!match_extensions("img/logo.svg", &[".png", ".jpg"]));
        assert!(!match_extensions("img/apng", &["png"]));
    }

    #[test]
    fn patterns_search_without_anchoring() {
        let patterns = PatternSet::new(&[r"fonts/", r"\.svg$"]).unwrap();
        assert!(patterns.is_match("../fonts/a.woff"));
        assert!(patterns.is_match("icons/home.svg"));
        assert!(!patterns.is_match("img/logo.png"));
        assert!(!PatternSet::empty().is_match("anything"));
    }

    #[test]
    fn reports_invalid_patterns() {
        let err = match_patterns("a.png", &["("]).unwrap_err();
        assert!(matches!(err, UrlError::InvalidPattern { pattern, .. } if pattern == "("));
    }
}
