//! Helpers for locating referenced assets and doing path arithmetic on them.
//!
//! Resolution against base path candidates is the only part that touches the filesystem;
//! the path arithmetic and the matchers are pure and never fail.

mod filters;
mod paths;
mod resolve;

pub use filters::{PatternSet, match_extensions, match_patterns, should_ignore_asset_reference};
pub use paths::{
    absolutize, dirname, extname, normalize, rebase_under, relative_path, resolve_against,
    split_reference, to_forward_slashes,
};
pub use resolve::{ResolvedAsset, read_asset, resolve_base_path, resolve_path};
