#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod options;
pub mod processor;
pub mod stylesheet;

pub use error::{UrlError, UrlResult};
pub use options::{Asset, AssetFn, BasePath, HashOptions, ProcessorOptions, UrlMode};
pub use processor::{Processor, ProcessorKind, ProcessorSet, UrlProcessor};
pub use stylesheet::{RewriteOptions, RewriteOutcome, rewrite_stylesheet};
