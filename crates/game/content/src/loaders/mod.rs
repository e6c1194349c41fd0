//! Content loaders for reading battle data from files.
//!
//! Effect and card catalogs are RON, battle configuration is TOML. Every
//! loader deserializes straight into `ryft-core` types.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{CardLoader, CatalogLoader, EffectLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
