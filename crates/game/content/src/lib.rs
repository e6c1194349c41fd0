//! Data-driven battle content and loaders.
//!
//! This crate houses the bundled Ryft content and provides loaders for RON/TOML data files:
//! - Effect catalogs (data-driven via RON)
//! - Card catalogs (data-driven via RON)
//! - Battle configuration (data-driven via TOML)
//!
//! All loaders use ryft-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod bundled;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use bundled::BundledContent;

#[cfg(feature = "loaders")]
pub use loaders::{
    CardLoader, CatalogLoader, ConfigLoader, ContentFactory, EffectLoader, LoadResult,
};
