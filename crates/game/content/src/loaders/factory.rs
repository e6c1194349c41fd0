//! Content factory for building a battle catalog and config from data files.

use std::path::{Path, PathBuf};

use ryft_core::{BattleConfig, StaticCatalog};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── effects.ron
/// └── cards.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `battle.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("battle.toml");
        if !path.exists() {
            tracing::debug!(target: "ryft::content", path = %path.display(), "no battle.toml, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load and validate the catalog from `effects.ron` and `cards.ron`.
    pub fn load_catalog(&self) -> LoadResult<StaticCatalog> {
        CatalogLoader::load(
            &self.data_dir.join("effects.ron"),
            &self.data_dir.join("cards.ron"),
        )
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("effects.ron"), "(effects: [])").unwrap();
        std::fs::write(
            dir.path().join("cards.ron"),
            r#"(cards: [(id: "jab", cost: 1, resource: Strength, targeting: SingleEnemy, action: Damage, base_power: 2)])"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("battle.toml"), "slow_penalty_percent = 40\n").unwrap();

        let factory = ContentFactory::new(dir.path());
        let catalog = factory.load_catalog().unwrap();
        assert_eq!(catalog.card_count(), 1);
        assert_eq!(factory.load_config().unwrap().slow_penalty_percent, 40);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        assert!(err.to_string().contains("effects.ron"));
    }
}
