//! Battle configuration loader.

use std::path::Path;

use ryft_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`BattleConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_dispatch_depth == 0 {
            anyhow::bail!("max_dispatch_depth must be at least 1");
        }
        if config.max_damage_multiplier < 1.0 {
            anyhow::bail!(
                "max_damage_multiplier must be at least 1.0, got {}",
                config.max_damage_multiplier
            );
        }
        Ok(config)
    }
}
