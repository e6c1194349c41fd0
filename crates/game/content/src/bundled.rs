//! Content compiled into the binary.

use ryft_core::{BattleConfig, StaticCatalog};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

const EFFECTS: &str = include_str!("../data/effects.ron");
const CARDS: &str = include_str!("../data/cards.ron");
const CONFIG: &str = include_str!("../data/battle.toml");

/// The default effect and card set shipped with the crate.
pub struct BundledContent;

impl BundledContent {
    pub fn catalog() -> LoadResult<StaticCatalog> {
        CatalogLoader::parse(EFFECTS, CARDS)
    }

    pub fn config() -> LoadResult<BattleConfig> {
        ConfigLoader::parse(CONFIG)
    }
}
