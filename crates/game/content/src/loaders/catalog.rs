//! Effect and card catalog loaders.

use std::path::Path;

use ryft_core::{CardDef, Catalog, EffectDef, StaticCatalog};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Effect catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectCatalog {
    pub effects: Vec<EffectDef>,
}

/// Card catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalog {
    pub cards: Vec<CardDef>,
}

/// Loader for effect definitions from RON files.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EffectDef>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EffectDef>> {
        let catalog: EffectCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;
        Ok(catalog.effects)
    }
}

/// Loader for card definitions from RON files.
pub struct CardLoader;

impl CardLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CardDef>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CardDef>> {
        let catalog: CardCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;
        Ok(catalog.cards)
    }
}

/// Builds a validated [`StaticCatalog`] from effect and card files.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(effects: &Path, cards: &Path) -> LoadResult<StaticCatalog> {
        let effects = EffectLoader::load(effects)?;
        let cards = CardLoader::load(cards)?;
        Self::build(effects, cards)
    }

    pub fn parse(effects: &str, cards: &str) -> LoadResult<StaticCatalog> {
        Self::build(EffectLoader::parse(effects)?, CardLoader::parse(cards)?)
    }

    /// Rejects duplicate ids and cards that grant effects missing from the catalog.
    pub fn build(effects: Vec<EffectDef>, cards: Vec<CardDef>) -> LoadResult<StaticCatalog> {
        let catalog = StaticCatalog::from_parts(effects, cards)?;

        for card in catalog.cards() {
            if let Some(missing) = card.effects.iter().find(|id| catalog.effect(id).is_none()) {
                anyhow::bail!("card '{}' grants unknown effect '{}'", card.id, missing);
            }
        }

        tracing::debug!(
            target: "ryft::content",
            effects = catalog.effect_count(),
            cards = catalog.card_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ryft_core::effect::EffectBehaviorRef;
    use ryft_core::{CardId, EffectId, EffectOp, Targeting};

    const EFFECTS: &str = r#"(
        effects: [
            (
                id: "focus",
                color: Blue,
                polarity: Positive,
                lifetime: DurationTurns,
                duration_turns: 2,
                int_value: 1,
                trigger: Some(TurnStart),
                behavior: Builtin(ReduceCost(field: Mana)),
            ),
        ],
    )"#;

    #[test]
    fn parses_effects_with_defaults() {
        let effects = EffectLoader::parse(EFFECTS).unwrap();
        assert_eq!(effects.len(), 1);
        let focus = &effects[0];
        assert_eq!(focus.max_stacks, 1);
        assert_eq!(focus.chance_percent, 100);
        assert_eq!(
            focus.behavior,
            EffectBehaviorRef::Builtin(EffectOp::ReduceCost {
                field: ryft_core::ResourceKind::Mana
            })
        );
    }

    #[test]
    fn card_with_unknown_effect_is_rejected() {
        let cards = r#"(
            cards: [
                (
                    id: "study",
                    cost: 1,
                    resource: Mana,
                    targeting: SelfOnly,
                    action: Utility,
                    effects: ["missing"],
                ),
            ],
        )"#;
        let err = CatalogLoader::parse(EFFECTS, cards).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn builds_catalog() {
        let cards = r#"(
            cards: [
                (
                    id: "study",
                    cost: 1,
                    resource: Mana,
                    targeting: SelfOnly,
                    action: Utility,
                    effects: ["focus"],
                ),
            ],
        )"#;
        let catalog = CatalogLoader::parse(EFFECTS, cards).unwrap();
        let study = catalog.card(&CardId::new("study")).unwrap();
        assert_eq!(study.targeting, Targeting::SelfOnly);
        assert_eq!(study.effects, vec![EffectId::new("focus")]);
    }
}
