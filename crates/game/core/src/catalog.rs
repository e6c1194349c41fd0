//! Read-only effect and card lookup.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::card::{CardDef, CardId};
use crate::effect::{EffectColor, EffectDef, EffectId, Polarity};

/// Oracle for content definitions consumed by the battle.
pub trait Catalog {
    fn effect(&self, id: &EffectId) -> Option<Rc<EffectDef>>;

    fn card(&self, id: &CardId) -> Option<Rc<CardDef>>;

    /// Every effect, in a stable order.
    fn effects(&self) -> Vec<Rc<EffectDef>>;

    /// Every card, in a stable order.
    fn cards(&self) -> Vec<Rc<CardDef>>;

    /// Effects of one Ryft classification, in the same order as [`Catalog::effects`].
    fn effects_by_class(&self, color: EffectColor, polarity: Polarity) -> Vec<Rc<EffectDef>> {
        self.effects()
            .into_iter()
            .filter(|def| def.matches_class(color, polarity))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("effect '{0}' defined more than once")]
    DuplicateEffect(EffectId),

    #[error("card '{0}' defined more than once")]
    DuplicateCard(CardId),
}

/// In-memory catalog ordered by id.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    effects: BTreeMap<EffectId, Rc<EffectDef>>,
    cards: BTreeMap<CardId, Rc<CardDef>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting duplicate ids.
    pub fn from_parts(
        effects: impl IntoIterator<Item = EffectDef>,
        cards: impl IntoIterator<Item = CardDef>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for effect in effects {
            if catalog.effects.contains_key(&effect.id) {
                return Err(CatalogError::DuplicateEffect(effect.id));
            }
            catalog.add_effect(effect);
        }
        for card in cards {
            if catalog.cards.contains_key(&card.id) {
                return Err(CatalogError::DuplicateCard(card.id));
            }
            catalog.add_card(card);
        }
        Ok(catalog)
    }

    /// Adds or replaces an effect definition.
    pub fn add_effect(&mut self, def: EffectDef) {
        self.effects.insert(def.id.clone(), Rc::new(def));
    }

    /// Adds or replaces a card definition.
    pub fn add_card(&mut self, def: CardDef) {
        self.cards.insert(def.id.clone(), Rc::new(def));
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

impl Catalog for StaticCatalog {
    fn effect(&self, id: &EffectId) -> Option<Rc<EffectDef>> {
        self.effects.get(id).cloned()
    }

    fn card(&self, id: &CardId) -> Option<Rc<CardDef>> {
        self.cards.get(id).cloned()
    }

    fn effects(&self) -> Vec<Rc<EffectDef>> {
        self.effects.values().cloned().collect()
    }

    fn cards(&self) -> Vec<Rc<CardDef>> {
        self.cards.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardAction, Targeting};
    use crate::effect::EffectOp;
    use crate::stats::ResourceKind;

    fn effect(id: &str, color: EffectColor) -> EffectDef {
        EffectDef::builtin(id, color, Polarity::Positive, EffectOp::GrantCredits)
    }

    #[test]
    fn class_lookup_is_ordered_by_id() {
        let catalog = StaticCatalog::from_parts(
            [
                effect("zeta", EffectColor::Red),
                effect("alpha", EffectColor::Red),
                effect("beta", EffectColor::Blue),
            ],
            [],
        )
        .unwrap();

        let reds: Vec<_> = catalog
            .effects_by_class(EffectColor::Red, Polarity::Positive)
            .iter()
            .map(|d| d.id.as_str().to_owned())
            .collect();
        assert_eq!(reds, vec!["alpha", "zeta"]);
        assert!(catalog
            .effects_by_class(EffectColor::Red, Polarity::Negative)
            .is_empty());
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = StaticCatalog::from_parts(
            [effect("a", EffectColor::Red), effect("a", EffectColor::Blue)],
            [],
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateEffect(EffectId::new("a")));

        let card = || CardDef::new("c", 1, ResourceKind::Mana, Targeting::None, CardAction::Utility);
        let err = StaticCatalog::from_parts([], [card(), card()]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateCard(CardId::new("c")));
    }
}
