//! Layered stats: base + bonus + temp + turn = current.

use strum::Display;

use super::block::StatBlock;

/// Which layer a stat delta is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatLayer {
    /// Authored values. Only battle setup writes here.
    Base,
    /// Permanent, survives battles. Owned by the session layer between encounters.
    Bonus,
    /// Battle-scoped, cleared at BattleEnd.
    Temp,
    /// Current turn only, cleared at TurnEnd.
    Turn,
}

/// The four stat layers of an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatLayers {
    pub base: StatBlock,
    pub bonus: StatBlock,
    pub temp: StatBlock,
    pub turn: StatBlock,
}

impl StatLayers {
    pub fn new(base: StatBlock) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Sum of every layer.
    pub fn current(&self) -> StatBlock {
        self.base + self.bonus + self.temp + self.turn
    }

    pub fn layer(&self, layer: StatLayer) -> &StatBlock {
        match layer {
            StatLayer::Base => &self.base,
            StatLayer::Bonus => &self.bonus,
            StatLayer::Temp => &self.temp,
            StatLayer::Turn => &self.turn,
        }
    }

    pub fn layer_mut(&mut self, layer: StatLayer) -> &mut StatBlock {
        match layer {
            StatLayer::Base => &mut self.base,
            StatLayer::Bonus => &mut self.bonus,
            StatLayer::Temp => &mut self.temp,
            StatLayer::Turn => &mut self.turn,
        }
    }

    pub fn clear_turn(&mut self) {
        self.turn = StatBlock::ZERO;
    }

    pub fn clear_temp(&mut self) {
        self.temp = StatBlock::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKind;

    #[test]
    fn current_sums_all_layers() {
        let mut layers = StatLayers::new(StatBlock::new(5, 3, 2, 3, 40, 1));
        layers.bonus.max_health = 5;
        layers.temp.strength = 2;
        layers.turn.strength = 1;

        let current = layers.current();
        assert_eq!(current.strength, 8);
        assert_eq!(current.max_health, 45);
        assert_eq!(current.get(StatKind::Mana), 3);
    }

    #[test]
    fn clearing_scoped_layers_keeps_bonus() {
        let mut layers = StatLayers::new(StatBlock::new(5, 0, 0, 0, 40, 0));
        layers.layer_mut(StatLayer::Bonus).strength = 3;
        layers.layer_mut(StatLayer::Temp).strength = 2;
        layers.layer_mut(StatLayer::Turn).strength = 1;

        layers.clear_turn();
        assert_eq!(layers.current().strength, 10);

        layers.clear_temp();
        assert_eq!(layers.current().strength, 8);
        assert_eq!(layers.layer(StatLayer::Bonus).strength, 3);
    }
}
