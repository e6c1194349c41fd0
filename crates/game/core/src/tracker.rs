//! Per-turn combat accounting consumed by reactive cards and effects.

use strum::EnumCount;

use crate::actor::ActorId;
use crate::card::CardId;
use crate::effect::EffectId;
use crate::stats::{DamageClass, PerResource, ResourceKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct TurnCounters {
    kills: u32,
    kills_by_class: [u32; DamageClass::COUNT],
    spells: u32,
    spent: PerResource<u32>,
}

/// Counters for the owner's current turn plus battle totals.
///
/// Only the owner's actions are recorded. The battle feeds the tracker; it
/// never reads it for control flow beyond what effects query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatEventTracker {
    owner: ActorId,
    turn: TurnCounters,
    last_card: Option<CardId>,
    last_effect: Option<EffectId>,
    battle_kills: u32,
    battle_spells: u32,
}

impl CombatEventTracker {
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            turn: TurnCounters::default(),
            last_card: None,
            last_effect: None,
            battle_kills: 0,
            battle_spells: 0,
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Clears per-turn counters. Called once at the owner's turn start.
    pub fn reset_for_player_turn(&mut self) {
        self.turn = TurnCounters::default();
    }

    /// Records a card the owner paid for.
    pub fn record_card(&mut self, card: &CardId, is_spell: bool, field: ResourceKind, spent: u32) {
        if is_spell {
            self.turn.spells = self.turn.spells.saturating_add(1);
            self.battle_spells = self.battle_spells.saturating_add(1);
        }
        self.turn.spent[field] = self.turn.spent[field].saturating_add(spent);
        self.last_card = Some(card.clone());
    }

    pub fn record_kill(&mut self, class: DamageClass) {
        self.turn.kills = self.turn.kills.saturating_add(1);
        let slot = &mut self.turn.kills_by_class[class as usize];
        *slot = slot.saturating_add(1);
        self.battle_kills = self.battle_kills.saturating_add(1);
    }

    pub fn record_effect(&mut self, effect: &EffectId) {
        self.last_effect = Some(effect.clone());
    }

    /// True when the owner has cast a multiple of `n` spells this turn.
    pub fn is_nth_spell(&self, n: u32) -> bool {
        n > 0 && self.turn.spells > 0 && self.turn.spells % n == 0
    }

    pub fn kills_this_turn(&self) -> u32 {
        self.turn.kills
    }

    pub fn kills_by_class(&self, class: DamageClass) -> u32 {
        self.turn.kills_by_class[class as usize]
    }

    pub fn spells_this_turn(&self) -> u32 {
        self.turn.spells
    }

    pub fn spent_this_turn(&self, field: ResourceKind) -> u32 {
        self.turn.spent[field]
    }

    pub fn last_card(&self) -> Option<&CardId> {
        self.last_card.as_ref()
    }

    pub fn last_effect(&self) -> Option<&EffectId> {
        self.last_effect.as_ref()
    }

    pub fn battle_kills(&self) -> u32 {
        self.battle_kills
    }

    pub fn battle_spells(&self) -> u32 {
        self.battle_spells
    }

    pub fn reset_battle(&mut self) {
        *self = Self::new(self.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nth_spell_counts_multiples() {
        let mut tracker = CombatEventTracker::new(ActorId::PLAYER);
        let bolt = CardId::new("bolt");
        assert!(!tracker.is_nth_spell(2));

        tracker.record_card(&bolt, true, ResourceKind::Mana, 1);
        assert!(!tracker.is_nth_spell(2));
        tracker.record_card(&bolt, true, ResourceKind::Mana, 1);
        assert!(tracker.is_nth_spell(2));
        assert!(!tracker.is_nth_spell(0));

        tracker.record_card(&CardId::new("jab"), false, ResourceKind::Strength, 2);
        assert_eq!(tracker.spells_this_turn(), 2);
        assert_eq!(tracker.spent_this_turn(ResourceKind::Mana), 2);
        assert_eq!(tracker.last_card(), Some(&CardId::new("jab")));
    }

    #[test]
    fn turn_reset_keeps_battle_totals() {
        let mut tracker = CombatEventTracker::new(ActorId::PLAYER);
        tracker.record_kill(DamageClass::Ranged);
        tracker.record_card(&CardId::new("bolt"), true, ResourceKind::Mana, 1);
        assert_eq!(tracker.kills_by_class(DamageClass::Ranged), 1);

        tracker.reset_for_player_turn();
        assert_eq!(tracker.kills_this_turn(), 0);
        assert_eq!(tracker.spells_this_turn(), 0);
        assert_eq!(tracker.battle_kills(), 1);
        assert_eq!(tracker.battle_spells(), 1);

        tracker.reset_battle();
        assert_eq!(tracker.battle_kills(), 0);
        assert!(tracker.last_card().is_none());
    }
}
