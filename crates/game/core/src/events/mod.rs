//! Combat event bus.
//!
//! Lifecycle triggers (battle/turn start and end) and action triggers (ability
//! used/resolved, damage, defeats) are published through
//! [`Battle::publish`](crate::battle::Battle::publish). Active Ryft effects
//! react first, then every subscriber registered for the trigger runs in
//! registration order.

mod bus;

pub use bus::{
    EventBus, FnSubscriber, Subscriber, SubscriberError, SubscriptionId, SubscriptionScope,
};

use strum::{Display, EnumCount, EnumIter};

use crate::actor::ActorId;
use crate::card::CardId;
use crate::effect::EffectId;

/// Kinds of combat events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trigger {
    BattleStart,
    BattleEnd,
    TurnStart,
    TurnEnd,
    AbilityUsed,
    AbilityResolved,
    DamageDealt,
    DamageTaken,
    EnemyDefeated,
}

/// Payload delivered with every trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatEventContext {
    pub trigger: Trigger,
    pub source: Option<ActorId>,
    pub target: Option<ActorId>,
    pub card: Option<CardId>,
    pub effect: Option<EffectId>,
    pub amount: u32,
}

impl CombatEventContext {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            source: None,
            target: None,
            card: None,
            effect: None,
            amount: 0,
        }
    }

    pub fn with_source(mut self, source: ActorId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }

    pub fn with_effect(mut self, effect: EffectId) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Whether an effect owned by `owner` should see this event.
    ///
    /// Action triggers are filtered to the owner's side of the action: the
    /// owner's own cards and kills, and hits the owner takes. Turn triggers
    /// carry the actor whose turn it is as source. Battle triggers always pass.
    pub fn concerns(&self, owner: ActorId) -> bool {
        match self.trigger {
            Trigger::AbilityUsed
            | Trigger::AbilityResolved
            | Trigger::DamageDealt
            | Trigger::EnemyDefeated
            | Trigger::TurnStart
            | Trigger::TurnEnd => self.source == Some(owner),
            Trigger::DamageTaken => self.target == Some(owner),
            Trigger::BattleStart | Trigger::BattleEnd => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_triggers_filter_by_owner() {
        let used = CombatEventContext::new(Trigger::AbilityUsed).with_source(ActorId::PLAYER);
        assert!(used.concerns(ActorId::PLAYER));
        assert!(!used.concerns(ActorId(3)));

        let taken = CombatEventContext::new(Trigger::DamageTaken)
            .with_source(ActorId(3))
            .with_target(ActorId::PLAYER);
        assert!(taken.concerns(ActorId::PLAYER));
        assert!(!taken.concerns(ActorId(3)));

        let enemy_turn = CombatEventContext::new(Trigger::TurnStart);
        assert!(!enemy_turn.concerns(ActorId::PLAYER));
        let player_turn = CombatEventContext::new(Trigger::TurnStart).with_source(ActorId::PLAYER);
        assert!(player_turn.concerns(ActorId::PLAYER));

        assert!(CombatEventContext::new(Trigger::BattleStart).concerns(ActorId(9)));
    }
}
