//! Turn lifecycle: battle start, turn hand-off between sides, battle end.

use super::{Battle, BattleError, Outcome, Phase};
use crate::actor::{Actor, ActorId, Side};
use crate::card::CardId;
use crate::error::GameError;
use crate::events::{CombatEventContext, Trigger};
use crate::status::StatusKind;

impl Battle {
    /// Starts the battle and opens the first player turn.
    pub fn start(&mut self) -> Result<(), BattleError> {
        self.expect_phase(Phase::NotStarted)?;
        tracing::info!(
            target: "ryft::battle",
            combatants = self.roster.len(),
            "battle started"
        );
        self.publish(CombatEventContext::new(Trigger::BattleStart));
        self.begin_player_turn();
        Ok(())
    }

    /// Ends the current side's turn and opens the other side's.
    pub fn end_turn(&mut self) -> Result<(), BattleError> {
        match self.phase {
            Phase::PlayerTurn => {
                let owner = self.effects.owner();
                self.publish(CombatEventContext::new(Trigger::TurnEnd).with_source(owner));
                let expired = self
                    .with_effect_env(|effects, env| effects.tick_turn(env))
                    .unwrap_or_default();
                if !expired.is_empty() {
                    tracing::debug!(target: "ryft::effect", count = expired.len(), "effects expired");
                }
                for combatant in self.roster.iter_mut().filter(|c| c.side == Side::Player) {
                    combatant.end_turn();
                }
                self.begin_enemy_turn();
                Ok(())
            }
            Phase::EnemyTurn => {
                self.publish(CombatEventContext::new(Trigger::TurnEnd));
                for combatant in self.roster.iter_mut().filter(|c| c.side == Side::Enemy) {
                    combatant.end_turn();
                }
                self.begin_player_turn();
                Ok(())
            }
            found => Err(BattleError::WrongPhase {
                expected: Phase::PlayerTurn,
                found,
            }),
        }
    }

    /// Plays the enemy turn: every alive, unstunned enemy plays the card chosen
    /// for it against the player, then the turn ends.
    ///
    /// Rejected enemy cards are logged and skipped. Returns how many cards resolved.
    pub fn run_enemy_turn(
        &mut self,
        mut chooser: impl FnMut(&Battle, ActorId) -> Option<CardId>,
    ) -> Result<usize, BattleError> {
        self.expect_phase(Phase::EnemyTurn)?;

        let enemies: Vec<ActorId> = self.roster.side(Side::Enemy).map(|c| c.id).collect();
        let mut played = 0;
        for enemy in enemies {
            if self.is_over().is_some() {
                break;
            }
            let alive = self.roster.actor(enemy).is_some_and(|c| c.is_alive());
            if !alive || self.is_stunned(enemy) {
                tracing::debug!(target: "ryft::battle", %enemy, alive, "enemy skips turn");
                continue;
            }
            let Some(card) = chooser(self, enemy) else {
                continue;
            };
            let target = self.effects.owner();
            match self.execute_card(enemy, &card, Some(target)) {
                Ok(_) => played += 1,
                Err(err) => tracing::warn!(
                    target: "ryft::battle",
                    %enemy,
                    %card,
                    code = err.error_code(),
                    error = %err,
                    "enemy card rejected"
                ),
            }
        }

        if self.is_over().is_none() {
            self.end_turn()?;
        }
        Ok(played)
    }

    /// Ends the battle and tears down every battle-scoped component.
    ///
    /// Permanent effects, permanent stat bonuses, persistent credits and
    /// session-scoped subscriptions survive.
    pub fn end(&mut self) -> Result<Option<Outcome>, BattleError> {
        if matches!(self.phase, Phase::NotStarted | Phase::Ended) {
            return Err(BattleError::WrongPhase {
                expected: Phase::PlayerTurn,
                found: self.phase,
            });
        }
        let outcome = self.is_over();
        self.publish(CombatEventContext::new(Trigger::BattleEnd));

        self.with_effect_env(|effects, env| effects.end_battle(env));
        for combatant in self.roster.iter_mut() {
            combatant.end_battle();
        }
        self.gadgets.clear();
        self.flush_gadget_events();
        self.deaths.clear();
        self.tracker.reset_battle();
        self.held_stuns.clear();
        let dropped = self.bus.clear_battle_scoped();
        self.phase = Phase::Ended;

        tracing::info!(
            target: "ryft::battle",
            turn = self.turn,
            outcome = ?outcome,
            dropped_subscriptions = dropped,
            "battle ended"
        );
        Ok(outcome)
    }

    /// Victory when every enemy is down, defeat when the player is.
    pub fn is_over(&self) -> Option<Outcome> {
        let player_alive = self.player().is_some_and(|p| p.is_alive());
        if !player_alive {
            return Some(Outcome::Defeat);
        }
        let enemies_alive = self.roster.side(Side::Enemy).any(|c| c.is_alive());
        (!enemies_alive).then_some(Outcome::Victory)
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), BattleError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BattleError::WrongPhase {
                expected,
                found: self.phase,
            })
        }
    }

    fn begin_player_turn(&mut self) {
        self.turn += 1;
        self.phase = Phase::PlayerTurn;
        self.tracker.reset_for_player_turn();
        self.begin_turn_for(Side::Player);
        let expired = self.gadgets.tick_all();
        self.flush_gadget_events();
        tracing::debug!(target: "ryft::battle", turn = self.turn, expired_gadgets = expired, "player turn");
        let owner = self.effects.owner();
        self.publish(CombatEventContext::new(Trigger::TurnStart).with_source(owner));
    }

    fn begin_enemy_turn(&mut self) {
        self.phase = Phase::EnemyTurn;
        self.begin_turn_for(Side::Enemy);
        tracing::debug!(target: "ryft::battle", turn = self.turn, "enemy turn");
        self.publish(CombatEventContext::new(Trigger::TurnStart));
    }

    /// Ticks the side's statuses and refills its pools.
    fn begin_turn_for(&mut self, side: Side) {
        self.held_stuns.clear();
        let refill = self.config.refill_pools;
        for combatant in self.roster.iter_mut().filter(|c| c.side == side && c.is_alive()) {
            if combatant.has_status(StatusKind::Stun) {
                self.held_stuns.push(combatant.id);
            }
            let expired = combatant.statuses_mut().tick_all();
            if !expired.is_empty() {
                tracing::trace!(target: "ryft::status", actor = %combatant.id, ?expired, "statuses expired");
            }
            if refill {
                combatant.refill_pools();
            }
        }
    }
}
