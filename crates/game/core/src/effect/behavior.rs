//! Effect behaviors: what an effect does when added, when it procs and when it goes away.
//!
//! Built-in operations implement [`EffectBehavior`] directly on [`EffectOp`].
//! Content can register custom behaviors by name with the effect manager.

use super::def::{EffectOp, Lifetime};
use super::error::EffectError;
use super::ledger::CostLedger;
use super::runtime::EffectRuntime;
use crate::actor::{Actor, Combatant};
use crate::error::ErrorContext;
use crate::events::CombatEventContext;
use crate::rng::RngSource;
use crate::stats::{StatBlock, StatLayer};
use crate::tracker::CombatEventTracker;

/// Everything a behavior may touch.
pub struct EffectScope<'a> {
    pub owner: &'a mut Combatant,
    pub ledger: &'a mut CostLedger,
    pub tracker: &'a CombatEventTracker,
    pub rng: &'a mut dyn RngSource,
    /// Card draws requested for the external deck collaborator.
    pub pending_draws: &'a mut u32,
    pub turn: u32,
}

impl EffectScope<'_> {
    pub fn error_context(&self) -> ErrorContext {
        ErrorContext::new(self.turn).with_actor(self.owner.id)
    }
}

pub trait EffectBehavior {
    /// Runs when stacks are added. `added` is the number of stacks to apply.
    ///
    /// Only deltas flagged persistent on the ledger survive BattleEnd; use
    /// that flag for permanent effects alone.
    fn on_added(
        &self,
        _runtime: &EffectRuntime,
        _added: u32,
        _scope: &mut EffectScope<'_>,
    ) -> Result<(), EffectError> {
        Ok(())
    }

    /// Runs when the effect's trigger fires and the proc check passes.
    fn on_proc(
        &self,
        runtime: &EffectRuntime,
        event: &CombatEventContext,
        scope: &mut EffectScope<'_>,
    ) -> Result<(), EffectError>;

    /// Runs when the runtime is removed. Reverts battle-scoped deltas.
    fn on_removed(
        &self,
        _runtime: &EffectRuntime,
        _scope: &mut EffectScope<'_>,
    ) -> Result<(), EffectError> {
        Ok(())
    }
}

fn scaled(value: i32, count: u32) -> i32 {
    value.saturating_mul(i32::try_from(count).unwrap_or(i32::MAX))
}

fn non_negative(value: i32) -> u32 {
    value.max(0) as u32
}

impl EffectBehavior for EffectOp {
    fn on_added(
        &self,
        runtime: &EffectRuntime,
        added: u32,
        scope: &mut EffectScope<'_>,
    ) -> Result<(), EffectError> {
        let amount = scaled(runtime.def().int_value, added);
        match *self {
            Self::PermanentStat { stat } => {
                scope
                    .owner
                    .gain_stats(&StatBlock::single(stat, amount), StatLayer::Bonus, false);
            }
            Self::BattleStat { stat } => {
                scope
                    .owner
                    .gain_stats(&StatBlock::single(stat, amount), StatLayer::Temp, false);
            }
            Self::RefundChance { field } => {
                let persistent = runtime.def().is_permanent();
                scope.ledger.add_refund_chance(field, amount, persistent);
            }
            _ => {}
        }
        Ok(())
    }

    fn on_proc(
        &self,
        runtime: &EffectRuntime,
        _event: &CombatEventContext,
        scope: &mut EffectScope<'_>,
    ) -> Result<(), EffectError> {
        let def = runtime.def();
        let stacked = scaled(def.int_value, runtime.stacks());
        match *self {
            Self::ReduceCost { field } => scope.ledger.add_reduce_by(field, non_negative(stacked)),
            Self::CostFloor { field } => scope.ledger.raise_floor(field, non_negative(def.int_value)),
            Self::FreeNext { field } => scope.ledger.add_free_next(field, non_negative(def.int_value)),
            Self::NextCostDelta => scope.ledger.add_pending_delta(def.int_value),
            Self::GrantCredits => scope
                .ledger
                .grant_credits(non_negative(stacked), def.lifetime == Lifetime::Permanent),
            Self::RefundLastCost => {
                scope.ledger.refund_last_payment(def.float_value);
            }
            Self::ArmDamage => scope.ledger.arm(def.float_value),
            Self::Heal => {
                scope.owner.heal(non_negative(stacked));
            }
            Self::DrawCards => {
                *scope.pending_draws = scope.pending_draws.saturating_add(non_negative(def.int_value));
            }
            Self::NthCardRefund { n } => {
                if scope.tracker.is_nth_spell(n)
                    && let Some(payment) = scope.ledger.last_payment()
                {
                    scope.owner.restore_resource(payment.field, payment.amount);
                }
            }
            Self::PermanentStat { .. } | Self::BattleStat { .. } | Self::RefundChance { .. } => {}
        }
        Ok(())
    }

    fn on_removed(
        &self,
        runtime: &EffectRuntime,
        scope: &mut EffectScope<'_>,
    ) -> Result<(), EffectError> {
        let applied = scaled(runtime.def().int_value, runtime.stacks());
        match *self {
            Self::BattleStat { stat } => {
                scope
                    .owner
                    .gain_stats(&StatBlock::single(stat, -applied), StatLayer::Temp, false);
            }
            Self::RefundChance { field } => {
                scope.ledger.add_refund_chance(field, -applied, false);
            }
            _ => {}
        }
        Ok(())
    }
}
