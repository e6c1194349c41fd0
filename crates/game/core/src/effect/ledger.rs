//! Resource-cost economy.
//!
//! The ledger owns every modifier that sits between a card's printed cost and
//! what is actually debited from the pool:
//!
//! | state | scope |
//! |---|---|
//! | reduce-by, floor | reset at TurnEnd |
//! | credits, next-N-free, pending delta, armed multiplier | reset at BattleEnd |
//! | refund chances | reset at BattleEnd to the part granted by permanent effects |
//! | persistent credits | never reset by the engine |

use crate::rng::RngSource;
use crate::stats::{PerResource, ResourceKind};

/// A debit recorded after a card was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payment {
    pub field: ResourceKind,
    pub amount: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostLedger {
    credits: u32,
    /// Part of `credits` banked by permanent effects; survives BattleEnd.
    persistent_credits: u32,
    reduce_by: PerResource<u32>,
    floor: PerResource<u32>,
    refund_chance: PerResource<i32>,
    /// Part of `refund_chance` granted by permanent effects; survives BattleEnd.
    persistent_refund_chance: PerResource<i32>,
    free_next: PerResource<u32>,
    pending_delta: i32,
    last_payment: Option<Payment>,
    damage_multiplier: f32,
    max_damage_multiplier: f32,
}

impl Default for CostLedger {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl CostLedger {
    pub fn new(max_damage_multiplier: f32) -> Self {
        Self {
            credits: 0,
            persistent_credits: 0,
            reduce_by: PerResource::splat(0),
            floor: PerResource::splat(0),
            refund_chance: PerResource::splat(0),
            persistent_refund_chance: PerResource::splat(0),
            free_next: PerResource::splat(0),
            pending_delta: 0,
            last_payment: None,
            damage_multiplier: 1.0,
            max_damage_multiplier: max_damage_multiplier.max(0.0),
        }
    }

    // ========================================================================
    // Cost computation
    // ========================================================================

    /// Computes the amount to debit for a card and consumes one-shot state.
    ///
    /// 1. A next-N-free counter for `field` makes the card free and discards the pending delta.
    /// 2. `base - reduce_by`, raised to the floor (never above `base`).
    /// 3. Pending one-shot delta, clamped at zero.
    /// 4. Banked credits pay as much as they can.
    /// 5. A successful refund roll banks whatever is left as credits.
    pub fn compute_cost(&mut self, base: u32, field: ResourceKind, rng: &mut dyn RngSource) -> u32 {
        if self.free_next[field] > 0 {
            self.free_next[field] -= 1;
            self.pending_delta = 0;
            tracing::debug!(
                target: "ryft::effect",
                %field,
                remaining = self.free_next[field],
                "free card consumed"
            );
            return 0;
        }

        let cost = self.modified_cost(base, field);
        self.pending_delta = 0;

        let covered = self.credits.min(cost);
        self.spend_credits(covered);
        let cost = cost - covered;

        if cost > 0 && self.roll_refund(field, rng) {
            self.grant_credits(cost, false);
            tracing::debug!(target: "ryft::effect", %field, refunded = cost, "cost refunded as credits");
        }

        cost
    }

    /// Side-effect free preview of [`Self::compute_cost`] without the refund roll.
    pub fn quote_cost(&self, base: u32, field: ResourceKind) -> u32 {
        if self.free_next[field] > 0 {
            return 0;
        }
        self.modified_cost(base, field).saturating_sub(self.credits)
    }

    fn modified_cost(&self, base: u32, field: ResourceKind) -> u32 {
        let reduced = base.saturating_sub(self.reduce_by[field]);
        let floored = reduced.max(self.floor[field].min(base));
        (i64::from(floored) + i64::from(self.pending_delta)).clamp(0, i64::from(u32::MAX)) as u32
    }

    fn roll_refund(&self, field: ResourceKind, rng: &mut dyn RngSource) -> bool {
        let chance = self.refund_chance[field].clamp(0, 100) as u32;
        match chance {
            0 => false,
            100.. => true,
            _ => rng.roll_percent() < chance,
        }
    }

    pub fn record_last_payment(&mut self, field: ResourceKind, amount: u32) {
        self.last_payment = Some(Payment { field, amount });
    }

    pub fn last_payment(&self) -> Option<Payment> {
        self.last_payment
    }

    // ========================================================================
    // Credits
    // ========================================================================

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn persistent_credits(&self) -> u32 {
        self.persistent_credits
    }

    /// Restores credits carried over from a previous battle.
    pub fn set_persistent_credits(&mut self, amount: u32) {
        let transient = self.credits - self.persistent_credits;
        self.persistent_credits = amount;
        self.credits = transient.saturating_add(amount);
    }

    pub fn grant_credits(&mut self, amount: u32, persistent: bool) {
        self.credits = self.credits.saturating_add(amount);
        if persistent {
            self.persistent_credits = self.persistent_credits.saturating_add(amount);
        }
    }

    /// Transient credits are spent before persistent ones.
    fn spend_credits(&mut self, amount: u32) {
        let transient = self.credits - self.persistent_credits;
        let from_persistent = amount.saturating_sub(transient);
        self.persistent_credits -= from_persistent.min(self.persistent_credits);
        self.credits -= amount;
    }

    /// Banks `percent`% of the last payment. Returns the amount banked.
    pub fn refund_last_payment(&mut self, percent: f32) -> u32 {
        let Some(payment) = self.last_payment else {
            return 0;
        };
        let amount = (payment.amount as f32 * percent.max(0.0) / 100.0).round() as u32;
        self.grant_credits(amount, false);
        amount
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    pub fn add_reduce_by(&mut self, field: ResourceKind, amount: u32) {
        self.reduce_by[field] = self.reduce_by[field].saturating_add(amount);
    }

    pub fn reduce_by(&self, field: ResourceKind) -> u32 {
        self.reduce_by[field]
    }

    pub fn raise_floor(&mut self, field: ResourceKind, floor: u32) {
        self.floor[field] = self.floor[field].max(floor);
    }

    pub fn floor(&self, field: ResourceKind) -> u32 {
        self.floor[field]
    }

    /// Adjusts the refund chance for `field`. Persistent deltas outlive the battle.
    pub fn add_refund_chance(&mut self, field: ResourceKind, delta: i32, persistent: bool) {
        self.refund_chance[field] = self.refund_chance[field].saturating_add(delta);
        if persistent {
            self.persistent_refund_chance[field] =
                self.persistent_refund_chance[field].saturating_add(delta);
        }
    }

    pub fn refund_chance(&self, field: ResourceKind) -> i32 {
        self.refund_chance[field]
    }

    pub fn add_free_next(&mut self, field: ResourceKind, count: u32) {
        self.free_next[field] = self.free_next[field].saturating_add(count);
    }

    pub fn free_next(&self, field: ResourceKind) -> u32 {
        self.free_next[field]
    }

    pub fn add_pending_delta(&mut self, delta: i32) {
        self.pending_delta = self.pending_delta.saturating_add(delta);
    }

    pub fn pending_delta(&self) -> i32 {
        self.pending_delta
    }

    // ========================================================================
    // Outgoing damage
    // ========================================================================

    /// Multiplies into the armed one-shot multiplier, clamped to `[0, max]`.
    pub fn arm(&mut self, multiplier: f32) {
        self.damage_multiplier =
            (self.damage_multiplier * multiplier).clamp(0.0, self.max_damage_multiplier);
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.damage_multiplier
    }

    /// Applies and consumes the armed multiplier.
    pub fn apply_outgoing_damage_modifiers(&mut self, base: u32) -> u32 {
        let damage = (base as f32 * self.damage_multiplier).round().max(0.0) as u32;
        self.damage_multiplier = 1.0;
        damage
    }

    // ========================================================================
    // Resets
    // ========================================================================

    pub fn reset_turn(&mut self) {
        self.reduce_by = PerResource::splat(0);
        self.floor = PerResource::splat(0);
    }

    /// Drops all battle-scoped state. Credits fall back to the persistent part.
    pub fn reset_battle(&mut self) {
        self.reset_turn();
        self.credits = self.persistent_credits;
        self.refund_chance = self.persistent_refund_chance;
        self.free_next = PerResource::splat(0);
        self.pending_delta = 0;
        self.last_payment = None;
        self.damage_multiplier = 1.0;
    }
}
