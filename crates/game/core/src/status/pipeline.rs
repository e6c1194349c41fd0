//! Incoming and outgoing damage modifiers driven by status effects.
//!
//! # Incoming order
//!
//! 1. One-shot full blocks (`ShieldDrone`, `DecoyRedirect`, then `BlockRanged` for ranged hits)
//! 2. `DamageReduction` percent
//! 3. `DefenseUp` flat, floor at 1
//! 4. Reflect (non-consuming, at most one variant per hit)
//! 5. `Countering` (consumes a stack, returns the unmitigated amount)

use super::{StatusEffectTable, StatusKind};
use crate::stats::DamageClass;

/// A hit about to land on the owner of a status table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncomingHit {
    pub amount: u32,
    pub class: DamageClass,
}

impl IncomingHit {
    pub const fn new(amount: u32, class: DamageClass) -> Self {
        Self { amount, class }
    }
}

/// Result of the incoming pipeline.
///
/// `reflected_damage` and `countered_damage` are dealt to the attacker by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncomingOutcome {
    pub damage: u32,
    pub blocked: bool,
    pub reflected: bool,
    pub reflected_damage: u32,
    pub countered_damage: u32,
}

impl IncomingOutcome {
    fn blocked() -> Self {
        Self {
            blocked: true,
            ..Self::default()
        }
    }
}

impl StatusEffectTable {
    /// Runs a hit through the owner's defensive statuses.
    ///
    /// Consumes stacks of one-shot statuses (blocks and counters) as a side effect.
    pub fn apply_incoming_damage_modifiers(
        &mut self,
        hit: IncomingHit,
        reflect_percent: u32,
    ) -> IncomingOutcome {
        if hit.amount == 0 {
            return IncomingOutcome::default();
        }

        for kind in [StatusKind::ShieldDrone, StatusKind::DecoyRedirect] {
            if self.consume_stack(kind) {
                tracing::debug!(target: "ryft::status", %kind, amount = hit.amount, "hit blocked");
                return IncomingOutcome::blocked();
            }
        }
        if hit.class == DamageClass::Ranged && self.consume_stack(StatusKind::BlockRanged) {
            tracing::debug!(target: "ryft::status", amount = hit.amount, "ranged hit blocked");
            return IncomingOutcome::blocked();
        }

        let mut damage = f64::from(hit.amount);

        if let Some(reduction) = self.get(StatusKind::DamageReduction) {
            let percent = f64::from(reduction.value.clamp(0, 100));
            damage *= 1.0 - percent / 100.0;
        }

        if let Some(defense) = self.get(StatusKind::DefenseUp) {
            let flat = f64::from(defense.value.max(0)) * f64::from(defense.stacks);
            damage = (damage - flat).max(1.0);
        }

        let damage = damage.round().max(0.0) as u32;
        let mut outcome = IncomingOutcome {
            damage,
            ..IncomingOutcome::default()
        };

        if self.reflects(hit.class) {
            outcome.reflected = true;
            outcome.reflected_damage = percent_of(damage, reflect_percent);
        }

        if self.consume_stack(StatusKind::Countering) {
            outcome.countered_damage = hit.amount;
        }

        outcome
    }

    /// Applies the attacker's own outgoing penalties.
    pub fn apply_outgoing_damage_modifiers(&self, base: u32, slow_penalty_percent: u32) -> u32 {
        if self.has(StatusKind::Slow) {
            percent_of(base, 100u32.saturating_sub(slow_penalty_percent))
        } else {
            base
        }
    }

    fn reflects(&self, class: DamageClass) -> bool {
        self.has(StatusKind::Reflect)
            || (class == DamageClass::Magic && self.has(StatusKind::ReflectMagic))
            || (class == DamageClass::Ranged && self.has(StatusKind::ReflectRanged))
    }
}

fn percent_of(amount: u32, percent: u32) -> u32 {
    (f64::from(amount) * f64::from(percent) / 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Duration, StatusEffect};

    fn hit(amount: u32) -> IncomingHit {
        IncomingHit::new(amount, DamageClass::Physical)
    }

    #[test]
    fn shield_blocks_exactly_one_hit() {
        let mut table = StatusEffectTable::new();
        table.add(StatusEffect::new(StatusKind::ShieldDrone, Duration::Permanent));

        let first = table.apply_incoming_damage_modifiers(hit(10), 50);
        assert!(first.blocked);
        assert_eq!(first.damage, 0);
        assert!(!table.has(StatusKind::ShieldDrone));

        let second = table.apply_incoming_damage_modifiers(hit(10), 50);
        assert!(!second.blocked);
        assert_eq!(second.damage, 10);
    }

    #[test]
    fn decoy_blocks_then_disappears() {
        let mut table = StatusEffectTable::new();
        table.add(StatusEffect::new(StatusKind::DecoyRedirect, Duration::Turns(3)));

        assert!(table.apply_incoming_damage_modifiers(hit(7), 50).blocked);
        assert!(!table.has(StatusKind::DecoyRedirect));
    }

    #[test]
    fn block_ranged_ignores_other_classes() {
        let mut table = StatusEffectTable::new();
        table.add(StatusEffect::new(StatusKind::BlockRanged, Duration::Turns(2)));

        let melee = table.apply_incoming_damage_modifiers(hit(6), 50);
        assert_eq!(melee.damage, 6);
        assert!(table.has(StatusKind::BlockRanged));

        let ranged =
            table.apply_incoming_damage_modifiers(IncomingHit::new(6, DamageClass::Ranged), 50);
        assert!(ranged.blocked);
        assert!(!table.has(StatusKind::BlockRanged));
    }

    #[test]
    fn reduction_then_defense_with_floor() {
        let mut table = StatusEffectTable::new();
        table.add(StatusEffect::new(StatusKind::DamageReduction, Duration::Turns(2)).with_value(50));
        table.add(
            StatusEffect::new(StatusKind::DefenseUp, Duration::Turns(2))
                .with_stacks(2)
                .with_value(2),
        );

        // 10 * 0.5 = 5, minus 4 = 1
        assert_eq!(table.apply_incoming_damage_modifiers(hit(10), 50).damage, 1);
        // 4 * 0.5 = 2, minus 4 floors at 1
        assert_eq!(table.apply_incoming_damage_modifiers(hit(4), 50).damage, 1);
    }

    #[test]
    fn reflect_is_class_specific_and_non_consuming() {
        let mut table = StatusEffectTable::new();
        table.add(StatusEffect::new(StatusKind::ReflectMagic, Duration::Turns(2)));

        let physical = table.apply_incoming_damage_modifiers(hit(10), 50);
        assert!(!physical.reflected);

        let magic =
            table.apply_incoming_damage_modifiers(IncomingHit::new(10, DamageClass::Magic), 50);
        assert!(magic.reflected);
        assert_eq!(magic.damage, 10);
        assert_eq!(magic.reflected_damage, 5);
        assert!(table.has(StatusKind::ReflectMagic));
    }

    #[test]
    fn counter_returns_unmitigated_amount_once() {
        let mut table = StatusEffectTable::new();
        table.add(StatusEffect::new(StatusKind::DamageReduction, Duration::Turns(2)).with_value(50));
        table.add(StatusEffect::new(StatusKind::Countering, Duration::Turns(2)));

        let outcome = table.apply_incoming_damage_modifiers(hit(8), 50);
        assert_eq!(outcome.damage, 4);
        assert_eq!(outcome.countered_damage, 8);

        let again = table.apply_incoming_damage_modifiers(hit(8), 50);
        assert_eq!(again.countered_damage, 0);
    }

    #[test]
    fn slow_reduces_outgoing_damage() {
        let mut table = StatusEffectTable::new();
        assert_eq!(table.apply_outgoing_damage_modifiers(8, 25), 8);
        table.add(StatusEffect::new(StatusKind::Slow, Duration::Turns(1)));
        assert_eq!(table.apply_outgoing_damage_modifiers(8, 25), 6);
    }
}
