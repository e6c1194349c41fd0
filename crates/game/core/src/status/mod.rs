//! Status effect system for combatants.
//!
//! Status effects are timed flags that restrict actions (stun), change how
//! damage is taken or dealt (shields, reflect, slow) or arm a one-shot bonus
//! for the next card.
//!
//! # Turn-based Duration
//!
//! Durations are counted in the owner's turns. [`StatusEffectTable::tick_all`]
//! runs once at the start of each of the owner's turns and removes entries
//! that reach zero. Permanent entries are never ticked.

mod pipeline;

pub use pipeline::{IncomingHit, IncomingOutcome};

use arrayvec::ArrayVec;
use strum::{Display, EnumCount, EnumIter};

use crate::config::BattleConfig;

/// Active status effects on a combatant.
///
/// At most one entry exists per [`StatusKind`]; re-adding merges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectTable {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

/// A single status entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub duration: Duration,
    pub stacks: u32,
    /// Kind-specific magnitude (percent for DamageReduction, flat per stack for DefenseUp).
    pub value: i32,
    /// Card or effect that applied this status.
    pub source: Option<String>,
}

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Crowd Control / Debuffs
    // ========================================================================
    /// Cannot play cards.
    Stun,

    /// Outgoing damage reduced.
    Slow,

    // ========================================================================
    // Mitigation
    // ========================================================================
    /// Flat reduction of `stacks * value` per hit, never below 1.
    DefenseUp,

    /// Percent reduction of `value` per hit.
    DamageReduction,

    /// Sends part of every hit back to the attacker.
    Reflect,

    /// Like [`StatusKind::Reflect`], magic hits only.
    ReflectMagic,

    /// Like [`StatusKind::Reflect`], ranged hits only.
    ReflectRanged,

    /// Blocks one ranged hit per stack.
    BlockRanged,

    /// Blocks one hit of any class per stack.
    ShieldDrone,

    /// Redirects one hit per stack away from the owner.
    DecoyRedirect,

    /// Consumes a stack to hit back for the unmitigated amount.
    Countering,

    // ========================================================================
    // Targeting
    // ========================================================================
    /// Single-target enemy cards must target this combatant.
    Taunt,

    // ========================================================================
    // One-shot Card Modifiers
    // ========================================================================
    /// The next gadget the owner deploys is deployed twice.
    DoubleNextGadget,

    /// The next card the owner plays costs nothing.
    FreeNextResourceCard,
}

/// Remaining lifetime of a status entry or gadget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Duration {
    Permanent,
    /// Turns left. `Turns(0)` is expired.
    Turns(u32),
}

impl Duration {
    /// Longer of the two.
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Permanent, _) | (_, Self::Permanent) => Self::Permanent,
            (Self::Turns(a), Self::Turns(b)) => Self::Turns(if a > b { a } else { b }),
        }
    }

    /// Decrements a finite duration. Returns true if it just reached zero.
    pub fn tick(&mut self) -> bool {
        match self {
            Self::Permanent => false,
            Self::Turns(0) => false,
            Self::Turns(n) => {
                *n -= 1;
                *n == 0
            }
        }
    }

    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Turns(0))
    }

    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent)
    }
}

impl StatusEffect {
    pub fn new(kind: StatusKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            stacks: 1,
            value: 0,
            source: None,
        }
    }

    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl StatusEffectTable {
    pub fn new() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Stacks of `kind`, zero when absent.
    pub fn stacks(&self, kind: StatusKind) -> u32 {
        self.get(kind).map_or(0, |e| e.stacks)
    }

    /// Adds a status effect.
    ///
    /// If the kind is already present the entries merge: duration takes the
    /// longer of the two, stacks add, value takes the larger. Returns false if
    /// the entry was dropped (already expired, or the table is full).
    pub fn add(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.duration = existing.duration.merge(effect.duration);
            existing.stacks = existing.stacks.saturating_add(effect.stacks);
            existing.value = existing.value.max(effect.value);
            if effect.source.is_some() {
                existing.source = effect.source;
            }
            return true;
        }

        if effect.duration.is_expired() || effect.stacks == 0 {
            return false;
        }

        if self.effects.is_full() {
            tracing::warn!(
                target: "ryft::status",
                kind = %effect.kind,
                "status table full, dropping entry"
            );
            return false;
        }

        self.effects.push(effect);
        true
    }

    /// Removes a status effect immediately.
    pub fn remove(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    /// Consumes one stack of `kind`, removing the entry at zero.
    ///
    /// Returns false if the kind was not present.
    pub fn consume_stack(&mut self, kind: StatusKind) -> bool {
        let Some(index) = self.effects.iter().position(|e| e.kind == kind) else {
            return false;
        };
        let entry = &mut self.effects[index];
        entry.stacks = entry.stacks.saturating_sub(1);
        if entry.stacks == 0 {
            self.effects.remove(index);
        }
        true
    }

    /// Decrements every finite duration and removes entries that reach zero.
    ///
    /// Returns the kinds that expired.
    pub fn tick_all(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.duration.tick();
            if effect.duration.is_expired() {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| !e.duration.is_expired());
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
