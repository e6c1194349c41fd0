//! Per-battle state of an active effect.

use std::rc::Rc;

use super::def::{EffectDef, EffectId, Lifetime};
use crate::rng::RngSource;

/// Where a runtime sits in its proc cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectPhase {
    /// Eligible triggers only consume delay.
    Delayed,
    Armed,
    /// Waiting out the internal cooldown after a proc.
    Cooling,
}

/// Live instance of an [`EffectDef`]. One per definition id per manager.
#[derive(Clone, Debug)]
pub struct EffectRuntime {
    def: Rc<EffectDef>,
    stacks: u32,
    turns_remaining: Option<u32>,
    delay_remaining: u32,
    cooldown_remaining: u32,
}

impl EffectRuntime {
    /// Creates a runtime holding `count` stacks, clamped to `[1, max_stacks]`.
    pub fn new(def: Rc<EffectDef>, count: u32) -> Self {
        let stacks = count.clamp(1, def.max_stacks.max(1));
        let turns_remaining =
            (def.lifetime == Lifetime::DurationTurns).then_some(def.duration_turns);
        Self {
            stacks,
            turns_remaining,
            delay_remaining: def.delay_turns,
            cooldown_remaining: 0,
            def,
        }
    }

    pub fn def(&self) -> &EffectDef {
        &self.def
    }

    pub fn id(&self) -> &EffectId {
        &self.def.id
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    /// `None` unless the lifetime is [`Lifetime::DurationTurns`].
    pub fn turns_remaining(&self) -> Option<u32> {
        self.turns_remaining
    }

    pub fn delay_remaining(&self) -> u32 {
        self.delay_remaining
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    pub fn phase(&self) -> EffectPhase {
        if self.delay_remaining > 0 {
            EffectPhase::Delayed
        } else if self.cooldown_remaining > 0 {
            EffectPhase::Cooling
        } else {
            EffectPhase::Armed
        }
    }

    /// `clamp(chance * stacks, 0, 100)`.
    pub fn effective_chance(&self) -> u32 {
        self.def.chance_percent.saturating_mul(self.stacks).min(100)
    }

    /// Decides whether an eligible trigger procs this effect.
    ///
    /// A delayed effect consumes one delay tick instead. A successful proc
    /// starts the internal cooldown.
    pub fn should_proc(&mut self, rng: &mut dyn RngSource) -> bool {
        if self.delay_remaining > 0 {
            self.delay_remaining -= 1;
            return false;
        }
        if self.cooldown_remaining > 0 {
            return false;
        }

        let chance = self.effective_chance();
        let procs = match chance {
            0 => false,
            100.. => true,
            _ => rng.roll_percent() < chance,
        };
        if procs {
            self.cooldown_remaining = self.def.internal_cooldown_turns;
        }
        procs
    }

    /// Adds stacks up to `max_stacks`, optionally refreshing a turn-limited duration.
    ///
    /// Returns the number of stacks actually added.
    pub fn add_stack(&mut self, count: u32, refresh_duration: bool) -> u32 {
        let before = self.stacks;
        self.stacks = self
            .stacks
            .saturating_add(count)
            .min(self.def.max_stacks.max(1));
        if refresh_duration && self.turns_remaining.is_some() {
            self.turns_remaining = Some(self.def.duration_turns);
        }
        self.stacks - before
    }

    /// Per-turn decrement of cooldown and duration. Returns true once the duration ran out.
    pub fn tick_turn(&mut self) -> bool {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
        match self.turns_remaining.as_mut() {
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                *turns == 0
            }
            None => false,
        }
    }
}
