//! Declarative effect descriptors.
//!
//! Effect definitions are authored as data (see `ryft-content`) and never
//! mutated after load. All per-battle state lives in
//! [`EffectRuntime`](super::EffectRuntime).

use core::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIter};

use crate::events::Trigger;
use crate::stats::{ResourceKind, StatKind};

/// Stable identifier of an effect definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EffectId(pub String);

impl EffectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EffectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ryft color classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectColor {
    Red,
    Blue,
    Green,
    Purple,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// How long an effect runtime stays active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Never removed; on-add deltas are irreversible.
    Permanent,
    #[default]
    UntilBattleEnd,
    /// Removed after `duration_turns` turn ticks.
    DurationTurns,
}

bitflags! {
    /// Content classification tags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EffectTags: u8 {
        const ECONOMY = 1 << 0;
        const OFFENSE = 1 << 1;
        const DEFENSE = 1 << 2;
        const DRAW    = 1 << 3;
        const SUSTAIN = 1 << 4;
    }
}

/// Built-in effect operations.
///
/// Magnitudes come from the definition's `int_value` / `float_value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectOp {
    /// On add: permanent bonus stat, heals on max-health gain.
    PermanentStat { stat: StatKind },
    /// On add: battle-scoped stat, reverted on removal.
    BattleStat { stat: StatKind },
    /// On add: refund chance for a field, reverted on removal.
    RefundChance { field: ResourceKind },
    /// On proc: this turn's cost reduction for a field.
    ReduceCost { field: ResourceKind },
    /// On proc: this turn's minimum cost for a field.
    CostFloor { field: ResourceKind },
    /// On proc: next N cards paid with a field are free.
    FreeNext { field: ResourceKind },
    /// On proc: one-shot delta on the next computed cost.
    NextCostDelta,
    /// On proc: bank credits.
    GrantCredits,
    /// On proc: bank a percentage of the last payment.
    RefundLastCost,
    /// On proc: arm the one-shot outgoing damage multiplier.
    ArmDamage,
    /// On proc: heal the owner.
    Heal,
    /// On proc: queue card draws.
    DrawCards,
    /// On proc: return the last payment when the owner casts their Nth spell this turn.
    NthCardRefund { n: u32 },
}

/// Where an effect's behavior comes from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectBehaviorRef {
    Builtin(EffectOp),
    /// Name of a behavior registered with the effect manager.
    Custom(String),
}

/// Immutable effect definition.
///
/// # Example
/// ```
/// # use ryft_core::effect::{EffectDef, EffectBehaviorRef, EffectColor, EffectOp, Lifetime, Polarity};
/// # use ryft_core::events::Trigger;
/// # use ryft_core::stats::ResourceKind;
/// let def = EffectDef::new(
///     "surge",
///     EffectColor::Blue,
///     Polarity::Positive,
///     EffectBehaviorRef::Builtin(EffectOp::ReduceCost { field: ResourceKind::Mana }),
/// )
/// .with_trigger(Trigger::TurnStart)
/// .with_int(1)
/// .with_chance(50)
/// .with_lifetime(Lifetime::DurationTurns, 3);
/// assert_eq!(def.max_stacks, 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDef {
    pub id: EffectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub color: EffectColor,
    pub polarity: Polarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: EffectTags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifetime: Lifetime,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration_turns: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delay_turns: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_chance_percent"))]
    pub chance_percent: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub internal_cooldown_turns: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub int_value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub float_value: f32,
    /// Trigger the effect reacts to. `None` for effects that only act on add.
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: Option<Trigger>,
    pub behavior: EffectBehaviorRef,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_chance_percent() -> u32 {
    100
}

impl EffectDef {
    pub fn new(
        id: impl Into<String>,
        color: EffectColor,
        polarity: Polarity,
        behavior: EffectBehaviorRef,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: EffectId(id),
            color,
            polarity,
            tags: EffectTags::empty(),
            lifetime: Lifetime::UntilBattleEnd,
            duration_turns: 0,
            delay_turns: 0,
            max_stacks: 1,
            chance_percent: 100,
            internal_cooldown_turns: 0,
            int_value: 0,
            float_value: 0.0,
            trigger: None,
            behavior,
        }
    }

    pub fn builtin(
        id: impl Into<String>,
        color: EffectColor,
        polarity: Polarity,
        op: EffectOp,
    ) -> Self {
        Self::new(id, color, polarity, EffectBehaviorRef::Builtin(op))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tags(mut self, tags: EffectTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime, duration_turns: u32) -> Self {
        self.lifetime = lifetime;
        self.duration_turns = duration_turns;
        self
    }

    pub fn with_delay(mut self, turns: u32) -> Self {
        self.delay_turns = turns;
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks;
        self
    }

    pub fn with_chance(mut self, percent: u32) -> Self {
        self.chance_percent = percent;
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.internal_cooldown_turns = turns;
        self
    }

    pub fn with_int(mut self, value: i32) -> Self {
        self.int_value = value;
        self
    }

    pub fn with_float(mut self, value: f32) -> Self {
        self.float_value = value;
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn is_permanent(&self) -> bool {
        self.lifetime == Lifetime::Permanent
    }

    pub fn matches_class(&self, color: EffectColor, polarity: Polarity) -> bool {
        self.color == color && self.polarity == polarity
    }
}
