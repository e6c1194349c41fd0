//! Declarative card descriptors.
//!
//! A card binds a cost (amount + resource field) to targeting, a damage or
//! heal computation and optional side effects. Execution lives in
//! [`Battle::execute_card`](crate::battle::Battle::execute_card).

use core::fmt;

use bitflags::bitflags;
use strum::Display;

use crate::death::DeathPreventionKind;
use crate::effect::{EffectColor, EffectId, Polarity};
use crate::gadget::GadgetKind;
use crate::stats::{DamageClass, ResourceKind, StatBlock, StatKind};
use crate::status::{Duration, StatusKind};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Targeting {
    None,
    SelfOnly,
    /// Explicit target, falling back to the first alive opponent.
    SingleEnemy,
    AllEnemies,
}

/// How an all-enemies card distributes its damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AoePolicy {
    /// Divide evenly, at least 1 per target.
    #[default]
    Split,
    /// Full amount to every target.
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardAction {
    Damage,
    Heal,
    /// Side effects only.
    Utility,
}

/// `stat * factor` added to the card's base power.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaling {
    pub stat: StatKind,
    pub factor: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusRecipient {
    Caster,
    #[default]
    Target,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusGrant {
    pub kind: StatusKind,
    pub duration: Duration,
    #[cfg_attr(feature = "serde", serde(default = "default_stacks"))]
    pub stacks: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub recipient: StatusRecipient,
}

#[cfg(feature = "serde")]
fn default_stacks() -> u32 {
    1
}

impl StatusGrant {
    pub fn new(kind: StatusKind, duration: Duration, recipient: StatusRecipient) -> Self {
        Self {
            kind,
            duration,
            stacks: 1,
            value: 0,
            recipient,
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
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GadgetGrant {
    pub kind: GadgetKind,
    pub power: u32,
    pub duration: Duration,
}

/// Ryft outcome a card resolves into: a random catalog effect of this classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RyftGrant {
    pub color: EffectColor,
    pub polarity: Polarity,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CardTags: u8 {
        /// Counts toward spells cast this turn.
        const SPELL  = 1 << 0;
        const ATTACK = 1 << 1;
        const SKILL  = 1 << 2;
        const GADGET = 1 << 3;
    }
}

/// Immutable card definition.
///
/// # Example
/// ```
/// # use ryft_core::card::{CardAction, CardDef, Scaling, Targeting};
/// # use ryft_core::stats::{ResourceKind, StatBlock, StatKind};
/// let bash = CardDef::new("bash", 2, ResourceKind::Strength, Targeting::SingleEnemy, CardAction::Damage)
///     .with_power(3)
///     .with_scaling(Scaling { stat: StatKind::Strength, factor: 0.5 });
/// assert_eq!(bash.power_for(&StatBlock::new(4, 0, 0, 0, 10, 0)), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDef {
    pub id: CardId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub cost: u32,
    pub resource: ResourceKind,
    pub targeting: Targeting,
    pub action: CardAction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_power: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: Option<Scaling>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aoe: AoePolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: Vec<StatusGrant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gadget: Option<GadgetGrant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<EffectId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ryft: Option<RyftGrant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub death_ward: Option<DeathPreventionKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: CardTags,
}

impl CardDef {
    pub fn new(
        id: impl Into<String>,
        cost: u32,
        resource: ResourceKind,
        targeting: Targeting,
        action: CardAction,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: CardId(id),
            cost,
            resource,
            targeting,
            action,
            base_power: 0,
            scaling: None,
            aoe: AoePolicy::Split,
            statuses: Vec::new(),
            gadget: None,
            effects: Vec::new(),
            ryft: None,
            death_ward: None,
            tags: CardTags::empty(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_power(mut self, base_power: i32) -> Self {
        self.base_power = base_power;
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = Some(scaling);
        self
    }

    pub fn with_aoe(mut self, aoe: AoePolicy) -> Self {
        self.aoe = aoe;
        self
    }

    pub fn with_status(mut self, grant: StatusGrant) -> Self {
        self.statuses.push(grant);
        self
    }

    pub fn with_gadget(mut self, kind: GadgetKind, power: u32, duration: Duration) -> Self {
        self.gadget = Some(GadgetGrant {
            kind,
            power,
            duration,
        });
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effects.push(EffectId::new(effect));
        self
    }

    pub fn with_ryft(mut self, color: EffectColor, polarity: Polarity) -> Self {
        self.ryft = Some(RyftGrant { color, polarity });
        self
    }

    pub fn with_death_ward(mut self, kind: DeathPreventionKind) -> Self {
        self.death_ward = Some(kind);
        self
    }

    pub fn with_tags(mut self, tags: CardTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn is_spell(&self) -> bool {
        self.tags.contains(CardTags::SPELL)
    }

    /// Damage class derived from the resource field that pays for the card.
    pub fn damage_class(&self) -> DamageClass {
        self.resource.damage_class()
    }

    /// `max(1, round(base + stat * factor))` against the caster's current stats.
    pub fn power_for(&self, stats: &StatBlock) -> u32 {
        let scaled = self
            .scaling
            .map_or(0.0, |s| stats.get(s.stat) as f32 * s.factor);
        let raw = (self.base_power as f32 + scaled).round();
        if raw < 1.0 { 1 } else { raw as u32 }
    }
}
