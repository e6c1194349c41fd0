//! Combat rules for Ryft.
//!
//! `ryft-core` owns the turn-based combat model: combatants and their stat
//! layers, status effects and the damage pipeline, the Ryft effect engine and
//! its resource-cost economy, death prevention, gadgets, the combat event bus
//! and card execution. Every per-encounter component lives in
//! [`battle::Battle`], which is passed by `&mut` to anything that changes state.
//!
//! Content (effect and card definitions) is read through the [`Catalog`]
//! oracle; loading it from data files is left to `ryft-content`.
pub mod actor;
pub mod battle;
pub mod card;
pub mod catalog;
pub mod config;
pub mod death;
pub mod effect;
pub mod error;
pub mod events;
pub mod gadget;
pub mod rng;
pub mod stats;
pub mod status;
pub mod tracker;

pub use actor::{Actor, ActorId, Combatant, Roster, Side};
pub use battle::{Battle, BattleError, CardError, CardOutcome, HitReport, Outcome, Phase};
pub use card::{CardAction, CardDef, CardId, CardTags, StatusGrant, StatusRecipient, Targeting};
pub use catalog::{Catalog, CatalogError, StaticCatalog};
pub use config::BattleConfig;
pub use death::{DeathPrevention, DeathPreventionKind, DeathPreventionRegistry};
pub use effect::{
    CostLedger, EffectBehavior, EffectColor, EffectDef, EffectError, EffectId, EffectManager,
    EffectOp, EffectRuntime, Lifetime, Polarity,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use events::{
    CombatEventContext, EventBus, FnSubscriber, Subscriber, SubscriberError, SubscriptionId,
    SubscriptionScope, Trigger,
};
pub use gadget::{Gadget, GadgetEvent, GadgetId, GadgetKind, GadgetRegistry};
pub use rng::{PcgRng, RngSource, SequenceRng};
pub use stats::{DamageClass, ResourceKind, StatBlock, StatKind, StatLayer, StatLayers};
pub use status::{Duration, StatusEffect, StatusEffectTable, StatusKind};
pub use tracker::CombatEventTracker;
