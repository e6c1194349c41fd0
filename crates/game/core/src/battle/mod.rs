//! Battle context.
//!
//! [`Battle`] owns every per-encounter component (roster, effect manager,
//! tracker, death wards, gadgets, event bus, RNG) and is passed by `&mut` to
//! everything that changes combat state.
//!
//! # Lifecycle
//!
//! ```text
//! start() ─▶ PlayerTurn ─end_turn()─▶ EnemyTurn ─end_turn()/run_enemy_turn()─▶ PlayerTurn ...
//!                                                                                  │
//!                                                                     end() ─▶ Ended
//! ```

mod dispatch;
mod errors;
mod turns;

pub use dispatch::{CardOutcome, HitReport};
pub use errors::{BattleError, CardError};

use std::rc::Rc;

use strum::Display;

use crate::actor::{ActorId, Combatant, Roster};
use crate::catalog::Catalog;
use crate::config::BattleConfig;
use crate::death::{DeathPrevention, DeathPreventionRegistry};
use crate::effect::{
    EffectBehavior, EffectColor, EffectEnv, EffectError, EffectId, EffectManager, Polarity,
};
use crate::error::{ErrorContext, GameError};
use crate::events::{
    CombatEventContext, EventBus, Subscriber, SubscriptionId, SubscriptionScope, Trigger,
};
use crate::gadget::{GadgetEvent, GadgetRegistry};
use crate::rng::{PcgRng, RngSource};
use crate::tracker::CombatEventTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    NotStarted,
    PlayerTurn,
    EnemyTurn,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Victory,
    Defeat,
}

/// One encounter.
pub struct Battle {
    config: BattleConfig,
    catalog: Rc<dyn Catalog>,
    roster: Roster,
    effects: EffectManager,
    tracker: CombatEventTracker,
    deaths: DeathPreventionRegistry,
    gadgets: GadgetRegistry,
    bus: EventBus,
    rng: Box<dyn RngSource>,
    phase: Phase,
    turn: u32,
    dispatch_depth: usize,
    dropped_dispatches: u64,
    /// Actors stunned when their turn began. A stun that expires at turn
    /// start still costs that turn.
    held_stuns: Vec<ActorId>,
}

impl Battle {
    /// Creates a battle seeded from `config.rng_seed`.
    pub fn new(config: BattleConfig, catalog: Rc<dyn Catalog>, roster: Roster) -> Self {
        let rng = Box::new(PcgRng::new(config.rng_seed));
        Self::with_rng(config, catalog, roster, rng)
    }

    /// Creates a battle with an explicit RNG source.
    pub fn with_rng(
        config: BattleConfig,
        catalog: Rc<dyn Catalog>,
        roster: Roster,
        rng: Box<dyn RngSource>,
    ) -> Self {
        let owner = roster.player().map_or(ActorId::PLAYER, |p| p.id);
        Self {
            effects: EffectManager::new(owner, config.max_damage_multiplier),
            tracker: CombatEventTracker::new(owner),
            config,
            catalog,
            roster,
            deaths: DeathPreventionRegistry::new(),
            gadgets: GadgetRegistry::new(),
            bus: EventBus::new(),
            rng,
            phase: Phase::NotStarted,
            turn: 0,
            dispatch_depth: 0,
            dropped_dispatches: 0,
            held_stuns: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn actor(&self, id: ActorId) -> Option<&Combatant> {
        self.roster.actor(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Combatant> {
        self.roster.actor_mut(id)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.roster.actor(self.effects.owner())
    }

    pub fn effects(&self) -> &EffectManager {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectManager {
        &mut self.effects
    }

    pub fn tracker(&self) -> &CombatEventTracker {
        &self.tracker
    }

    pub fn deaths(&self) -> &DeathPreventionRegistry {
        &self.deaths
    }

    pub fn gadgets(&self) -> &GadgetRegistry {
        &self.gadgets
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Events dropped because the dispatch depth limit was reached.
    pub fn dropped_dispatches(&self) -> u64 {
        self.dropped_dispatches
    }

    /// Drains the gadget lifecycle queue into the log.
    fn flush_gadget_events(&mut self) {
        for event in self.gadgets.drain_events() {
            match event {
                GadgetEvent::Deployed(gadget) => tracing::debug!(
                    target: "ryft::gadget",
                    id = gadget.id.0,
                    kind = %gadget.kind,
                    owner = %gadget.owner,
                    power = gadget.power,
                    duration = ?gadget.duration,
                    "gadget deployed"
                ),
                GadgetEvent::Destroyed { gadget, reason } => tracing::debug!(
                    target: "ryft::gadget",
                    id = gadget.id.0,
                    kind = %gadget.kind,
                    owner = %gadget.owner,
                    %reason,
                    "gadget destroyed"
                ),
            }
        }
    }

    // ========================================================================
    // Event bus
    // ========================================================================

    pub fn subscribe(
        &mut self,
        trigger: Trigger,
        scope: SubscriptionScope,
        subscriber: Rc<dyn Subscriber>,
    ) -> SubscriptionId {
        self.bus.subscribe(trigger, scope, subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Publishes an event: active effects react first, then every subscriber
    /// registered for the trigger when dispatch began.
    ///
    /// Subscriber errors are logged and do not stop dispatch. Publishing
    /// beyond `max_dispatch_depth` nested dispatches drops the event.
    pub fn publish(&mut self, event: CombatEventContext) {
        if self.dispatch_depth >= self.config.max_dispatch_depth {
            self.dropped_dispatches += 1;
            tracing::warn!(
                target: "ryft::events",
                trigger = %event.trigger,
                depth = self.dispatch_depth,
                "dispatch depth exceeded, event dropped"
            );
            return;
        }

        self.dispatch_depth += 1;
        tracing::trace!(
            target: "ryft::events",
            trigger = %event.trigger,
            source = ?event.source,
            target_actor = ?event.target,
            amount = event.amount,
            depth = self.dispatch_depth,
            "publish"
        );

        let procs = self
            .with_effect_env(|effects, env| effects.react(&event, env))
            .unwrap_or_default();
        for id in &procs {
            self.tracker.record_effect(id);
        }

        for subscriber in self.bus.snapshot(event.trigger) {
            if let Err(err) = subscriber.on_event(&event, self) {
                tracing::error!(
                    target: "ryft::events",
                    subscriber = subscriber.name(),
                    trigger = %event.trigger,
                    severity = err.severity().as_str(),
                    error = %err,
                    "subscriber failed"
                );
            }
        }

        self.dispatch_depth -= 1;
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Runs `f` with the effect manager and its owner borrowed out of the battle.
    ///
    /// Returns `None` (and logs) if the owner is missing from the roster.
    fn with_effect_env<R>(
        &mut self,
        f: impl FnOnce(&mut EffectManager, &mut EffectEnv<'_>) -> R,
    ) -> Option<R> {
        let turn = self.turn;
        let Self {
            roster,
            effects,
            tracker,
            rng,
            ..
        } = self;
        let owner_id = effects.owner();
        let Some(owner) = roster.actor_mut(owner_id) else {
            tracing::error!(target: "ryft::effect", owner = %owner_id, "effect owner missing from roster");
            return None;
        };
        let mut env = EffectEnv {
            owner,
            tracker,
            rng: rng.as_mut(),
            turn,
        };
        Some(f(effects, &mut env))
    }

    fn owner_missing(&self) -> BattleError {
        BattleError::OwnerMissing(self.effects.owner())
    }

    /// Adds `count` stacks of a catalog effect to the player's manager.
    pub fn add_effect(&mut self, id: &EffectId, count: u32) -> Result<u32, BattleError> {
        let def = self.catalog.effect(id).ok_or_else(|| {
            EffectError::unknown_effect(id.clone(), ErrorContext::new(self.turn))
        })?;
        let result = self
            .with_effect_env(|effects, env| effects.add_effect(def, count, env))
            .ok_or_else(|| self.owner_missing())?;
        Ok(result?)
    }

    pub fn remove_effect(&mut self, id: &EffectId) -> Result<bool, BattleError> {
        let result = self
            .with_effect_env(|effects, env| effects.remove_effect(id, env))
            .ok_or_else(|| self.owner_missing())?;
        Ok(result?)
    }

    /// Resolves a Ryft outcome into a random catalog effect of that classification.
    pub fn resolve_ryft(
        &mut self,
        color: EffectColor,
        polarity: Polarity,
    ) -> Result<EffectId, BattleError> {
        let catalog = Rc::clone(&self.catalog);
        let result = self
            .with_effect_env(|effects, env| {
                effects.resolve_ryft(catalog.as_ref(), color, polarity, env)
            })
            .ok_or_else(|| self.owner_missing())?;
        let id = result?;
        self.tracker.record_effect(&id);
        Ok(id)
    }

    pub fn register_behavior(
        &mut self,
        name: impl Into<String>,
        behavior: Rc<dyn EffectBehavior>,
    ) {
        self.effects.register_behavior(name, behavior);
    }

    /// Card draws requested by effects since the last call.
    pub fn take_pending_draws(&mut self) -> u32 {
        self.effects.take_pending_draws()
    }

    pub fn register_death_prevention(&mut self, actor: ActorId, ward: DeathPrevention) {
        self.deaths.register(actor, ward);
    }

    /// True if the actor cannot play cards this turn.
    pub fn is_stunned(&self, actor: ActorId) -> bool {
        self.held_stuns.contains(&actor)
            || self
                .roster
                .actor(actor)
                .is_some_and(|c| c.has_status(crate::status::StatusKind::Stun))
    }
}

impl core::fmt::Debug for Battle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Battle")
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .field("roster", &self.roster)
            .field("effects", &self.effects)
            .field("gadgets", &self.gadgets)
            .field("bus", &self.bus)
            .field("dropped_dispatches", &self.dropped_dispatches)
            .finish_non_exhaustive()
    }
}
