//! Per-owner orchestration of effect runtimes and the cost ledger.

use std::collections::HashMap;
use std::rc::Rc;

use super::behavior::{EffectBehavior, EffectScope};
use super::def::{EffectBehaviorRef, EffectColor, EffectDef, EffectId, EffectOp, Polarity};
use super::error::EffectError;
use super::ledger::CostLedger;
use super::runtime::EffectRuntime;
use crate::actor::{ActorId, Combatant};
use crate::catalog::Catalog;
use crate::error::ErrorContext;
use crate::events::CombatEventContext;
use crate::rng::RngSource;
use crate::stats::ResourceKind;
use crate::tracker::CombatEventTracker;

/// Borrowed battle state the manager needs for one call.
pub struct EffectEnv<'a> {
    pub owner: &'a mut Combatant,
    pub tracker: &'a CombatEventTracker,
    pub rng: &'a mut dyn RngSource,
    pub turn: u32,
}

impl EffectEnv<'_> {
    fn context(&self) -> ErrorContext {
        ErrorContext::new(self.turn).with_actor(self.owner.id)
    }
}

enum ResolvedBehavior {
    Builtin(EffectOp),
    Custom(Rc<dyn EffectBehavior>),
}

impl ResolvedBehavior {
    fn get(&self) -> &dyn EffectBehavior {
        match self {
            Self::Builtin(op) => op,
            Self::Custom(behavior) => behavior.as_ref(),
        }
    }
}

/// Active Ryft effects of one combatant plus its resource-cost economy.
pub struct EffectManager {
    owner: ActorId,
    runtimes: Vec<EffectRuntime>,
    ledger: CostLedger,
    behaviors: HashMap<String, Rc<dyn EffectBehavior>>,
    pending_draws: u32,
}

impl EffectManager {
    pub fn new(owner: ActorId, max_damage_multiplier: f32) -> Self {
        Self {
            owner,
            runtimes: Vec::new(),
            ledger: CostLedger::new(max_damage_multiplier),
            behaviors: HashMap::new(),
            pending_draws: 0,
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Registers a custom behavior referenced by `EffectBehaviorRef::Custom(name)`.
    pub fn register_behavior(
        &mut self,
        name: impl Into<String>,
        behavior: Rc<dyn EffectBehavior>,
    ) {
        self.behaviors.insert(name.into(), behavior);
    }

    fn resolve_behavior(
        &self,
        def: &EffectDef,
        context: ErrorContext,
    ) -> Result<ResolvedBehavior, EffectError> {
        match &def.behavior {
            EffectBehaviorRef::Builtin(op) => Ok(ResolvedBehavior::Builtin(*op)),
            EffectBehaviorRef::Custom(name) => self
                .behaviors
                .get(name)
                .map(|b| ResolvedBehavior::Custom(Rc::clone(b)))
                .ok_or_else(|| {
                    EffectError::unknown_behavior(def.id.clone(), name.clone(), context)
                }),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn runtime(&self, id: &EffectId) -> Option<&EffectRuntime> {
        self.runtimes.iter().find(|rt| rt.id() == id)
    }

    pub fn runtimes(&self) -> &[EffectRuntime] {
        &self.runtimes
    }

    pub fn stacks(&self, id: &EffectId) -> u32 {
        self.runtime(id).map_or(0, EffectRuntime::stacks)
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut CostLedger {
        &mut self.ledger
    }

    /// Card draws requested since the last call.
    pub fn take_pending_draws(&mut self) -> u32 {
        core::mem::take(&mut self.pending_draws)
    }

    // ========================================================================
    // Adding and removing
    // ========================================================================

    /// Adds `count` stacks of `def`, creating the runtime on first add.
    ///
    /// Permanent effects apply `count` times their magnitude on every add,
    /// regardless of the stack cap. Other effects apply only the stacks that
    /// were actually added. Returns the stacks applied.
    pub fn add_effect(
        &mut self,
        def: Rc<EffectDef>,
        count: u32,
        env: &mut EffectEnv<'_>,
    ) -> Result<u32, EffectError> {
        if count == 0 {
            return Ok(0);
        }
        let behavior = self.resolve_behavior(&def, env.context())?;
        let permanent = def.is_permanent();

        let (index, added) = match self.runtimes.iter().position(|rt| rt.id() == &def.id) {
            Some(index) => (index, self.runtimes[index].add_stack(count, true)),
            None => {
                let runtime = EffectRuntime::new(def, count);
                let added = runtime.stacks();
                self.runtimes.push(runtime);
                (self.runtimes.len() - 1, added)
            }
        };

        let applied = if permanent { count } else { added };
        self.apply_added(index, &behavior, applied, env)
    }

    fn apply_added(
        &mut self,
        index: usize,
        behavior: &ResolvedBehavior,
        applied: u32,
        env: &mut EffectEnv<'_>,
    ) -> Result<u32, EffectError> {
        let Self {
            runtimes,
            ledger,
            pending_draws,
            ..
        } = self;
        let runtime = &runtimes[index];
        tracing::debug!(
            target: "ryft::effect",
            effect = %runtime.id(),
            owner = %env.owner.id,
            stacks = runtime.stacks(),
            applied,
            "effect added"
        );
        if applied == 0 {
            return Ok(0);
        }
        let mut scope = EffectScope {
            owner: &mut *env.owner,
            ledger,
            tracker: env.tracker,
            rng: &mut *env.rng,
            pending_draws,
            turn: env.turn,
        };
        behavior.get().on_added(runtime, applied, &mut scope)?;
        Ok(applied)
    }

    /// Adds one stack of the effect chosen by a Ryft outcome.
    pub fn on_ryft_outcome(
        &mut self,
        def: Rc<EffectDef>,
        env: &mut EffectEnv<'_>,
    ) -> Result<u32, EffectError> {
        self.add_effect(def, 1, env)
    }

    /// Picks a random catalog effect of the given classification and adds it.
    pub fn resolve_ryft(
        &mut self,
        catalog: &dyn Catalog,
        color: EffectColor,
        polarity: Polarity,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectId, EffectError> {
        let candidates = catalog.effects_by_class(color, polarity);
        let def = env
            .rng
            .pick_index(candidates.len())
            .and_then(|index| candidates.get(index).cloned())
            .ok_or_else(|| EffectError::no_effect_for_class(color, polarity, env.context()))?;
        let id = def.id.clone();
        tracing::info!(target: "ryft::effect", effect = %id, %color, %polarity, "ryft resolved");
        self.on_ryft_outcome(def, env)?;
        Ok(id)
    }

    /// Removes a runtime and reverts its battle-scoped deltas.
    ///
    /// Returns false if no runtime with that id exists.
    pub fn remove_effect(
        &mut self,
        id: &EffectId,
        env: &mut EffectEnv<'_>,
    ) -> Result<bool, EffectError> {
        let Some(index) = self.runtimes.iter().position(|rt| rt.id() == id) else {
            return Ok(false);
        };
        let runtime = self.runtimes.remove(index);
        self.run_removed(&runtime, env)?;
        Ok(true)
    }

    fn run_removed(
        &mut self,
        runtime: &EffectRuntime,
        env: &mut EffectEnv<'_>,
    ) -> Result<(), EffectError> {
        tracing::debug!(target: "ryft::effect", effect = %runtime.id(), "effect removed");
        let behavior = self.resolve_behavior(runtime.def(), env.context())?;
        let mut scope = EffectScope {
            owner: &mut *env.owner,
            ledger: &mut self.ledger,
            tracker: env.tracker,
            rng: &mut *env.rng,
            pending_draws: &mut self.pending_draws,
            turn: env.turn,
        };
        behavior.get().on_removed(runtime, &mut scope)
    }

    // ========================================================================
    // Reactions
    // ========================================================================

    /// Lets every runtime listening for the event's trigger react, in registration order.
    ///
    /// Behavior errors are logged and do not stop later runtimes. Returns the
    /// ids of the effects that procced.
    pub fn react(&mut self, event: &CombatEventContext, env: &mut EffectEnv<'_>) -> Vec<EffectId> {
        if !event.concerns(self.owner) {
            return Vec::new();
        }

        let mut procs = Vec::new();
        for index in 0..self.runtimes.len() {
            if self.runtimes[index].def().trigger != Some(event.trigger) {
                continue;
            }
            if !self.runtimes[index].should_proc(&mut *env.rng) {
                continue;
            }

            let behavior = match self.resolve_behavior(self.runtimes[index].def(), env.context()) {
                Ok(behavior) => behavior,
                Err(err) => {
                    tracing::warn!(target: "ryft::effect", error = %err, "skipping proc");
                    continue;
                }
            };

            let Self {
                runtimes,
                ledger,
                pending_draws,
                ..
            } = self;
            let runtime = &runtimes[index];
            let mut scope = EffectScope {
                owner: &mut *env.owner,
                ledger,
                tracker: env.tracker,
                rng: &mut *env.rng,
                pending_draws,
                turn: env.turn,
            };
            match behavior.get().on_proc(runtime, event, &mut scope) {
                Ok(()) => {
                    tracing::debug!(
                        target: "ryft::effect",
                        effect = %runtime.id(),
                        trigger = %event.trigger,
                        stacks = runtime.stacks(),
                        "effect proc"
                    );
                    procs.push(runtime.id().clone());
                }
                Err(err) => {
                    tracing::warn!(target: "ryft::effect", effect = %runtime.id(), error = %err, "effect proc failed");
                }
            }
        }
        procs
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Per-turn tick: cooldowns and durations decrement, expired runtimes are removed.
    pub fn tick_turn(&mut self, env: &mut EffectEnv<'_>) -> Vec<EffectId> {
        let mut expired = Vec::new();
        let mut index = 0;
        while index < self.runtimes.len() {
            if self.runtimes[index].tick_turn() {
                let runtime = self.runtimes.remove(index);
                if let Err(err) = self.run_removed(&runtime, env) {
                    tracing::warn!(target: "ryft::effect", error = %err, "expiry revert failed");
                }
                expired.push(runtime.id().clone());
            } else {
                index += 1;
            }
        }
        self.ledger.reset_turn();
        expired
    }

    /// BattleEnd teardown. Only permanent runtimes and persistent credits survive.
    pub fn end_battle(&mut self, env: &mut EffectEnv<'_>) {
        let (kept, dropped): (Vec<_>, Vec<_>) = core::mem::take(&mut self.runtimes)
            .into_iter()
            .partition(|rt| rt.def().is_permanent());
        self.runtimes = kept;
        for runtime in dropped.iter().rev() {
            if let Err(err) = self.run_removed(runtime, env) {
                tracing::warn!(target: "ryft::effect", error = %err, "battle-end revert failed");
            }
        }
        self.ledger.reset_battle();
        self.pending_draws = 0;
    }

    // ========================================================================
    // Cost economy
    // ========================================================================

    pub fn compute_cost(&mut self, base: u32, field: ResourceKind, rng: &mut dyn RngSource) -> u32 {
        self.ledger.compute_cost(base, field, rng)
    }

    pub fn quote_cost(&self, base: u32, field: ResourceKind) -> u32 {
        self.ledger.quote_cost(base, field)
    }

    pub fn record_last_payment(&mut self, field: ResourceKind, amount: u32) {
        self.ledger.record_last_payment(field, amount);
    }

    pub fn apply_outgoing_damage_modifiers(&mut self, base: u32) -> u32 {
        self.ledger.apply_outgoing_damage_modifiers(base)
    }
}

impl core::fmt::Debug for EffectManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectManager")
            .field("owner", &self.owner)
            .field("runtimes", &self.runtimes)
            .field("ledger", &self.ledger)
            .field("behaviors", &self.behaviors.keys().collect::<Vec<_>>())
            .field("pending_draws", &self.pending_draws)
            .finish()
    }
}
