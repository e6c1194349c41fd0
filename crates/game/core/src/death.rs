//! One-shot death prevention.
//!
//! Cards register wards per actor. When a hit would kill the actor, the first
//! unused ward in registration order fires, restores health and is spent for
//! the rest of the battle.

use std::collections::HashMap;

use strum::Display;

use crate::actor::{Actor, ActorId};

/// Health a ward restores when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathPreventionKind {
    SurviveAtOne,
    RestoreHalf,
    RestoreFull,
}

impl DeathPreventionKind {
    pub fn restored_health(self, max_health: u32) -> u32 {
        match self {
            Self::SurviveAtOne => 1,
            Self::RestoreHalf => (max_health / 2).max(1),
            Self::RestoreFull => max_health.max(1),
        }
    }
}

/// Secondary effect run when a ward fires.
pub type DeathPreventionCallback = Box<dyn FnMut(&mut dyn Actor)>;

pub struct DeathPrevention {
    pub kind: DeathPreventionKind,
    pub source: String,
    used: bool,
    on_trigger: Option<DeathPreventionCallback>,
}

impl DeathPrevention {
    pub fn new(kind: DeathPreventionKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            used: false,
            on_trigger: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnMut(&mut dyn Actor) + 'static) -> Self {
        self.on_trigger = Some(Box::new(callback));
        self
    }

    pub fn is_used(&self) -> bool {
        self.used
    }
}

impl core::fmt::Debug for DeathPrevention {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeathPrevention")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("used", &self.used)
            .field("on_trigger", &self.on_trigger.is_some())
            .finish()
    }
}

/// Ordered wards per actor.
#[derive(Debug, Default)]
pub struct DeathPreventionRegistry {
    entries: HashMap<ActorId, Vec<DeathPrevention>>,
}

impl DeathPreventionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, actor: ActorId, ward: DeathPrevention) {
        tracing::debug!(
            target: "ryft::battle",
            %actor,
            kind = %ward.kind,
            source = %ward.source,
            "death ward registered"
        );
        self.entries.entry(actor).or_default().push(ward);
    }

    /// Fires the first unused ward if `current_health` is lethal.
    ///
    /// Returns the restored health, or `None` when the actor is still alive
    /// or has no unused ward left.
    pub fn try_prevent_death(&mut self, actor: &mut dyn Actor, current_health: u32) -> Option<u32> {
        if current_health > 0 {
            return None;
        }
        let ward = self
            .entries
            .get_mut(&actor.id())?
            .iter_mut()
            .find(|w| !w.used)?;
        ward.used = true;

        let restored = ward.kind.restored_health(actor.max_health());
        actor.set_health(restored);
        if let Some(callback) = ward.on_trigger.as_mut() {
            callback(actor);
        }
        tracing::info!(
            target: "ryft::battle",
            actor = %actor.id(),
            kind = %ward.kind,
            source = %ward.source,
            health = actor.health(),
            "death prevented"
        );
        Some(actor.health())
    }

    /// Unused wards left for `actor`.
    pub fn remaining(&self, actor: ActorId) -> usize {
        self.entries
            .get(&actor)
            .map_or(0, |wards| wards.iter().filter(|w| !w.used).count())
    }

    pub fn clear_actor(&mut self, actor: ActorId) {
        self.entries.remove(&actor);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
