//! Deployed gadgets and summons.
//!
//! Gadgets are owned by a combatant, tick once per turn and are destroyed when
//! their duration runs out, when destroyed explicitly, or when their owner dies.
//! Lifecycle changes are queued as [`GadgetEvent`]s for the battle to drain.

use strum::Display;

use crate::actor::ActorId;
use crate::card::CardId;
use crate::status::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GadgetId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GadgetKind {
    Turret,
    ShieldDrone,
    Decoy,
    Drone,
    Summon,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gadget {
    pub id: GadgetId,
    pub kind: GadgetKind,
    pub owner: ActorId,
    pub power: u32,
    pub duration: Duration,
    pub source: Option<CardId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum DestroyReason {
    Expired,
    Destroyed,
    OwnerDefeated,
    BattleEnded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GadgetEvent {
    Deployed(Gadget),
    Destroyed { gadget: Gadget, reason: DestroyReason },
}

#[derive(Debug, Default)]
pub struct GadgetRegistry {
    gadgets: Vec<Gadget>,
    events: Vec<GadgetEvent>,
    next_id: u32,
}

impl GadgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploys a gadget. A `Turns(0)` duration is destroyed immediately.
    pub fn deploy(
        &mut self,
        kind: GadgetKind,
        owner: ActorId,
        power: u32,
        duration: Duration,
        source: Option<CardId>,
    ) -> GadgetId {
        let id = GadgetId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let gadget = Gadget {
            id,
            kind,
            owner,
            power,
            duration,
            source,
        };
        self.events.push(GadgetEvent::Deployed(gadget.clone()));

        if duration.is_expired() {
            self.emit_destroyed(gadget, DestroyReason::Expired);
        } else {
            self.gadgets.push(gadget);
        }
        id
    }

    /// Decrements every finite duration once. Gadgets reaching zero are destroyed.
    pub fn tick_all(&mut self) -> usize {
        let mut expired = Vec::new();
        self.gadgets.retain_mut(|gadget| {
            if gadget.duration.tick() {
                expired.push(gadget.clone());
                false
            } else {
                true
            }
        });
        let count = expired.len();
        for gadget in expired {
            self.emit_destroyed(gadget, DestroyReason::Expired);
        }
        count
    }

    pub fn destroy(&mut self, id: GadgetId) -> bool {
        let Some(index) = self.gadgets.iter().position(|g| g.id == id) else {
            return false;
        };
        let gadget = self.gadgets.remove(index);
        self.emit_destroyed(gadget, DestroyReason::Destroyed);
        true
    }

    /// Destroys every gadget owned by `owner`. Returns how many were removed.
    pub fn destroy_owned_by(&mut self, owner: ActorId) -> usize {
        self.remove_where(|g| g.owner == owner, DestroyReason::OwnerDefeated)
    }

    pub fn get(&self, id: GadgetId) -> Option<&Gadget> {
        self.gadgets.iter().find(|g| g.id == id)
    }

    pub fn by_owner(&self, owner: ActorId) -> impl Iterator<Item = &Gadget> {
        self.gadgets.iter().filter(move |g| g.owner == owner)
    }

    pub fn by_kind(&self, kind: GadgetKind) -> impl Iterator<Item = &Gadget> {
        self.gadgets.iter().filter(move |g| g.kind == kind)
    }

    pub fn count_by_owner(&self, owner: ActorId) -> usize {
        self.by_owner(owner).count()
    }

    pub fn len(&self) -> usize {
        self.gadgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gadgets.is_empty()
    }

    /// Lifecycle events queued since the last drain.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Takes the queued lifecycle events.
    pub fn drain_events(&mut self) -> Vec<GadgetEvent> {
        core::mem::take(&mut self.events)
    }

    /// BattleEnd teardown.
    pub fn clear(&mut self) {
        self.remove_where(|_| true, DestroyReason::BattleEnded);
    }

    fn remove_where(
        &mut self,
        predicate: impl Fn(&Gadget) -> bool,
        reason: DestroyReason,
    ) -> usize {
        let (removed, kept): (Vec<_>, Vec<_>) =
            core::mem::take(&mut self.gadgets).into_iter().partition(|g| predicate(g));
        self.gadgets = kept;
        let count = removed.len();
        for gadget in removed {
            self.emit_destroyed(gadget, reason);
        }
        count
    }

    fn emit_destroyed(&mut self, gadget: Gadget, reason: DestroyReason) {
        self.events.push(GadgetEvent::Destroyed { gadget, reason });
    }
}
