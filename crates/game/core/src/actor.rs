//! Combatants and the roster that owns them.
//!
//! [`Actor`] is the narrow read/write surface the rules need (health, stats,
//! alive). [`Combatant`] is the concrete implementation used by the battle; it
//! also owns the resource pools cards are paid from and the status table.

use core::fmt;

use crate::stats::{PerResource, ResourceKind, StatBlock, StatLayer, StatLayers};
use crate::status::{StatusEffectTable, StatusKind};

/// Unique identifier for a combatant within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    /// Reserved identifier for the player.
    pub const PLAYER: Self = Self(0);

    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_player() {
            f.write_str("player")
        } else {
            write!(f, "actor#{}", self.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

/// Read/write surface consumed by damage, healing and death prevention.
pub trait Actor {
    fn id(&self) -> ActorId;

    fn health(&self) -> u32;

    /// Sum of every stat layer.
    fn total_stats(&self) -> StatBlock;

    fn max_health(&self) -> u32 {
        self.total_stats().max_health.max(0) as u32
    }

    fn is_alive(&self) -> bool {
        self.health() > 0
    }

    /// Removes up to `amount` health. Returns the amount actually removed.
    fn apply_damage(&mut self, amount: u32) -> u32;

    /// Restores up to `amount` health, capped at max health. Returns the amount restored.
    fn heal(&mut self, amount: u32) -> u32;

    /// Adds `delta` to one stat layer.
    ///
    /// A max-health gain also heals by the same amount. Pool stats top up the
    /// matching resource pool; `allow_exceed_cap` lets the pool exceed the new
    /// stat value.
    fn gain_stats(&mut self, delta: &StatBlock, layer: StatLayer, allow_exceed_cap: bool);

    /// Sets health directly, clamped to max health.
    fn set_health(&mut self, health: u32);
}

/// A participant in a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: ActorId,
    pub name: String,
    pub side: Side,
    pub stats: StatLayers,
    health: u32,
    pools: PerResource<u32>,
    statuses: StatusEffectTable,
}

impl Combatant {
    /// Creates a combatant at full health with full pools.
    pub fn new(id: ActorId, name: impl Into<String>, side: Side, base: StatBlock) -> Self {
        let mut combatant = Self {
            id,
            name: name.into(),
            side,
            stats: StatLayers::new(base),
            health: 0,
            pools: PerResource::default(),
            statuses: StatusEffectTable::new(),
        };
        combatant.health = combatant.max_health();
        combatant.refill_pools();
        combatant
    }

    pub fn player(name: impl Into<String>, base: StatBlock) -> Self {
        Self::new(ActorId::PLAYER, name, Side::Player, base)
    }

    pub fn enemy(id: u32, name: impl Into<String>, base: StatBlock) -> Self {
        Self::new(ActorId(id), name, Side::Enemy, base)
    }

    /// Overrides the starting health (builder pattern).
    pub fn with_health(mut self, health: u32) -> Self {
        self.set_health(health);
        self
    }

    // ========================================================================
    // Resource pools
    // ========================================================================

    pub fn pool(&self, kind: ResourceKind) -> u32 {
        self.pools[kind]
    }

    /// Current stat value capping the pool.
    pub fn pool_cap(&self, kind: ResourceKind) -> u32 {
        self.total_stats().get(kind.stat()).max(0) as u32
    }

    pub fn can_afford(&self, kind: ResourceKind, amount: u32) -> bool {
        self.pools[kind] >= amount
    }

    /// Debits a pool. Returns false and leaves the pool untouched if it holds less than `amount`.
    pub fn spend(&mut self, kind: ResourceKind, amount: u32) -> bool {
        if !self.can_afford(kind, amount) {
            return false;
        }
        self.pools[kind] -= amount;
        true
    }

    /// Credits a pool without checking the cap.
    pub fn restore_resource(&mut self, kind: ResourceKind, amount: u32) {
        self.pools[kind] = self.pools[kind].saturating_add(amount);
    }

    /// Raises every pool to its cap. Pools already above their cap are kept.
    pub fn refill_pools(&mut self) {
        for kind in [
            ResourceKind::Strength,
            ResourceKind::Mana,
            ResourceKind::Engineering,
            ResourceKind::Energy,
        ] {
            let cap = self.pool_cap(kind);
            self.pools[kind] = self.pools[kind].max(cap);
        }
    }

    // ========================================================================
    // Statuses
    // ========================================================================

    pub fn statuses(&self) -> &StatusEffectTable {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut StatusEffectTable {
        &mut self.statuses
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.has(kind)
    }

    // ========================================================================
    // Session boundary
    // ========================================================================

    /// Permanent bonus layer, persisted by the session between battles.
    pub fn permanent_bonus(&self) -> StatBlock {
        self.stats.bonus
    }

    pub fn set_permanent_bonus(&mut self, bonus: StatBlock) {
        self.stats.bonus = bonus;
        self.clamp_to_caps();
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Clears the turn stat layer.
    pub fn end_turn(&mut self) {
        self.stats.clear_turn();
        self.clamp_to_caps();
    }

    /// Clears every battle-scoped layer and all statuses.
    pub fn end_battle(&mut self) {
        self.stats.clear_turn();
        self.stats.clear_temp();
        self.statuses.clear();
        self.clamp_to_caps();
    }

    fn clamp_to_caps(&mut self) {
        let max = self.max_health();
        if self.health > max {
            self.health = max;
        }
        for kind in [
            ResourceKind::Strength,
            ResourceKind::Mana,
            ResourceKind::Engineering,
            ResourceKind::Energy,
        ] {
            let cap = self.pool_cap(kind);
            if self.pools[kind] > cap {
                self.pools[kind] = cap;
            }
        }
    }
}

impl Actor for Combatant {
    fn id(&self) -> ActorId {
        self.id
    }

    fn health(&self) -> u32 {
        self.health
    }

    fn total_stats(&self) -> StatBlock {
        self.stats.current()
    }

    fn apply_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let max = self.max_health();
        let healed = amount.min(max.saturating_sub(self.health));
        self.health += healed;
        healed
    }

    fn gain_stats(&mut self, delta: &StatBlock, layer: StatLayer, allow_exceed_cap: bool) {
        *self.stats.layer_mut(layer) += *delta;

        if delta.max_health > 0 {
            self.heal(delta.max_health as u32);
        } else if self.health > self.max_health() {
            self.health = self.max_health();
        }

        for kind in [
            ResourceKind::Strength,
            ResourceKind::Mana,
            ResourceKind::Engineering,
            ResourceKind::Energy,
        ] {
            let gained = delta.get(kind.stat());
            let cap = self.pool_cap(kind);
            if gained > 0 {
                let topped = self.pools[kind].saturating_add(gained as u32);
                self.pools[kind] = if allow_exceed_cap {
                    topped
                } else {
                    topped.min(cap.max(self.pools[kind]))
                };
            } else if gained < 0 && self.pools[kind] > cap {
                self.pools[kind] = cap;
            }
        }
    }

    fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health());
    }
}

/// Every combatant in the battle, player first.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    members: Vec<Combatant>,
}

impl Roster {
    pub fn new(player: Combatant) -> Self {
        Self {
            members: vec![player],
        }
    }

    /// Adds an enemy (builder pattern).
    pub fn with_enemy(mut self, enemy: Combatant) -> Self {
        self.push(enemy);
        self
    }

    /// Adds a combatant. A duplicate id replaces the existing entry.
    pub fn push(&mut self, combatant: Combatant) {
        if let Some(existing) = self.actor_mut(combatant.id) {
            *existing = combatant;
        } else {
            self.members.push(combatant);
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Combatant> {
        self.members.iter().find(|c| c.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Combatant> {
        self.members.iter_mut().find(|c| c.id == id)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.members.iter().find(|c| c.side == Side::Player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Combatant> {
        self.members.iter_mut().find(|c| c.side == Side::Player)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.members.iter_mut()
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.members.iter().filter(move |c| c.side == side)
    }

    /// Alive combatants opposing `side`, in roster order.
    pub fn alive_opponents(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.members
            .iter()
            .filter(move |c| c.side != side && c.is_alive())
    }

    pub fn first_alive_opponent(&self, side: Side) -> Option<ActorId> {
        self.alive_opponents(side).next().map(|c| c.id)
    }

    /// Alive opponent holding `Taunt`, if any.
    pub fn taunting_opponent(&self, side: Side) -> Option<ActorId> {
        self.alive_opponents(side)
            .find(|c| c.has_status(StatusKind::Taunt))
            .map(|c| c.id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKind;

    fn hero() -> Combatant {
        Combatant::player("hero", StatBlock::new(4, 3, 2, 3, 40, 1))
    }

    #[test]
    fn new_combatant_starts_full() {
        let hero = hero();
        assert_eq!(hero.health(), 40);
        assert_eq!(hero.pool(ResourceKind::Energy), 3);
        assert_eq!(hero.pool(ResourceKind::Strength), 4);
        assert!(hero.is_alive());
    }

    #[test]
    fn damage_and_heal_are_clamped() {
        let mut hero = hero().with_health(10);
        assert_eq!(hero.apply_damage(15), 10);
        assert!(!hero.is_alive());
        assert_eq!(hero.heal(5), 0);

        hero.set_health(38);
        assert_eq!(hero.heal(5), 2);
        assert_eq!(hero.health(), 40);
    }

    #[test]
    fn max_health_gain_heals_immediately() {
        let mut hero = hero().with_health(30);
        hero.gain_stats(&StatBlock::single(StatKind::MaxHealth, 5), StatLayer::Bonus, false);
        assert_eq!(hero.max_health(), 45);
        assert_eq!(hero.health(), 35);
        assert_eq!(hero.permanent_bonus().max_health, 5);
    }

    #[test]
    fn pool_gain_respects_cap_unless_allowed() {
        let mut hero = hero();
        hero.spend(ResourceKind::Energy, 3);
        hero.gain_stats(&StatBlock::single(StatKind::Energy, 2), StatLayer::Turn, false);
        assert_eq!(hero.pool(ResourceKind::Energy), 2);

        hero.gain_stats(&StatBlock::single(StatKind::Energy, 4), StatLayer::Turn, false);
        assert_eq!(hero.pool(ResourceKind::Energy), 6);

        let mut capped = self::hero();
        capped.gain_stats(&StatBlock::single(StatKind::Mana, 2), StatLayer::Temp, false);
        assert_eq!(capped.pool(ResourceKind::Mana), 5);

        let mut uncapped = self::hero();
        uncapped.gain_stats(&StatBlock::single(StatKind::Mana, 2), StatLayer::Turn, true);
        uncapped.end_turn();
        assert_eq!(uncapped.pool(ResourceKind::Mana), 3);
    }

    #[test]
    fn spend_rejects_overdraw() {
        let mut hero = hero();
        assert!(!hero.spend(ResourceKind::Engineering, 3));
        assert_eq!(hero.pool(ResourceKind::Engineering), 2);
        assert!(hero.spend(ResourceKind::Engineering, 2));
        assert_eq!(hero.pool(ResourceKind::Engineering), 0);
    }

    #[test]
    fn end_battle_drops_temp_but_keeps_bonus() {
        let mut hero = hero();
        hero.gain_stats(&StatBlock::single(StatKind::Strength, 2), StatLayer::Temp, false);
        hero.gain_stats(&StatBlock::single(StatKind::Strength, 1), StatLayer::Bonus, false);
        assert_eq!(hero.total_stats().strength, 7);

        hero.end_battle();
        assert_eq!(hero.total_stats().strength, 5);
        assert!(hero.pool(ResourceKind::Strength) <= 5);
    }

    #[test]
    fn roster_finds_taunter_among_alive_enemies() {
        use crate::status::{Duration, StatusEffect};

        let mut taunter = Combatant::enemy(2, "brute", StatBlock::new(2, 0, 0, 0, 20, 0));
        taunter
            .statuses_mut()
            .add(StatusEffect::new(StatusKind::Taunt, Duration::Turns(2)));
        let roster = Roster::new(hero())
            .with_enemy(Combatant::enemy(1, "grunt", StatBlock::new(1, 0, 0, 0, 10, 0)))
            .with_enemy(taunter);

        assert_eq!(roster.first_alive_opponent(Side::Player), Some(ActorId(1)));
        assert_eq!(roster.taunting_opponent(Side::Player), Some(ActorId(2)));
        assert_eq!(roster.first_alive_opponent(Side::Enemy), Some(ActorId::PLAYER));
    }
}
