#![allow(dead_code)]

use std::rc::Rc;

use ryft_core::{
    ActorId, Battle, BattleConfig, CardAction, CardDef, Combatant, ResourceKind, Roster,
    SequenceRng, StatBlock, StaticCatalog, Targeting,
};

pub const GRUNT: ActorId = ActorId(1);
pub const BRUTE: ActorId = ActorId(2);

/// Strength 4, mana 3, engineering 2, energy 3, 40 health.
pub fn hero() -> Combatant {
    Combatant::player("hero", StatBlock::new(4, 3, 2, 3, 40, 0))
}

pub fn grunt() -> Combatant {
    Combatant::enemy(GRUNT.0, "grunt", StatBlock::new(3, 0, 0, 2, 20, 0))
}

pub fn brute() -> Combatant {
    Combatant::enemy(BRUTE.0, "brute", StatBlock::new(6, 0, 0, 2, 30, 0))
}

pub fn duel() -> Roster {
    Roster::new(hero()).with_enemy(grunt())
}

pub fn skirmish() -> Roster {
    Roster::new(hero()).with_enemy(grunt()).with_enemy(brute())
}

pub fn slash(power: i32) -> CardDef {
    CardDef::new(
        "slash",
        1,
        ResourceKind::Strength,
        Targeting::SingleEnemy,
        CardAction::Damage,
    )
    .with_power(power)
}

/// Battle with rolls pinned to 0 so every proc and refund check passes.
pub fn battle(catalog: StaticCatalog, roster: Roster) -> Battle {
    battle_with(BattleConfig::default(), catalog, roster)
}

pub fn battle_with(config: BattleConfig, catalog: StaticCatalog, roster: Roster) -> Battle {
    Battle::with_rng(
        config,
        Rc::new(catalog),
        roster,
        Box::new(SequenceRng::constant(0)),
    )
}

pub fn started(catalog: StaticCatalog, roster: Roster) -> Battle {
    let mut battle = battle(catalog, roster);
    battle.start().expect("battle starts");
    battle
}

pub fn health(battle: &Battle, id: ActorId) -> u32 {
    use ryft_core::Actor;
    battle.actor(id).expect("actor in roster").health()
}
