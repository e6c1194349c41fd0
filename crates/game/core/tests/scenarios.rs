mod common;

use common::{GRUNT, duel, health, started};
use ryft_core::card::Scaling;
use ryft_core::{
    Actor, ActorId, CardAction, CardDef, CardId, Duration, EffectColor, EffectDef, EffectId,
    EffectOp, Lifetime, Polarity, ResourceKind, StatKind, StaticCatalog, StatusGrant, StatusKind,
    StatusRecipient, Targeting,
};

#[test]
fn ryft_outcome_grants_permanent_max_health_and_heals() {
    let vigor = EffectDef::builtin(
        "vigor",
        EffectColor::Green,
        Polarity::Positive,
        EffectOp::PermanentStat {
            stat: StatKind::MaxHealth,
        },
    )
    .with_lifetime(Lifetime::Permanent, 0)
    .with_int(5);
    let catalog = StaticCatalog::from_parts([vigor], []).unwrap();
    let mut battle = started(catalog, duel());
    battle.actor_mut(ActorId::PLAYER).unwrap().set_health(30);

    let id = battle
        .resolve_ryft(EffectColor::Green, Polarity::Positive)
        .unwrap();

    assert_eq!(id, EffectId::new("vigor"));
    let hero = battle.player().unwrap();
    assert_eq!(hero.permanent_bonus().max_health, 5);
    assert_eq!(hero.max_health(), 45);
    assert_eq!(hero.health(), 35);
}

#[test]
fn banked_credits_cover_the_whole_cost() {
    let overclock = CardDef::new(
        "overclock",
        2,
        ResourceKind::Energy,
        Targeting::None,
        CardAction::Utility,
    );
    let catalog = StaticCatalog::from_parts([], [overclock]).unwrap();
    let mut battle = started(catalog, duel());
    battle
        .actor_mut(ActorId::PLAYER)
        .unwrap()
        .spend(ResourceKind::Energy, 2);
    battle.effects_mut().ledger_mut().grant_credits(2, false);

    let outcome = battle
        .execute_card(ActorId::PLAYER, &CardId::new("overclock"), None)
        .unwrap();

    assert_eq!(outcome.paid, 0);
    assert_eq!(battle.effects().ledger().credits(), 0);
    assert_eq!(battle.player().unwrap().pool(ResourceKind::Energy), 1);
}

#[test]
fn stun_card_damages_then_stun_lasts_one_tick() {
    let bash = CardDef::new(
        "bash",
        1,
        ResourceKind::Strength,
        Targeting::SingleEnemy,
        CardAction::Damage,
    )
    .with_power(3)
    .with_scaling(Scaling {
        stat: StatKind::Strength,
        factor: 0.5,
    })
    .with_status(StatusGrant::new(
        StatusKind::Stun,
        Duration::Turns(1),
        StatusRecipient::Target,
    ));
    let catalog = StaticCatalog::from_parts([], [bash]).unwrap();
    let mut battle = started(catalog, duel());

    let outcome = battle
        .execute_card(ActorId::PLAYER, &CardId::new("bash"), Some(GRUNT))
        .unwrap();

    // 3 + 4 * 0.5
    assert_eq!(outcome.total_damage(), 5);
    assert_eq!(health(&battle, GRUNT), 15);
    assert!(battle.actor(GRUNT).unwrap().has_status(StatusKind::Stun));

    battle
        .actor_mut(GRUNT)
        .unwrap()
        .statuses_mut()
        .tick_all();
    assert!(!battle.actor(GRUNT).unwrap().has_status(StatusKind::Stun));
}

#[test]
fn stunned_enemy_loses_its_next_turn() {
    let bash = CardDef::new(
        "bash",
        1,
        ResourceKind::Strength,
        Targeting::SingleEnemy,
        CardAction::Damage,
    )
    .with_power(2)
    .with_status(StatusGrant::new(
        StatusKind::Stun,
        Duration::Turns(1),
        StatusRecipient::Target,
    ));
    let claw = common::slash(4);
    let catalog = StaticCatalog::from_parts([], [bash, claw]).unwrap();
    let mut battle = started(catalog, duel());

    battle
        .execute_card(ActorId::PLAYER, &CardId::new("bash"), Some(GRUNT))
        .unwrap();
    battle.end_turn().unwrap();

    // Expired at turn start, but the turn is still lost.
    assert!(!battle.actor(GRUNT).unwrap().has_status(StatusKind::Stun));
    assert!(battle.is_stunned(GRUNT));

    let played = battle
        .run_enemy_turn(|_, _| Some(CardId::new("slash")))
        .unwrap();
    assert_eq!(played, 0);
    assert_eq!(health(&battle, ActorId::PLAYER), 40);
    assert!(!battle.is_stunned(GRUNT));
}

#[test]
fn restacking_refreshes_duration_to_full() {
    let haste = EffectDef::builtin(
        "haste",
        EffectColor::Blue,
        Polarity::Positive,
        EffectOp::DrawCards,
    )
    .with_lifetime(Lifetime::DurationTurns, 2)
    .with_max_stacks(3);
    let catalog = StaticCatalog::from_parts([haste], []).unwrap();
    let mut battle = started(catalog, duel());
    let id = EffectId::new("haste");

    battle.add_effect(&id, 1).unwrap();
    battle.end_turn().unwrap();
    battle.end_turn().unwrap();
    assert_eq!(
        battle.effects().runtime(&id).unwrap().turns_remaining(),
        Some(1)
    );

    battle.add_effect(&id, 1).unwrap();
    let runtime = battle.effects().runtime(&id).unwrap();
    assert_eq!(runtime.stacks(), 2);
    assert_eq!(runtime.turns_remaining(), Some(2));
}
