mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{duel, started};
use ryft_core::{
    ActorId, BattleConfig, CombatEventContext, EffectColor, EffectDef, EffectId, EffectOp,
    FnSubscriber, Lifetime, Polarity, StaticCatalog, Subscriber, SubscriberError, SubscriptionId,
    SubscriptionScope, Trigger,
};

fn counter(hits: &Rc<Cell<u32>>) -> Rc<dyn Subscriber> {
    let hits = Rc::clone(hits);
    Rc::new(FnSubscriber::new("counter", move |_, _| {
        hits.set(hits.get() + 1);
        Ok(())
    }))
}

#[test]
fn nested_publish_stops_at_depth_limit() {
    let config = BattleConfig::default().with_max_dispatch_depth(3);
    let mut battle = common::battle_with(config, StaticCatalog::new(), duel());
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    battle.subscribe(
        Trigger::AbilityUsed,
        SubscriptionScope::Battle,
        Rc::new(FnSubscriber::new("echo", move |event, battle| {
            seen.set(seen.get() + 1);
            battle.publish(event.clone());
            Ok(())
        })),
    );

    battle.publish(CombatEventContext::new(Trigger::AbilityUsed));

    assert_eq!(calls.get(), 3);
    assert_eq!(battle.dropped_dispatches(), 1);
}

#[test]
fn failing_subscriber_does_not_stop_dispatch() {
    let mut battle = started(StaticCatalog::new(), duel());
    let hits = Rc::new(Cell::new(0));
    battle.subscribe(
        Trigger::DamageTaken,
        SubscriptionScope::Battle,
        Rc::new(FnSubscriber::new("broken", |_, _| {
            Err(SubscriberError::failed("broken", "always fails"))
        })),
    );
    battle.subscribe(Trigger::DamageTaken, SubscriptionScope::Battle, counter(&hits));

    battle.publish(CombatEventContext::new(Trigger::DamageTaken));
    battle.publish(CombatEventContext::new(Trigger::DamageTaken));

    assert_eq!(hits.get(), 2);
}

#[test]
fn subscribers_added_during_dispatch_wait_for_next_event() {
    let mut battle = started(StaticCatalog::new(), duel());
    let late_hits = Rc::new(Cell::new(0));
    let late = counter(&late_hits);
    let armed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&armed);
    battle.subscribe(
        Trigger::AbilityResolved,
        SubscriptionScope::Battle,
        Rc::new(FnSubscriber::new("recruiter", move |_, battle| {
            if !flag.replace(true) {
                battle.subscribe(
                    Trigger::AbilityResolved,
                    SubscriptionScope::Battle,
                    Rc::clone(&late),
                );
            }
            Ok(())
        })),
    );

    battle.publish(CombatEventContext::new(Trigger::AbilityResolved));
    assert_eq!(late_hits.get(), 0);

    battle.publish(CombatEventContext::new(Trigger::AbilityResolved));
    assert_eq!(late_hits.get(), 1);
}

#[test]
fn handler_removed_mid_dispatch_still_gets_that_event() {
    let mut battle = started(StaticCatalog::new(), duel());
    let doomed: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
    let slot = Rc::clone(&doomed);
    battle.subscribe(
        Trigger::DamageDealt,
        SubscriptionScope::Battle,
        Rc::new(FnSubscriber::new("remover", move |_, battle| {
            if let Some(id) = slot.take() {
                battle.unsubscribe(id);
            }
            Ok(())
        })),
    );
    let hits = Rc::new(Cell::new(0));
    let id = battle.subscribe(Trigger::DamageDealt, SubscriptionScope::Battle, counter(&hits));
    doomed.set(Some(id));

    battle.publish(CombatEventContext::new(Trigger::DamageDealt));
    assert_eq!(hits.get(), 1);

    battle.publish(CombatEventContext::new(Trigger::DamageDealt));
    assert_eq!(hits.get(), 1);
}

#[test]
fn unsubscribed_handler_no_longer_runs() {
    let mut battle = started(StaticCatalog::new(), duel());
    let hits = Rc::new(Cell::new(0));
    let id = battle.subscribe(Trigger::TurnEnd, SubscriptionScope::Battle, counter(&hits));

    battle.end_turn().unwrap();
    assert!(battle.unsubscribe(id));
    battle.end_turn().unwrap();

    assert_eq!(hits.get(), 1);
    assert!(!battle.unsubscribe(id));
}

#[test]
fn battle_end_drops_battle_scoped_subscriptions() {
    let mut battle = started(StaticCatalog::new(), duel());
    let battle_hits = Rc::new(Cell::new(0));
    let session_hits = Rc::new(Cell::new(0));
    battle.subscribe(Trigger::BattleEnd, SubscriptionScope::Battle, counter(&battle_hits));
    battle.subscribe(
        Trigger::BattleEnd,
        SubscriptionScope::Session,
        counter(&session_hits),
    );

    battle.end().unwrap();

    // Both saw the BattleEnd that tore them down.
    assert_eq!(battle_hits.get(), 1);
    assert_eq!(session_hits.get(), 1);
    assert_eq!(battle.bus().len(), 1);
}

#[test]
fn effects_react_before_subscribers() {
    let bank = EffectDef::builtin(
        "bank",
        EffectColor::Purple,
        Polarity::Positive,
        EffectOp::GrantCredits,
    )
    .with_trigger(Trigger::AbilityUsed)
    .with_int(1);
    let catalog = StaticCatalog::from_parts([bank], []).unwrap();
    let mut battle = started(catalog, duel());
    battle.add_effect(&EffectId::new("bank"), 1).unwrap();

    let observed = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&observed);
    battle.subscribe(
        Trigger::AbilityUsed,
        SubscriptionScope::Battle,
        Rc::new(FnSubscriber::new("observer", move |_, battle| {
            log.borrow_mut().push(battle.effects().ledger().credits());
            Ok(())
        })),
    );

    battle.publish(CombatEventContext::new(Trigger::AbilityUsed).with_source(ActorId::PLAYER));

    assert_eq!(*observed.borrow(), vec![1]);
    assert_eq!(battle.tracker().last_effect(), Some(&EffectId::new("bank")));
}

#[test]
fn permanent_effects_survive_battle_end() {
    let vault = EffectDef::builtin(
        "vault",
        EffectColor::Purple,
        Polarity::Positive,
        EffectOp::GrantCredits,
    )
    .with_trigger(Trigger::TurnStart)
    .with_lifetime(Lifetime::Permanent, 0)
    .with_int(2);
    let spark = EffectDef::builtin(
        "spark",
        EffectColor::Red,
        Polarity::Positive,
        EffectOp::DrawCards,
    );
    let catalog = StaticCatalog::from_parts([vault, spark], []).unwrap();
    let mut battle = started(catalog, duel());
    battle.add_effect(&EffectId::new("vault"), 1).unwrap();
    battle.add_effect(&EffectId::new("spark"), 1).unwrap();
    battle.end_turn().unwrap();
    battle.end_turn().unwrap();
    assert_eq!(battle.effects().ledger().credits(), 2);

    battle.end().unwrap();

    assert_eq!(battle.effects().stacks(&EffectId::new("vault")), 1);
    assert_eq!(battle.effects().stacks(&EffectId::new("spark")), 0);
    assert_eq!(battle.effects().ledger().persistent_credits(), 2);
    assert_eq!(battle.effects().ledger().credits(), 2);
}
