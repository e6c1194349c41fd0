//! Ryft effects - the reactive effect engine and the resource-cost economy.
//!
//! # Architecture
//!
//! ```text
//! EffectDef (catalog, immutable)
//!     │ add_effect / on_ryft_outcome
//!     ▼
//! EffectRuntime (stacks, duration, delay, cooldown) ── should_proc ──▶ EffectBehavior
//!     │                                                                   │
//!     └──────────────── EffectManager ◀── CostLedger ◀────────────────────┘
//! ```
//!
//! The manager reacts to published combat events for its owner, ticks at the
//! owner's turn end and tears down battle-scoped state at BattleEnd.

mod behavior;
mod def;
mod error;
mod ledger;
mod manager;
mod runtime;

pub use behavior::{EffectBehavior, EffectScope};
pub use def::{
    EffectBehaviorRef, EffectColor, EffectDef, EffectId, EffectOp, EffectTags, Lifetime, Polarity,
};
pub use error::EffectError;
pub use ledger::{CostLedger, Payment};
pub use manager::{EffectEnv, EffectManager};
pub use runtime::{EffectPhase, EffectRuntime};

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::actor::{Actor, ActorId, Combatant};
    use crate::events::{CombatEventContext, Trigger};
    use crate::rng::SequenceRng;
    use crate::stats::{ResourceKind, StatBlock, StatKind};
    use crate::tracker::CombatEventTracker;

    struct Fixture {
        owner: Combatant,
        tracker: CombatEventTracker,
        rng: SequenceRng,
        manager: EffectManager,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                owner: Combatant::player("hero", StatBlock::new(4, 3, 2, 3, 40, 1)),
                tracker: CombatEventTracker::new(ActorId::PLAYER),
                rng: SequenceRng::constant(0),
                manager: EffectManager::new(ActorId::PLAYER, 2.0),
            }
        }

        fn add(&mut self, def: &Rc<EffectDef>, count: u32) -> Result<u32, EffectError> {
            let mut env = EffectEnv {
                owner: &mut self.owner,
                tracker: &self.tracker,
                rng: &mut self.rng,
                turn: 1,
            };
            self.manager.add_effect(Rc::clone(def), count, &mut env)
        }

        fn react(&mut self, event: CombatEventContext) -> Vec<EffectId> {
            let mut env = EffectEnv {
                owner: &mut self.owner,
                tracker: &self.tracker,
                rng: &mut self.rng,
                turn: 1,
            };
            self.manager.react(&event, &mut env)
        }

        fn tick(&mut self) -> Vec<EffectId> {
            let mut env = EffectEnv {
                owner: &mut self.owner,
                tracker: &self.tracker,
                rng: &mut self.rng,
                turn: 1,
            };
            self.manager.tick_turn(&mut env)
        }

        fn end_battle(&mut self) {
            let mut env = EffectEnv {
                owner: &mut self.owner,
                tracker: &self.tracker,
                rng: &mut self.rng,
                turn: 1,
            };
            self.manager.end_battle(&mut env);
        }
    }

    fn turn_start() -> CombatEventContext {
        CombatEventContext::new(Trigger::TurnStart).with_source(ActorId::PLAYER)
    }

    #[test]
    fn permanent_max_health_heals_and_survives_battle_end() {
        let mut fx = Fixture::new();
        fx.owner.set_health(30);
        let vigor = Rc::new(
            EffectDef::builtin(
                "vigor",
                EffectColor::Green,
                Polarity::Positive,
                EffectOp::PermanentStat {
                    stat: StatKind::MaxHealth,
                },
            )
            .with_lifetime(Lifetime::Permanent, 0)
            .with_int(5),
        );

        fx.add(&vigor, 1).unwrap();
        assert_eq!(fx.owner.permanent_bonus().max_health, 5);
        assert_eq!(fx.owner.health(), 35);

        fx.end_battle();
        assert_eq!(fx.manager.stacks(&vigor.id), 1);
        assert_eq!(fx.owner.permanent_bonus().max_health, 5);
    }

    #[test]
    fn battle_stat_reverts_on_expiry() {
        let mut fx = Fixture::new();
        let rage = Rc::new(
            EffectDef::builtin(
                "rage",
                EffectColor::Red,
                Polarity::Positive,
                EffectOp::BattleStat {
                    stat: StatKind::Strength,
                },
            )
            .with_lifetime(Lifetime::DurationTurns, 1)
            .with_max_stacks(3)
            .with_int(2),
        );

        fx.add(&rage, 2).unwrap();
        assert_eq!(fx.owner.total_stats().strength, 8);

        assert_eq!(fx.tick(), vec![rage.id.clone()]);
        assert_eq!(fx.owner.total_stats().strength, 4);
        assert!(fx.manager.runtime(&rage.id).is_none());
    }

    #[test]
    fn reduce_cost_procs_on_its_trigger_only() {
        let mut fx = Fixture::new();
        let focus = Rc::new(
            EffectDef::builtin(
                "focus",
                EffectColor::Blue,
                Polarity::Positive,
                EffectOp::ReduceCost {
                    field: ResourceKind::Mana,
                },
            )
            .with_trigger(Trigger::TurnStart)
            .with_int(1),
        );
        fx.add(&focus, 1).unwrap();

        assert!(fx.react(CombatEventContext::new(Trigger::TurnEnd)).is_empty());
        assert_eq!(fx.react(turn_start()), vec![focus.id.clone()]);
        assert_eq!(fx.manager.quote_cost(3, ResourceKind::Mana), 2);

        fx.tick();
        assert_eq!(fx.manager.quote_cost(3, ResourceKind::Mana), 3);
    }

    #[test]
    fn actions_of_other_actors_are_ignored() {
        let mut fx = Fixture::new();
        let bank = Rc::new(
            EffectDef::builtin("bank", EffectColor::Purple, Polarity::Positive, EffectOp::GrantCredits)
                .with_trigger(Trigger::AbilityUsed)
                .with_int(1),
        );
        fx.add(&bank, 1).unwrap();

        fx.react(CombatEventContext::new(Trigger::AbilityUsed).with_source(ActorId(4)));
        assert_eq!(fx.manager.ledger().credits(), 0);

        fx.react(CombatEventContext::new(Trigger::AbilityUsed).with_source(ActorId::PLAYER));
        assert_eq!(fx.manager.ledger().credits(), 1);
    }

    #[test]
    fn restack_refreshes_duration() {
        let mut fx = Fixture::new();
        let haste = Rc::new(
            EffectDef::builtin("haste", EffectColor::Blue, Polarity::Positive, EffectOp::DrawCards)
                .with_lifetime(Lifetime::DurationTurns, 2)
                .with_max_stacks(3),
        );

        fx.add(&haste, 1).unwrap();
        fx.tick();
        assert_eq!(fx.manager.runtime(&haste.id).unwrap().turns_remaining(), Some(1));

        fx.add(&haste, 1).unwrap();
        let runtime = fx.manager.runtime(&haste.id).unwrap();
        assert_eq!(runtime.stacks(), 2);
        assert_eq!(runtime.turns_remaining(), Some(2));
        assert_eq!(fx.manager.runtimes().len(), 1);
    }

    #[test]
    fn unknown_custom_behavior_is_rejected() {
        let mut fx = Fixture::new();
        let ghost = Rc::new(EffectDef::new(
            "ghost",
            EffectColor::Purple,
            Polarity::Negative,
            EffectBehaviorRef::Custom("haunt".into()),
        ));

        let err = fx.add(&ghost, 1).unwrap_err();
        assert!(matches!(err, EffectError::UnknownBehavior { .. }));
        assert!(fx.manager.runtimes().is_empty());
    }

    #[test]
    fn custom_behavior_runs_through_registry() {
        struct Counter(Rc<Cell<u32>>);

        impl EffectBehavior for Counter {
            fn on_proc(
                &self,
                _runtime: &EffectRuntime,
                _event: &CombatEventContext,
                scope: &mut EffectScope<'_>,
            ) -> Result<(), EffectError> {
                self.0.set(self.0.get() + 1);
                scope.ledger.add_pending_delta(-1);
                Ok(())
            }
        }

        let mut fx = Fixture::new();
        let hits = Rc::new(Cell::new(0));
        fx.manager
            .register_behavior("counter", Rc::new(Counter(Rc::clone(&hits))));
        let def = Rc::new(
            EffectDef::new(
                "count",
                EffectColor::Red,
                Polarity::Neutral,
                EffectBehaviorRef::Custom("counter".into()),
            )
            .with_trigger(Trigger::TurnStart),
        );

        fx.add(&def, 1).unwrap();
        fx.react(turn_start());
        fx.react(turn_start());
        assert_eq!(hits.get(), 2);
        assert_eq!(fx.manager.ledger().pending_delta(), -2);
    }

    #[test]
    fn battle_end_clears_scoped_state() {
        let mut fx = Fixture::new();
        let draw = Rc::new(
            EffectDef::builtin("draw", EffectColor::Blue, Polarity::Positive, EffectOp::DrawCards)
                .with_trigger(Trigger::TurnStart)
                .with_int(2),
        );
        fx.add(&draw, 1).unwrap();
        fx.react(turn_start());
        fx.manager.ledger_mut().add_free_next(ResourceKind::Energy, 1);

        fx.end_battle();
        assert!(fx.manager.runtimes().is_empty());
        assert_eq!(fx.manager.take_pending_draws(), 0);
        assert_eq!(fx.manager.ledger().free_next(ResourceKind::Energy), 0);
    }

    #[test]
    fn unreverted_refund_chance_does_not_outlive_the_battle() {
        struct Lucky;

        impl EffectBehavior for Lucky {
            fn on_added(
                &self,
                _runtime: &EffectRuntime,
                _added: u32,
                scope: &mut EffectScope<'_>,
            ) -> Result<(), EffectError> {
                scope.ledger.add_refund_chance(ResourceKind::Energy, 40, false);
                Ok(())
            }

            fn on_proc(
                &self,
                _runtime: &EffectRuntime,
                _event: &CombatEventContext,
                _scope: &mut EffectScope<'_>,
            ) -> Result<(), EffectError> {
                Ok(())
            }
        }

        let mut fx = Fixture::new();
        fx.manager.register_behavior("lucky", Rc::new(Lucky));
        let lucky = Rc::new(EffectDef::new(
            "lucky",
            EffectColor::Purple,
            Polarity::Positive,
            EffectBehaviorRef::Custom("lucky".into()),
        ));
        let charm = Rc::new(
            EffectDef::builtin(
                "charm",
                EffectColor::Purple,
                Polarity::Positive,
                EffectOp::RefundChance {
                    field: ResourceKind::Energy,
                },
            )
            .with_lifetime(Lifetime::Permanent, 0)
            .with_int(10),
        );

        fx.add(&lucky, 1).unwrap();
        fx.add(&charm, 1).unwrap();
        assert_eq!(fx.manager.ledger().refund_chance(ResourceKind::Energy), 50);

        fx.end_battle();
        assert_eq!(fx.manager.ledger().refund_chance(ResourceKind::Energy), 10);
    }

    #[test]
    fn permanent_readd_ignores_stack_cap() {
        let mut fx = Fixture::new();
        let grit = Rc::new(
            EffectDef::builtin(
                "grit",
                EffectColor::Green,
                Polarity::Positive,
                EffectOp::PermanentStat {
                    stat: StatKind::Defense,
                },
            )
            .with_lifetime(Lifetime::Permanent, 0)
            .with_int(1),
        );

        fx.add(&grit, 1).unwrap();
        fx.add(&grit, 1).unwrap();
        assert_eq!(fx.manager.stacks(&grit.id), 1);
        assert_eq!(fx.owner.permanent_bonus().defense, 2);
    }
}
