//! Card execution.
//!
//! `execute_card` validates everything before touching state, so a rejected
//! card leaves the battle exactly as it was. Once payment succeeds the card
//! always resolves, even if nothing is left to hit.

use super::{Battle, CardError, Phase};
use crate::actor::{Actor, ActorId, Combatant, Side};
use crate::card::{AoePolicy, CardAction, CardDef, CardId, StatusRecipient, Targeting};
use crate::death::DeathPrevention;
use crate::effect::EffectId;
use crate::error::GameError;
use crate::events::{CombatEventContext, Trigger};
use crate::gadget::{GadgetId, GadgetKind};
use crate::stats::DamageClass;
use crate::status::{IncomingHit, StatusEffect, StatusKind};

/// What one hit did to one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitReport {
    pub target: ActorId,
    /// Health actually removed.
    pub amount: u32,
    pub blocked: bool,
    pub reflected: bool,
    /// Reflected plus countered damage dealt back to the attacker.
    pub retaliation: u32,
    pub death_prevented: bool,
    pub defeated: bool,
}

/// Summary of a resolved card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardOutcome {
    pub card: CardId,
    pub paid: u32,
    pub hits: Vec<HitReport>,
    pub healed: u32,
    pub gadgets: Vec<GadgetId>,
    pub ryft: Option<EffectId>,
}

impl CardOutcome {
    pub fn total_damage(&self) -> u32 {
        self.hits.iter().map(|h| h.amount).sum()
    }
}

/// Damage removed from one combatant, after death prevention.
#[derive(Clone, Copy, Debug, Default)]
struct Wound {
    dealt: u32,
    death_prevented: bool,
    defeated: bool,
}

impl Battle {
    /// Plays `card` as `actor`.
    ///
    /// The effect owner's cards go through the cost economy (next-free,
    /// reductions, floors, credits, refunds); other actors pay the printed cost.
    pub fn execute_card(
        &mut self,
        actor: ActorId,
        card: &CardId,
        target: Option<ActorId>,
    ) -> Result<CardOutcome, CardError> {
        let turn = self.turn;
        let def = self
            .catalog
            .card(card)
            .ok_or_else(|| CardError::unknown_card(card.clone(), turn))?;
        let owner = self.effects.owner();
        let is_owner = actor == owner;

        // ====================================================================
        // Validation
        // ====================================================================

        let caster = self
            .roster
            .actor(actor)
            .ok_or_else(|| CardError::unknown_actor(actor, turn))?;
        if !caster.is_alive() {
            return Err(CardError::actor_dead(actor, turn));
        }
        let expected = match caster.side {
            Side::Player => Phase::PlayerTurn,
            Side::Enemy => Phase::EnemyTurn,
        };
        if self.phase != expected {
            return Err(CardError::wrong_phase(actor, self.phase, turn));
        }
        if self.is_stunned(actor) {
            return Err(CardError::actor_stunned(actor, turn));
        }

        let targets = self.resolve_targets(caster, &def, target)?;

        let free_card = def.cost > 0 && caster.has_status(StatusKind::FreeNextResourceCard);
        let economy = is_owner && !free_card;
        let needed = if free_card {
            0
        } else if economy {
            self.effects.quote_cost(def.cost, def.resource)
        } else {
            def.cost
        };
        let available = caster.pool(def.resource);
        if available < needed {
            return Err(CardError::insufficient_resource(
                actor,
                def.resource,
                needed,
                available,
                turn,
            ));
        }

        // ====================================================================
        // Payment
        // ====================================================================

        let paid = self.pay(actor, &def, free_card, economy);
        if is_owner {
            self.tracker
                .record_card(&def.id, def.is_spell(), def.resource, paid);
        }
        tracing::debug!(
            target: "ryft::battle",
            %actor,
            card = %def.id,
            paid,
            resource = %def.resource,
            targets = targets.len(),
            "card played"
        );

        self.publish(
            CombatEventContext::new(Trigger::AbilityUsed)
                .with_source(actor)
                .with_card(def.id.clone())
                .with_amount(paid),
        );

        let mut outcome = CardOutcome {
            card: def.id.clone(),
            paid,
            hits: Vec::new(),
            healed: 0,
            gadgets: Vec::new(),
            ryft: None,
        };
        let mut follow_ups = Vec::new();
        let mut defeats = Vec::new();

        // ====================================================================
        // Damage / heal
        // ====================================================================

        match def.action {
            CardAction::Damage => {
                let per_target = self.card_damage(actor, &def, targets.len());
                let class = def.damage_class();
                for &victim in &targets {
                    let report = self.strike(
                        actor,
                        victim,
                        per_target,
                        class,
                        &mut follow_ups,
                        &mut defeats,
                    );
                    outcome.hits.push(report);
                }
            }
            CardAction::Heal => {
                let amount = self
                    .roster
                    .actor(actor)
                    .map_or(0, |c| def.power_for(&c.total_stats()));
                for &recipient in &targets {
                    if let Some(combatant) = self.roster.actor_mut(recipient) {
                        outcome.healed += combatant.heal(amount);
                    }
                }
            }
            CardAction::Utility => {}
        }

        // ====================================================================
        // Side effects
        // ====================================================================

        self.grant_statuses(actor, &def, &targets);
        outcome.gadgets = self.deploy_gadgets(actor, &def);

        if let Some(kind) = def.death_ward {
            self.deaths
                .register(actor, DeathPrevention::new(kind, def.id.as_str()));
        }

        if is_owner {
            for effect in &def.effects {
                if let Err(err) = self.add_effect(effect, 1) {
                    tracing::warn!(
                        target: "ryft::effect",
                        card = %def.id,
                        %effect,
                        code = err.error_code(),
                        error = %err,
                        "card effect skipped"
                    );
                }
            }
            if let Some(grant) = def.ryft {
                match self.resolve_ryft(grant.color, grant.polarity) {
                    Ok(id) => outcome.ryft = Some(id),
                    Err(err) => tracing::warn!(
                        target: "ryft::effect",
                        card = %def.id,
                        error = %err,
                        "ryft outcome skipped"
                    ),
                }
            }
        }

        // ====================================================================
        // Events
        // ====================================================================

        self.publish(
            CombatEventContext::new(Trigger::AbilityResolved)
                .with_source(actor)
                .with_card(def.id.clone())
                .with_amount(outcome.total_damage().max(outcome.healed)),
        );
        for event in follow_ups {
            self.publish(event);
        }
        for (victim, killer) in defeats {
            let enemy = self
                .roster
                .actor(victim)
                .is_some_and(|c| c.side == Side::Enemy);
            if enemy {
                self.publish(
                    CombatEventContext::new(Trigger::EnemyDefeated)
                        .with_source(killer)
                        .with_target(victim)
                        .with_card(def.id.clone()),
                );
            }
        }
        self.flush_gadget_events();

        Ok(outcome)
    }

    fn resolve_targets(
        &self,
        caster: &Combatant,
        card: &CardDef,
        explicit: Option<ActorId>,
    ) -> Result<Vec<ActorId>, CardError> {
        let turn = self.turn;
        match card.targeting {
            Targeting::SingleEnemy => {
                if let Some(id) = explicit
                    && self.roster.actor(id).is_some_and(|c| c.side == caster.side)
                {
                    return Err(CardError::illegal_target(card.id.clone(), id, turn));
                }
                if let Some(taunter) = self.roster.taunting_opponent(caster.side) {
                    return Ok(vec![taunter]);
                }
                let chosen = explicit
                    .filter(|id| self.roster.actor(*id).is_some_and(|c| c.is_alive()))
                    .or_else(|| self.roster.first_alive_opponent(caster.side));
                chosen
                    .map(|id| vec![id])
                    .ok_or_else(|| CardError::no_valid_target(card.id.clone(), turn))
            }
            Targeting::AllEnemies => {
                let all: Vec<ActorId> = self
                    .roster
                    .alive_opponents(caster.side)
                    .map(|c| c.id)
                    .collect();
                if all.is_empty() {
                    return Err(CardError::no_valid_target(card.id.clone(), turn));
                }
                Ok(all)
            }
            Targeting::SelfOnly => Ok(vec![caster.id]),
            Targeting::None if card.action == CardAction::Heal => Ok(vec![caster.id]),
            Targeting::None => Ok(Vec::new()),
        }
    }

    /// Debits the caster. Validation has already guaranteed the pool covers it.
    fn pay(&mut self, actor: ActorId, card: &CardDef, free_card: bool, economy: bool) -> u32 {
        let paid = if free_card {
            if let Some(caster) = self.roster.actor_mut(actor) {
                caster
                    .statuses_mut()
                    .consume_stack(StatusKind::FreeNextResourceCard);
            }
            0
        } else if economy {
            let Self { effects, rng, .. } = self;
            let debit = effects.compute_cost(card.cost, card.resource, rng.as_mut());
            effects.record_last_payment(card.resource, debit);
            debit
        } else {
            card.cost
        };

        if paid > 0
            && let Some(caster) = self.roster.actor_mut(actor)
            && !caster.spend(card.resource, paid)
        {
            tracing::error!(target: "ryft::battle", %actor, paid, "debit failed after validation");
        }
        paid
    }

    /// Per-target damage after the caster's multipliers and the AoE split.
    fn card_damage(&mut self, actor: ActorId, card: &CardDef, targets: usize) -> u32 {
        let Some(caster) = self.roster.actor(actor) else {
            return 0;
        };
        let mut power = card.power_for(&caster.total_stats());
        if actor == self.effects.owner() {
            power = self.effects.apply_outgoing_damage_modifiers(power);
        }
        if let Some(caster) = self.roster.actor(actor) {
            power = caster
                .statuses()
                .apply_outgoing_damage_modifiers(power, self.config.slow_penalty_percent);
        }
        match card.aoe {
            AoePolicy::Split if targets > 1 => (power / targets as u32).max(1),
            _ => power,
        }
    }

    /// One hit through the victim's defensive pipeline, plus retaliation.
    fn strike(
        &mut self,
        attacker: ActorId,
        victim: ActorId,
        amount: u32,
        class: DamageClass,
        follow_ups: &mut Vec<CombatEventContext>,
        defeats: &mut Vec<(ActorId, ActorId)>,
    ) -> HitReport {
        let mut report = HitReport {
            target: victim,
            amount: 0,
            blocked: false,
            reflected: false,
            retaliation: 0,
            death_prevented: false,
            defeated: false,
        };
        let reflect_percent = self.config.reflect_percent;
        let Some(combatant) = self.roster.actor_mut(victim) else {
            return report;
        };
        if !combatant.is_alive() {
            return report;
        }
        let mitigated = combatant
            .statuses_mut()
            .apply_incoming_damage_modifiers(IncomingHit::new(amount, class), reflect_percent);
        report.blocked = mitigated.blocked;
        report.reflected = mitigated.reflected;

        let wound = self.wound(victim, mitigated.damage);
        report.amount = wound.dealt;
        report.death_prevented = wound.death_prevented;
        report.defeated = wound.defeated;
        if wound.dealt > 0 {
            follow_ups.push(damage_dealt(attacker, victim, wound.dealt));
            follow_ups.push(damage_taken(attacker, victim, wound.dealt));
        }
        if wound.defeated {
            self.on_defeat(victim, attacker, class);
            defeats.push((victim, attacker));
        }

        let retaliation = mitigated.reflected_damage + mitigated.countered_damage;
        if retaliation > 0 && attacker != victim {
            let back = self.wound(attacker, retaliation);
            report.retaliation = back.dealt;
            tracing::debug!(
                target: "ryft::status",
                from = %victim,
                to = %attacker,
                reflected = mitigated.reflected_damage,
                countered = mitigated.countered_damage,
                "retaliation"
            );
            if back.dealt > 0 {
                follow_ups.push(damage_dealt(victim, attacker, back.dealt));
                follow_ups.push(damage_taken(victim, attacker, back.dealt));
            }
            if back.defeated {
                self.on_defeat(attacker, victim, class);
                defeats.push((attacker, victim));
            }
        }

        report
    }

    /// Removes health and gives death prevention its chance.
    fn wound(&mut self, id: ActorId, amount: u32) -> Wound {
        let Some(combatant) = self.roster.actor_mut(id) else {
            return Wound::default();
        };
        if amount == 0 || !combatant.is_alive() {
            return Wound::default();
        }
        let dealt = combatant.apply_damage(amount);
        let health = combatant.health();
        let death_prevented = self.deaths.try_prevent_death(&mut *combatant, health).is_some();
        Wound {
            dealt,
            death_prevented,
            defeated: !combatant.is_alive(),
        }
    }

    fn on_defeat(&mut self, victim: ActorId, killer: ActorId, class: DamageClass) {
        let gadgets = self.gadgets.destroy_owned_by(victim);
        self.deaths.clear_actor(victim);
        if killer == self.effects.owner() && killer != victim {
            self.tracker.record_kill(class);
        }
        tracing::info!(target: "ryft::battle", %victim, %killer, %class, gadgets, "combatant defeated");
    }

    fn grant_statuses(&mut self, actor: ActorId, card: &CardDef, targets: &[ActorId]) {
        for grant in &card.statuses {
            let recipients: &[ActorId] = match grant.recipient {
                StatusRecipient::Caster => core::slice::from_ref(&actor),
                StatusRecipient::Target => targets,
            };
            for &recipient in recipients {
                let Some(combatant) = self.roster.actor_mut(recipient) else {
                    continue;
                };
                if !combatant.is_alive() {
                    continue;
                }
                let status = StatusEffect::new(grant.kind, grant.duration)
                    .with_stacks(grant.stacks)
                    .with_value(grant.value)
                    .with_source(card.id.as_str());
                if combatant.statuses_mut().add(status) {
                    tracing::debug!(
                        target: "ryft::status",
                        actor = %recipient,
                        kind = %grant.kind,
                        duration = ?grant.duration,
                        card = %card.id,
                        "status applied"
                    );
                }
            }
        }
    }

    fn deploy_gadgets(&mut self, actor: ActorId, card: &CardDef) -> Vec<GadgetId> {
        let Some(grant) = card.gadget else {
            return Vec::new();
        };
        let Some(caster) = self.roster.actor_mut(actor) else {
            return Vec::new();
        };
        let copies = if caster.statuses_mut().consume_stack(StatusKind::DoubleNextGadget) {
            2
        } else {
            1
        };
        let ward = match grant.kind {
            GadgetKind::ShieldDrone => Some(StatusKind::ShieldDrone),
            GadgetKind::Decoy => Some(StatusKind::DecoyRedirect),
            _ => None,
        };
        if let Some(kind) = ward {
            caster.statuses_mut().add(
                StatusEffect::new(kind, grant.duration)
                    .with_stacks(copies)
                    .with_source(card.id.as_str()),
            );
        }

        (0..copies)
            .map(|_| {
                self.gadgets.deploy(
                    grant.kind,
                    actor,
                    grant.power,
                    grant.duration,
                    Some(card.id.clone()),
                )
            })
            .collect()
    }
}

fn damage_dealt(source: ActorId, target: ActorId, amount: u32) -> CombatEventContext {
    CombatEventContext::new(Trigger::DamageDealt)
        .with_source(source)
        .with_target(target)
        .with_amount(amount)
}

fn damage_taken(source: ActorId, target: ActorId, amount: u32) -> CombatEventContext {
    CombatEventContext::new(Trigger::DamageTaken)
        .with_source(source)
        .with_target(target)
        .with_amount(amount)
}
