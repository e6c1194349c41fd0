//! Scripted encounter: a fixed hero against a small pack of enemies.

use std::rc::Rc;

use anyhow::Context;
use ryft_core::{
    Actor, ActorId, Battle, BattleConfig, CardId, Catalog, Combatant, GameError, Outcome, Roster,
    StatBlock,
};

use crate::config::SimConfig;

/// Cards the hero tries each turn, in order.
const PLAYER_ROTATION: &[&str] = &[
    "ryft-tear",
    "shield-drone",
    "shield-bash",
    "arc-bolt",
    "slash",
    "mend",
];

/// Summary of a finished encounter.
#[derive(Debug)]
pub struct Report {
    pub outcome: Option<Outcome>,
    pub turns: u32,
    pub player_health: u32,
    pub cards_played: usize,
    pub enemy_cards_played: usize,
    /// Card draws requested by effects over the encounter.
    pub draws_requested: u32,
}

pub fn roster() -> Roster {
    let hero = Combatant::player("Wanderer", StatBlock::new(4, 3, 2, 3, 60, 1));
    Roster::new(hero)
        .with_enemy(Combatant::enemy(1, "Rift Hound", StatBlock::new(3, 0, 0, 2, 24, 0)))
        .with_enemy(Combatant::enemy(2, "Spitter", StatBlock::new(2, 2, 0, 2, 18, 0)))
}

/// Enemy policy: hounds claw, spitters alternate venom and claws.
fn choose_enemy_card(battle: &Battle, enemy: ActorId) -> Option<CardId> {
    let card = match enemy.0 {
        2 if battle.turn() % 2 == 0 => "venom-spit",
        _ => "claw",
    };
    Some(CardId::new(card))
}

pub fn run(
    config: &SimConfig,
    battle_config: BattleConfig,
    catalog: Rc<dyn Catalog>,
) -> anyhow::Result<Report> {
    let mut battle = Battle::new(battle_config, catalog, roster());
    battle.start().context("failed to start battle")?;

    let mut cards_played = 0;
    let mut enemy_cards_played = 0;
    let mut draws_requested = 0;
    while battle.is_over().is_none() && battle.turn() <= config.max_turns {
        cards_played += play_player_turn(&mut battle);
        let draws = battle.take_pending_draws();
        if draws > 0 {
            tracing::info!(target: "ryft::sim", turn = battle.turn(), draws, "effects requested draws");
            draws_requested += draws;
        }
        if battle.is_over().is_some() {
            break;
        }
        battle.end_turn().context("failed to end player turn")?;
        enemy_cards_played += battle
            .run_enemy_turn(choose_enemy_card)
            .context("failed to run enemy turn")?;
    }

    let turns = battle.turn();
    let player_health = battle.player().map(|p| p.health()).unwrap_or(0);
    let outcome = battle.end().context("failed to end battle")?;

    Ok(Report {
        outcome,
        turns,
        player_health,
        cards_played,
        enemy_cards_played,
        draws_requested,
    })
}

/// Tries every rotation card once; rejected cards are skipped.
fn play_player_turn(battle: &mut Battle) -> usize {
    let mut played = 0;
    for name in PLAYER_ROTATION {
        if battle.is_over().is_some() {
            break;
        }
        let card = CardId::new(*name);
        match battle.execute_card(ActorId::PLAYER, &card, None) {
            Ok(outcome) => {
                played += 1;
                tracing::info!(
                    target: "ryft::sim",
                    turn = battle.turn(),
                    %card,
                    paid = outcome.paid,
                    damage = outcome.total_damage(),
                    healed = outcome.healed,
                    "player played card"
                );
            }
            Err(err) => tracing::debug!(
                target: "ryft::sim",
                %card,
                code = err.error_code(),
                error = %err,
                "player card skipped"
            ),
        }
    }
    played
}

#[cfg(test)]
mod tests {
    use super::*;
    use ryft_content::BundledContent;

    #[test]
    fn bundled_encounter_finishes_within_turn_limit() {
        let config = SimConfig {
            max_turns: 30,
            ..SimConfig::default()
        };
        let catalog: Rc<dyn Catalog> = Rc::new(BundledContent::catalog().unwrap());
        let battle_config = BundledContent::config().unwrap();

        let report = run(&config, battle_config, catalog).unwrap();

        assert!(report.turns >= 1);
        assert!(report.cards_played > 0);
    }
}
