//! Headless Ryft encounter runner.
mod config;
mod encounter;

use std::rc::Rc;

use anyhow::Result;
use ryft_content::{BundledContent, ContentFactory};
use ryft_core::{BattleConfig, Catalog, StaticCatalog};

use crate::config::SimConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    let (mut battle_config, catalog) = load_content(&config)?;
    if let Some(seed) = config.seed {
        battle_config.rng_seed = seed;
    }
    tracing::info!(
        target: "ryft::sim",
        seed = battle_config.rng_seed,
        cards = catalog.card_count(),
        effects = catalog.effect_count(),
        "content loaded"
    );

    let catalog: Rc<dyn Catalog> = Rc::new(catalog);
    let report = encounter::run(&config, battle_config, catalog)?;

    match report.outcome {
        Some(outcome) => println!("{outcome} after {} turns", report.turns),
        None => println!("Draw after {} turns", report.turns),
    }
    println!(
        "player health {}, cards played {}, enemy cards played {}, draws requested {}",
        report.player_health,
        report.cards_played,
        report.enemy_cards_played,
        report.draws_requested
    );
    Ok(())
}

fn load_content(config: &SimConfig) -> Result<(BattleConfig, StaticCatalog)> {
    match &config.data_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            tracing::info!(target: "ryft::sim", dir = %factory.data_dir().display(), "loading content");
            Ok((factory.load_config()?, factory.load_catalog()?))
        }
        None => Ok((BundledContent::config()?, BundledContent::catalog()?)),
    }
}
