//! Simulation settings read from the environment.
use std::env;
use std::path::PathBuf;

/// Scripted encounter configuration.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Directory holding `battle.toml`, `effects.ron` and `cards.ron`.
    /// Bundled content is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Overrides the battle RNG seed.
    pub seed: Option<u64>,
    /// Turn limit before the encounter is called a draw.
    pub max_turns: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed: None,
            max_turns: 20,
        }
    }
}

impl SimConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RYFT_DATA_DIR` - Content directory (default: bundled content)
    /// - `RYFT_SEED` - RNG seed (default: from battle config)
    /// - `RYFT_TURNS` - Turn limit (default: 20)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RYFT_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        config.seed = read_env::<u64>("RYFT_SEED");
        if let Some(turns) = read_env::<u32>("RYFT_TURNS") {
            config.max_turns = turns.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
