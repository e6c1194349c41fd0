/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Maximum nesting of event dispatch. A publish issued while this many
    /// dispatches are already on the stack is dropped and logged.
    pub max_dispatch_depth: usize,

    /// Share of post-mitigation damage sent back to the attacker by reflect statuses.
    pub reflect_percent: u32,

    /// Outgoing damage penalty applied to a slowed attacker.
    pub slow_penalty_percent: u32,

    /// Upper clamp for the armed one-shot outgoing damage multiplier.
    pub max_damage_multiplier: f32,

    /// Refill every resource pool to its current stat value at the owner's turn start.
    pub refill_pools: bool,

    /// Seed for the battle RNG (proc rolls, refund rolls, random outcome selection).
    pub rng_seed: u64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Capacity of a per-actor status table. One slot per status kind is enough,
    /// the remainder is headroom for content-defined kinds.
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 8;
    pub const DEFAULT_REFLECT_PERCENT: u32 = 50;
    pub const DEFAULT_SLOW_PENALTY_PERCENT: u32 = 25;
    pub const DEFAULT_MAX_DAMAGE_MULTIPLIER: f32 = 2.0;
    pub const DEFAULT_RNG_SEED: u64 = 0x5eed_1e55_ca7d_0001;

    pub fn new() -> Self {
        Self {
            max_dispatch_depth: Self::DEFAULT_MAX_DISPATCH_DEPTH,
            reflect_percent: Self::DEFAULT_REFLECT_PERCENT,
            slow_penalty_percent: Self::DEFAULT_SLOW_PENALTY_PERCENT,
            max_damage_multiplier: Self::DEFAULT_MAX_DAMAGE_MULTIPLIER,
            refill_pools: true,
            rng_seed: Self::DEFAULT_RNG_SEED,
        }
    }

    pub fn with_seed(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            ..Self::new()
        }
    }

    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = depth;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
