//! Stat System - layered numeric aggregates.
//!
//! # Architecture
//!
//! ```text
//! [ base  ]  authored at battle setup
//!    +
//! [ bonus ]  permanent, meta-persistent (read/written by the session layer)
//!    +
//! [ temp  ]  battle-scoped, cleared at BattleEnd
//!    +
//! [ turn  ]  current turn only, cleared at TurnEnd
//!    =
//! [ current ] used by scaling and caps
//! ```
//!
//! Resource pools (what cards are paid with) are current values capped by the
//! matching stat; see [`resources`].

pub mod block;
pub mod layers;
pub mod resources;

pub use block::{StatBlock, StatKind};
pub use layers::{StatLayer, StatLayers};
pub use resources::{DamageClass, PerResource, ResourceKind};
