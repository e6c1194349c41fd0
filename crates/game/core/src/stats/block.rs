//! Plain stat aggregate shared by every layer.

use core::ops::{Add, AddAssign, Neg};

use strum::{Display, EnumCount, EnumIter};

/// Individual stats, used by scaling formulas and stat-changing effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    Strength,
    Mana,
    Engineering,
    Energy,
    MaxHealth,
    Defense,
}

/// One value per [`StatKind`].
///
/// # Example
/// ```
/// # use ryft_core::stats::{StatBlock, StatKind};
/// let mut stats = StatBlock::new(4, 3, 2, 3, 40, 1);
/// stats += StatBlock::single(StatKind::MaxHealth, 5);
/// assert_eq!(stats.get(StatKind::MaxHealth), 45);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub strength: i32,
    pub mana: i32,
    pub engineering: i32,
    pub energy: i32,
    pub max_health: i32,
    pub defense: i32,
}

impl StatBlock {
    pub const ZERO: Self = Self {
        strength: 0,
        mana: 0,
        engineering: 0,
        energy: 0,
        max_health: 0,
        defense: 0,
    };

    pub const fn new(
        strength: i32,
        mana: i32,
        engineering: i32,
        energy: i32,
        max_health: i32,
        defense: i32,
    ) -> Self {
        Self {
            strength,
            mana,
            engineering,
            energy,
            max_health,
            defense,
        }
    }

    /// A block with a single non-zero stat.
    pub fn single(kind: StatKind, amount: i32) -> Self {
        let mut block = Self::ZERO;
        *block.get_mut(kind) = amount;
        block
    }

    pub const fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Mana => self.mana,
            StatKind::Engineering => self.engineering,
            StatKind::Energy => self.energy,
            StatKind::MaxHealth => self.max_health,
            StatKind::Defense => self.defense,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Strength => &mut self.strength,
            StatKind::Mana => &mut self.mana,
            StatKind::Engineering => &mut self.engineering,
            StatKind::Energy => &mut self.energy,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::Defense => &mut self.defense,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for StatBlock {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for StatBlock {
    fn add_assign(&mut self, rhs: Self) {
        self.strength = self.strength.saturating_add(rhs.strength);
        self.mana = self.mana.saturating_add(rhs.mana);
        self.engineering = self.engineering.saturating_add(rhs.engineering);
        self.energy = self.energy.saturating_add(rhs.energy);
        self.max_health = self.max_health.saturating_add(rhs.max_health);
        self.defense = self.defense.saturating_add(rhs.defense);
    }
}

impl Neg for StatBlock {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            strength: -self.strength,
            mana: -self.mana,
            engineering: -self.engineering,
            energy: -self.energy,
            max_health: -self.max_health,
            defense: -self.defense,
        }
    }
}
