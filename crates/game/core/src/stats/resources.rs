//! Resource fields - the pools cards are paid from.
//!
//! Each field is capped by the stat of the same name, and maps to the damage
//! class a card paid with it deals.

use core::ops::{Index, IndexMut};

use strum::{Display, EnumCount, EnumIter};

use super::block::StatKind;

/// Resource field a card cost is paid with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Strength,
    Mana,
    Engineering,
    Energy,
}

impl ResourceKind {
    /// The stat that caps this resource pool.
    pub const fn stat(self) -> StatKind {
        match self {
            Self::Strength => StatKind::Strength,
            Self::Mana => StatKind::Mana,
            Self::Engineering => StatKind::Engineering,
            Self::Energy => StatKind::Energy,
        }
    }

    /// Damage class of a card paid with this resource.
    pub const fn damage_class(self) -> DamageClass {
        match self {
            Self::Strength => DamageClass::Physical,
            Self::Mana => DamageClass::Magic,
            Self::Energy => DamageClass::Ranged,
            Self::Engineering => DamageClass::Tech,
        }
    }

    /// Inverse of [`Self::stat`].
    pub const fn from_stat(stat: StatKind) -> Option<Self> {
        match stat {
            StatKind::Strength => Some(Self::Strength),
            StatKind::Mana => Some(Self::Mana),
            StatKind::Engineering => Some(Self::Engineering),
            StatKind::Energy => Some(Self::Energy),
            StatKind::MaxHealth | StatKind::Defense => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Damage classification, used by reflect variants and kill accounting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageClass {
    Physical,
    Magic,
    Ranged,
    Tech,
}

/// One value per [`ResourceKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerResource<T> {
    values: [T; ResourceKind::COUNT],
}

impl<T: Copy> PerResource<T> {
    pub const fn splat(value: T) -> Self {
        Self {
            values: [value; ResourceKind::COUNT],
        }
    }
}

impl<T> Index<ResourceKind> for PerResource<T> {
    type Output = T;

    fn index(&self, kind: ResourceKind) -> &T {
        &self.values[kind.index()]
    }
}

impl<T> IndexMut<ResourceKind> for PerResource<T> {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut T {
        &mut self.values[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_resource_round_trips_through_its_stat() {
        for kind in ResourceKind::iter() {
            assert_eq!(ResourceKind::from_stat(kind.stat()), Some(kind));
        }
        assert_eq!(ResourceKind::from_stat(StatKind::MaxHealth), None);
    }

    #[test]
    fn per_resource_indexes_independently() {
        let mut pools = PerResource::splat(0u32);
        pools[ResourceKind::Energy] = 3;
        pools[ResourceKind::Mana] += 2;
        assert_eq!(pools[ResourceKind::Energy], 3);
        assert_eq!(pools[ResourceKind::Mana], 2);
        assert_eq!(pools[ResourceKind::Strength], 0);
    }
}
