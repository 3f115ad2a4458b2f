//! Stat roll engine.
//!
//! Each `(RarityTier, StatId)` pair maps to an inclusive `[min, max]` range.
//! A roll is a uniform draw inside that range. A missing pair is a content
//! gap, not a crash: the roll logs a warning and yields 0.

mod table;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::rarity::RarityTier;

/// Stat dimensions that items can roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatId {
    // Primary
    Hp,
    Shield,
    Speed,
    Energy,

    // Secondary
    CritChance,
    CritDamage,
    Dodge,
    Regeneration,

    // Resistances
    PhysicalResist,
    FireResist,
    IceResist,
    ElectricResist,
    ToxicResist,

    // Weapon
    Damage,
    FireRate,
    Accuracy,
    Range,
    AmmoCapacity,
    ReloadSpeed,

    // Drone
    DroneSpeed,
    DroneDamage,
    DroneHealth,
    EnergyEfficiency,
}

impl StatId {
    pub const ALL: [StatId; 23] = [
        StatId::Hp,
        StatId::Shield,
        StatId::Speed,
        StatId::Energy,
        StatId::CritChance,
        StatId::CritDamage,
        StatId::Dodge,
        StatId::Regeneration,
        StatId::PhysicalResist,
        StatId::FireResist,
        StatId::IceResist,
        StatId::ElectricResist,
        StatId::ToxicResist,
        StatId::Damage,
        StatId::FireRate,
        StatId::Accuracy,
        StatId::Range,
        StatId::AmmoCapacity,
        StatId::ReloadSpeed,
        StatId::DroneSpeed,
        StatId::DroneDamage,
        StatId::DroneHealth,
        StatId::EnergyEfficiency,
    ];
}

/// Inclusive numeric range for one stat at one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    pub stat: StatId,
    pub min: f32,
    pub max: f32,
}

impl StatRange {
    /// Build a range, swapping inverted bounds
    pub fn new(stat: StatId, min: f32, max: f32) -> Self {
        if min <= max {
            Self { stat, min, max }
        } else {
            Self {
                stat,
                min: max,
                max: min,
            }
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// An item instance produced by a roll. Plain value, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolledItem {
    pub item_id: String,
    pub rarity: RarityTier,
    pub rolled_stats: BTreeMap<StatId, f32>,
}

/// Range table keyed by (tier, stat)
#[derive(Debug, Clone, Default)]
pub struct StatRangeTable {
    ranges: HashMap<(RarityTier, StatId), StatRange>,
}

impl StatRangeTable {
    /// Table with no ranges (every roll fails closed to 0)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The shipped 7 x 23 balance table
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for (rarity, rows) in table::DEFAULT_RANGES.iter() {
            for &(stat, min, max) in rows.iter() {
                table.insert(*rarity, StatRange::new(stat, min, max));
            }
        }
        table
    }

    /// Insert or replace the range for a pair
    pub fn insert(&mut self, rarity: RarityTier, range: StatRange) {
        self.ranges.insert((rarity, range.stat), range);
    }

    pub fn get(&self, stat: StatId, rarity: RarityTier) -> Option<&StatRange> {
        self.ranges.get(&(rarity, stat))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Copy of every range defined for a tier
    pub fn ranges_for(&self, rarity: RarityTier) -> BTreeMap<StatId, StatRange> {
        self.ranges
            .iter()
            .filter(|((tier, _), _)| *tier == rarity)
            .map(|((_, stat), range)| (*stat, *range))
            .collect()
    }

    /// Uniform value inside the pair's range, or 0 when unconfigured
    pub fn roll_stat<R: Rng + ?Sized>(&self, stat: StatId, rarity: RarityTier, rng: &mut R) -> f32 {
        match self.get(stat, rarity) {
            Some(range) => range.roll(rng),
            None => {
                tracing::warn!(?stat, ?rarity, "No stat range defined");
                0.0
            }
        }
    }

    pub fn roll_stats<R: Rng + ?Sized>(
        &self,
        stats: &[StatId],
        rarity: RarityTier,
        rng: &mut R,
    ) -> BTreeMap<StatId, f32> {
        stats
            .iter()
            .map(|stat| (*stat, self.roll_stat(*stat, rarity, rng)))
            .collect()
    }

    /// Roll a complete item
    pub fn roll_item<R: Rng + ?Sized>(
        &self,
        item_id: &str,
        rarity: RarityTier,
        stats: &[StatId],
        rng: &mut R,
    ) -> RolledItem {
        RolledItem {
            item_id: item_id.to_string(),
            rarity,
            rolled_stats: self.roll_stats(stats, rarity, rng),
        }
    }
}
