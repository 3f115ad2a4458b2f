//! Enemy archetype stat mixing.
//!
//! One scalar in `[0, 1]` places an enemy between glass cannon (0) and tank
//! (1). HP grows with the scalar while damage and speed shrink, so no point on
//! the spectrum dominates another.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rarity::RarityTier;

const MIN_ATTACK_RANGE: f32 = 3.0;
const MAX_ATTACK_RANGE: f32 = 20.0;
const MIN_SIZE: f32 = 0.8;
const MAX_SIZE: f32 = 1.5;
const MIN_VARIANCE: f32 = 0.8;
const MAX_VARIANCE: f32 = 1.2;

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Coarse label for an archetype value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeClass {
    GlassCannon,
    Balanced,
    Tank,
}

impl ArchetypeClass {
    pub fn from_archetype(archetype: f32) -> Self {
        if archetype < 1.0 / 3.0 {
            ArchetypeClass::GlassCannon
        } else if archetype <= 2.0 / 3.0 {
            ArchetypeClass::Balanced
        } else {
            ArchetypeClass::Tank
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ArchetypeClass::GlassCannon => "Glass Cannon",
            ArchetypeClass::Balanced => "Balanced",
            ArchetypeClass::Tank => "Tank",
        }
    }
}

/// Immutable stat block for one spawned enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    pub archetype: f32,
    pub rarity: RarityTier,
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub range: f32,
    /// Visual scale only
    pub size: f32,
}

impl ArchetypeProfile {
    pub fn class(&self) -> ArchetypeClass {
        ArchetypeClass::from_archetype(self.archetype)
    }
}

/// Enemy strength multiplier per tier
pub fn rarity_multiplier(rarity: RarityTier) -> f32 {
    match rarity {
        RarityTier::Common => 1.0,
        RarityTier::Uncommon => 1.5,
        RarityTier::Rare => 2.0,
        RarityTier::Epic => 3.0,
        RarityTier::Legendary => 5.0,
        RarityTier::Exotic => 7.5,
        RarityTier::Mythic => 10.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStatMixer {
    pub base_hp: f32,
    pub base_damage: f32,
    pub base_speed: f32,
}

impl Default for ArchetypeStatMixer {
    fn default() -> Self {
        Self {
            base_hp: 100.0,
            base_damage: 10.0,
            base_speed: 5.0,
        }
    }
}

impl ArchetypeStatMixer {
    pub fn generate<R: Rng + ?Sized>(&self, rarity: RarityTier, rng: &mut R) -> ArchetypeProfile {
        let archetype = rng.gen_range(0.0..=1.0);
        self.generate_with_archetype(rarity, archetype, rng)
    }

    /// Profile at a fixed point of the spectrum (clamped to `[0, 1]`)
    pub fn generate_with_archetype<R: Rng + ?Sized>(
        &self,
        rarity: RarityTier,
        archetype: f32,
        rng: &mut R,
    ) -> ArchetypeProfile {
        let archetype = if archetype.is_nan() {
            0.5
        } else {
            archetype.clamp(0.0, 1.0)
        };
        let rarity_mult = rarity_multiplier(rarity);

        let hp_mult = lerp(0.5, 3.0, archetype);
        let damage_mult = lerp(2.0, 0.5, archetype);
        let speed_mult = lerp(1.5, 0.5, archetype);

        // one factor for all three stats keeps the trade-off correlated
        let variance = rng.gen_range(MIN_VARIANCE..=MAX_VARIANCE);
        let hp = (self.base_hp * hp_mult * rarity_mult * variance).round();
        let damage = (self.base_damage * damage_mult * rarity_mult * variance).round();
        let speed = self.base_speed * speed_mult * variance;
        let range = rng.gen_range(MIN_ATTACK_RANGE..=MAX_ATTACK_RANGE);

        let profile = ArchetypeProfile {
            archetype,
            rarity,
            hp,
            damage,
            speed,
            range,
            size: lerp(MIN_SIZE, MAX_SIZE, archetype),
        };
        tracing::trace!(?profile, "Generated archetype profile");
        profile
    }
}
