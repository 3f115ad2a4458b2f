//! Rarity tiers and the rarity roll.
//!
//! Seven ordered tiers share one model across loot, stat ranges, chests and
//! enemy generation. Lookups are total: every tier has a color, rate and name,
//! and integer tiers outside 0..=6 clamp to the nearest valid tier.
//!
//! The roll walks tiers rarest-first and luck only scales Rare and above.
//! When luck pushes the Rare+ mass past 1.0 the draw is always satisfied by
//! one of the first tiers checked, so Common/Uncommon become unreachable and
//! the extra mass lands on the rarest tiers.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Item rarity tiers (ordered: Common < ... < Mythic)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RarityTier {
    #[default]
    Common, // grey, 59.99%
    Uncommon,  // green, 25%
    Rare,      // blue, 10%
    Epic,      // purple, 4%
    Legendary, // orange, 0.9%
    Exotic,    // gold, 0.1% (quest only)
    Mythic,    // prismatic, 0.01% (world boss only)
}

/// Cosmetic color for UI and VFX
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RarityColor {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Multiply RGB channels, alpha untouched
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// `rrggbb` hex string (no alpha), channels clamped to [0, 1]
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

impl RarityTier {
    /// All tiers, most common first
    pub const ALL: [RarityTier; 7] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
        RarityTier::Exotic,
        RarityTier::Mythic,
    ];

    /// All tiers, rarest first (roll order)
    pub const RAREST_FIRST: [RarityTier; 7] = [
        RarityTier::Mythic,
        RarityTier::Exotic,
        RarityTier::Legendary,
        RarityTier::Epic,
        RarityTier::Rare,
        RarityTier::Uncommon,
        RarityTier::Common,
    ];

    /// Tier level (0-6)
    pub fn tier(&self) -> u8 {
        *self as u8
    }

    /// Tier from level, clamped into 0..=6
    pub fn from_tier(tier: i32) -> Self {
        Self::ALL[tier.clamp(0, 6) as usize]
    }

    pub fn is_rare_or_above(&self) -> bool {
        *self >= Self::Rare
    }

    pub fn is_epic_or_above(&self) -> bool {
        *self >= Self::Epic
    }

    /// Legendary, Exotic or Mythic (resets bad-luck protection)
    pub fn is_legendary_tier(&self) -> bool {
        *self >= Self::Legendary
    }

    /// Base drop probability; sums to 1.0 across tiers
    pub fn drop_rate(&self) -> f32 {
        match self {
            Self::Common => 0.5999,
            Self::Uncommon => 0.25,
            Self::Rare => 0.10,
            Self::Epic => 0.04,
            Self::Legendary => 0.009,
            Self::Exotic => 0.001,
            Self::Mythic => 0.0001,
        }
    }

    /// Drop rate after luck (luck only scales Rare and above)
    pub fn modified_drop_rate(&self, luck_multiplier: f32) -> f32 {
        if self.is_rare_or_above() {
            self.drop_rate() * luck_multiplier.max(0.0)
        } else {
            self.drop_rate()
        }
    }

    pub fn color(&self) -> RarityColor {
        match self {
            Self::Common => RarityColor::rgb(0.6, 0.6, 0.6),
            Self::Uncommon => RarityColor::rgb(0.2, 0.8, 0.2),
            Self::Rare => RarityColor::rgb(0.2, 0.4, 1.0),
            Self::Epic => RarityColor::rgb(0.6, 0.2, 0.8),
            Self::Legendary => RarityColor::rgb(1.0, 0.6, 0.0),
            Self::Exotic => RarityColor::rgb(1.0, 0.8, 0.2),
            Self::Mythic => RarityColor::rgb(1.0, 0.2, 1.0),
        }
    }

    /// Brighter color for 3D emission
    pub fn emission_color(&self) -> RarityColor {
        self.color().scaled(1.5)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Exotic => "Exotic",
            Self::Mythic => "Mythic",
        }
    }

    /// Display name wrapped in rich-text color tags
    pub fn rich_text_name(&self) -> String {
        format!(
            "[color=#{}]{}[/color]",
            self.color().to_hex(),
            self.display_name()
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Common => "Common items with standard properties",
            Self::Uncommon => "Uncommon items with slightly enhanced properties",
            Self::Rare => "Rare items with notably improved stats",
            Self::Epic => "Epic items with exceptional attributes",
            Self::Legendary => "Legendary items with unique powers",
            Self::Exotic => "Exotic items with game-changing abilities",
            Self::Mythic => "Mythic items of unparalleled power",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Common => "◆",
            Self::Uncommon => "◇",
            Self::Rare => "★",
            Self::Epic => "◈",
            Self::Legendary => "✦",
            Self::Exotic => "❖",
            Self::Mythic => "✨",
        }
    }

    pub fn glow_intensity(&self) -> f32 {
        match self {
            Self::Common => 0.3,
            Self::Uncommon => 0.5,
            Self::Rare => 0.8,
            Self::Epic => 1.2,
            Self::Legendary => 1.5,
            Self::Exotic => 2.0,
            Self::Mythic => 2.5,
        }
    }

    pub fn particle_multiplier(&self) -> f32 {
        match self {
            Self::Common => 0.5,
            Self::Uncommon => 0.8,
            Self::Rare => 1.0,
            Self::Epic => 1.5,
            Self::Legendary => 2.0,
            Self::Exotic => 2.5,
            Self::Mythic => 3.0,
        }
    }

    /// Visual scale emphasis for the pickup model
    pub fn scale_multiplier(&self) -> f32 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.1,
            Self::Rare => 1.15,
            Self::Epic => 1.2,
            Self::Legendary => 1.3,
            Self::Exotic => 1.4,
            Self::Mythic => 1.5,
        }
    }

    pub fn shows_beam(&self) -> bool {
        self.is_epic_or_above()
    }

    pub fn plays_special_sound(&self) -> bool {
        self.is_rare_or_above()
    }

    pub fn stat_multiplier(&self) -> f32 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.2,
            Self::Rare => 1.5,
            Self::Epic => 2.0,
            Self::Legendary => 2.5,
            Self::Exotic => 3.0,
            Self::Mythic => 4.0,
        }
    }

    pub fn sell_value_multiplier(&self) -> f32 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 2.0,
            Self::Rare => 5.0,
            Self::Epic => 10.0,
            Self::Legendary => 25.0,
            Self::Exotic => 50.0,
            Self::Mythic => 100.0,
        }
    }

    /// Roll a rarity with the given luck multiplier
    pub fn roll<R: Rng + ?Sized>(luck_multiplier: f32, rng: &mut R) -> Self {
        let draw: f32 = rng.gen();
        Self::from_draw(luck_multiplier, draw)
    }

    /// Resolve a uniform draw in [0, 1) against the luck-scaled cumulative table.
    ///
    /// Zero-probability tiers never match. Falls back to Common when the
    /// cumulative mass ends below the draw.
    pub fn from_draw(luck_multiplier: f32, draw: f32) -> Self {
        let mut cumulative = 0.0_f32;
        for tier in Self::RAREST_FIRST {
            let rate = tier.modified_drop_rate(luck_multiplier);
            if rate <= 0.0 {
                continue;
            }
            cumulative += rate;
            if draw <= cumulative {
                return tier;
            }
        }
        Self::Common
    }

    /// Uniform tier between two bounds (inclusive, order-insensitive)
    pub fn roll_in_range<R: Rng + ?Sized>(min: Self, max: Self, rng: &mut R) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let tier = rng.gen_range(lo.tier()..=hi.tier());
        Self::from_tier(tier as i32)
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
