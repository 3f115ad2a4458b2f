//! Loot engine tunables, loaded from RON or JSON.
//!
//! Every field has a default, so partial files are fine. Out-of-range values
//! are clamped by [`LootConfig::sanitized`] rather than rejected.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::drops::Collector;
use crate::error::{LootError, LootResult};
use crate::logging::TracingConfig;
use crate::luck::{Difficulty, LuckState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub pickup_radius: f32,
    pub magnetic_radius: f32,
    pub magnetic_force: f32,
    pub auto_pickup: bool,
    pub magnetic: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            pickup_radius: PICKUP_RADIUS,
            magnetic_radius: MAGNETIC_RADIUS,
            magnetic_force: MAGNETIC_FORCE,
            auto_pickup: false,
            magnetic: true,
        }
    }
}

impl CollectorConfig {
    /// A collector with these settings at `position`
    pub fn build(&self, id: u64, position: bevy::math::Vec3) -> Collector {
        Collector::new(id, position)
            .with_radii(self.pickup_radius, self.magnetic_radius)
            .with_force(self.magnetic_force)
            .with_auto_pickup(self.auto_pickup)
            .with_magnetic(self.magnetic)
    }
}

/// Starting luck modifiers for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuckConfig {
    pub player_luck_stat: f32,
    pub difficulty: Difficulty,
    pub clan_bonus: f32,
    pub event_bonus: f32,
    pub premium_pass: bool,
}

impl Default for LuckConfig {
    fn default() -> Self {
        Self {
            player_luck_stat: 0.0,
            difficulty: Difficulty::Normal,
            clan_bonus: 0.0,
            event_bonus: 0.0,
            premium_pass: false,
        }
    }
}

impl LuckConfig {
    pub fn build(&self, pity_threshold: u32) -> LuckState {
        let mut luck = LuckState::new(pity_threshold);
        luck.set_player_luck(self.player_luck_stat);
        luck.set_difficulty(self.difficulty);
        luck.set_clan_bonus(self.clan_bonus);
        luck.set_event_bonus(self.event_bonus);
        luck.set_premium_pass(self.premium_pass);
        luck
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub seed: u64,
    pub pity_threshold: u32,
    pub max_active_drops: usize,
    pub drop_lifetime_secs: f32,
    pub scatter_radius: f32,
    pub collector: CollectorConfig,
    pub luck: LuckConfig,
    /// Directories scanned for loot table files
    pub table_dirs: Vec<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub hot_reload: bool,
    pub logging: TracingConfig,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            pity_threshold: PITY_THRESHOLD,
            max_active_drops: MAX_ACTIVE_DROPS,
            drop_lifetime_secs: DROP_LIFETIME_SECS,
            scatter_radius: DROP_SCATTER_RADIUS,
            collector: CollectorConfig::default(),
            luck: LuckConfig::default(),
            table_dirs: Vec::new(),
            catalog_path: None,
            hot_reload: false,
            logging: TracingConfig::default(),
        }
    }
}

impl LootConfig {
    /// Load from `.ron` or `.json`, then clamp
    pub fn load(path: &Path) -> LootResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: LootConfig = match extension(path) {
            Some("ron") => ron::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => return Err(LootError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::info!(path = %path.display(), "Loot config loaded");
        Ok(config.sanitized())
    }

    pub fn save(&self, path: &Path) -> LootResult<()> {
        let content = match extension(path) {
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?,
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => return Err(LootError::UnsupportedFormat(path.to_path_buf())),
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Copy with every numeric field forced into its valid range
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.pity_threshold == 0 {
            tracing::warn!("pity_threshold 0 is invalid, using {}", defaults.pity_threshold);
            self.pity_threshold = defaults.pity_threshold;
        }
        if self.max_active_drops == 0 {
            tracing::warn!("max_active_drops 0 is invalid, using {}", defaults.max_active_drops);
            self.max_active_drops = defaults.max_active_drops;
        }
        if !(self.drop_lifetime_secs.is_finite() && self.drop_lifetime_secs > 0.0) {
            tracing::warn!(value = self.drop_lifetime_secs, "Invalid drop lifetime, using default");
            self.drop_lifetime_secs = defaults.drop_lifetime_secs;
        }

        self.scatter_radius = non_negative(self.scatter_radius, defaults.scatter_radius);
        self.collector.pickup_radius =
            non_negative(self.collector.pickup_radius, PICKUP_RADIUS);
        self.collector.magnetic_radius =
            non_negative(self.collector.magnetic_radius, MAGNETIC_RADIUS);
        self.collector.magnetic_force =
            non_negative(self.collector.magnetic_force, MAGNETIC_FORCE);

        self.luck.player_luck_stat = clamp_or(self.luck.player_luck_stat, 0.0, MAX_LUCK_STAT);
        self.luck.clan_bonus = clamp_or(self.luck.clan_bonus, 0.0, MAX_BONUS);
        self.luck.event_bonus = clamp_or(self.luck.event_bonus, 0.0, MAX_BONUS);
        self
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

fn clamp_or(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
