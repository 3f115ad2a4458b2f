//! Luck aggregation and bad-luck protection.
//!
//! global = player_luck * difficulty * (1 + clan + pass + event)
//!
//! The pity counter counts drops since the last Legendary-or-better. Reaching
//! the threshold only raises `should_force_legendary()`; substituting the
//! forced result is the caller's job (see `LootSession::roll_rarity`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    LUCK_PER_POINT, MAX_BONUS, MAX_LUCK_STAT, PITY_THRESHOLD, PITY_WARNING_WINDOW,
    PREMIUM_PASS_BONUS,
};
use crate::rarity::RarityTier;

/// Pity counter relative to the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PityStatus {
    Building,
    Approaching { remaining: u32 },
    /// At or past the threshold; stays here until a Legendary drops
    Due { counter: u32 },
}

/// Difficulty presets and their drop multipliers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn multiplier(&self) -> f32 {
        match self {
            Self::Easy => 0.8,
            Self::Normal => 1.0,
            Self::Hard => 1.5,
            Self::Nightmare => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Nightmare => "nightmare",
        }
    }
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    /// Case-insensitive; unknown names are Normal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            "nightmare" => Self::Nightmare,
            _ => Self::Normal,
        })
    }
}

/// Session-wide luck modifiers and the pity counter
#[derive(Debug, Clone, PartialEq)]
pub struct LuckState {
    player_luck: f32,
    difficulty: Difficulty,
    clan_bonus: f32,
    pass_bonus: f32,
    event_bonus: f32,
    pity_counter: u32,
    pity_threshold: u32,
}

impl Default for LuckState {
    fn default() -> Self {
        Self::new(PITY_THRESHOLD)
    }
}

impl LuckState {
    pub fn new(pity_threshold: u32) -> Self {
        Self {
            player_luck: 1.0,
            difficulty: Difficulty::Normal,
            clan_bonus: 0.0,
            pass_bonus: 0.0,
            event_bonus: 0.0,
            pity_counter: 0,
            pity_threshold: pity_threshold.max(1),
        }
    }

    /// Combined multiplier fed into rarity rolls
    pub fn global_luck_multiplier(&self) -> f32 {
        self.player_luck
            * self.difficulty.multiplier()
            * (1.0 + self.clan_bonus + self.pass_bonus + self.event_bonus)
    }

    /// Player luck stat, clamped to [0, 1000], +0.1% per point
    pub fn set_player_luck(&mut self, luck_stat: f32) {
        let stat = clamp_finite(luck_stat, 0.0, MAX_LUCK_STAT);
        self.player_luck = 1.0 + stat * LUCK_PER_POINT;
        tracing::debug!(multiplier = self.player_luck, "Player luck set");
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        tracing::debug!(
            difficulty = difficulty.as_str(),
            multiplier = difficulty.multiplier(),
            "Difficulty multiplier set"
        );
    }

    /// Difficulty by name; unknown names fall back to Normal
    pub fn set_difficulty_by_name(&mut self, name: &str) {
        let difficulty: Difficulty = name.parse().unwrap_or_default();
        self.set_difficulty(difficulty);
    }

    pub fn set_clan_bonus(&mut self, bonus: f32) {
        self.clan_bonus = clamp_finite(bonus, 0.0, MAX_BONUS);
    }

    pub fn set_pass_bonus(&mut self, bonus: f32) {
        self.pass_bonus = clamp_finite(bonus, 0.0, MAX_BONUS);
    }

    /// Premium pass grants a flat +10%
    pub fn set_premium_pass(&mut self, has_premium: bool) {
        self.pass_bonus = if has_premium { PREMIUM_PASS_BONUS } else { 0.0 };
    }

    pub fn set_event_bonus(&mut self, bonus: f32) {
        self.event_bonus = clamp_finite(bonus, 0.0, MAX_BONUS);
    }

    pub fn player_luck(&self) -> f32 {
        self.player_luck
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn clan_bonus(&self) -> f32 {
        self.clan_bonus
    }

    pub fn pass_bonus(&self) -> f32 {
        self.pass_bonus
    }

    pub fn event_bonus(&self) -> f32 {
        self.event_bonus
    }

    pub fn pity_counter(&self) -> u32 {
        self.pity_counter
    }

    pub fn pity_threshold(&self) -> u32 {
        self.pity_threshold
    }

    /// Restore a persisted counter
    pub fn set_pity_counter(&mut self, counter: u32) {
        self.pity_counter = counter;
    }

    /// Record one resolved drop
    pub fn notify_drop(&mut self, rarity: RarityTier) {
        if rarity.is_legendary_tier() {
            self.reset_pity();
        } else {
            self.increment_pity();
        }
    }

    pub fn should_force_legendary(&self) -> bool {
        self.pity_counter >= self.pity_threshold
    }

    /// Drops left before the pity guarantee kicks in
    pub fn kills_until_pity(&self) -> u32 {
        self.pity_threshold.saturating_sub(self.pity_counter)
    }

    /// Where the counter stands relative to the threshold
    pub fn pity_status(&self) -> PityStatus {
        let remaining = self.kills_until_pity();
        if remaining == 0 {
            PityStatus::Due {
                counter: self.pity_counter,
            }
        } else if remaining <= PITY_WARNING_WINDOW {
            PityStatus::Approaching { remaining }
        } else {
            PityStatus::Building
        }
    }

    fn increment_pity(&mut self) {
        self.pity_counter = self.pity_counter.saturating_add(1);

        match self.pity_status() {
            // keeps reporting until a Legendary actually drops
            PityStatus::Due { counter } => tracing::info!(
                counter,
                "Pity threshold reached, next drop will be Legendary"
            ),
            PityStatus::Approaching { remaining } => {
                tracing::debug!(remaining, "Approaching guaranteed Legendary")
            }
            PityStatus::Building => {}
        }
    }

    fn reset_pity(&mut self) {
        if self.should_force_legendary() {
            tracing::info!("Pity activated, Legendary dropped");
        }
        self.pity_counter = 0;
    }

    /// Back to defaults; the pity threshold is configuration and is kept
    pub fn reset(&mut self) {
        *self = Self::new(self.pity_threshold);
        tracing::debug!("All loot modifiers reset to default");
    }

    pub fn snapshot(&self) -> LuckSnapshot {
        LuckSnapshot {
            player_luck: self.player_luck,
            difficulty: self.difficulty,
            clan_bonus: self.clan_bonus,
            pass_bonus: self.pass_bonus,
            event_bonus: self.event_bonus,
            pity_counter: self.pity_counter,
        }
    }

    /// Apply a snapshot; values pass through the same clamps as the setters
    pub fn restore(&mut self, snapshot: &LuckSnapshot) {
        self.player_luck = clamp_finite(
            snapshot.player_luck,
            1.0,
            1.0 + MAX_LUCK_STAT * LUCK_PER_POINT,
        );
        self.difficulty = snapshot.difficulty;
        self.set_clan_bonus(snapshot.clan_bonus);
        self.set_pass_bonus(snapshot.pass_bonus);
        self.set_event_bonus(snapshot.event_bonus);
        self.pity_counter = snapshot.pity_counter;
    }
}

impl fmt::Display for LuckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loot Modifiers:")?;
        writeln!(f, "  Player Luck: {:.3}x", self.player_luck)?;
        writeln!(f, "  Difficulty: {:.1}x", self.difficulty.multiplier())?;
        writeln!(f, "  Clan Perk: +{:.1}%", self.clan_bonus * 100.0)?;
        writeln!(f, "  Pass: +{:.1}%", self.pass_bonus * 100.0)?;
        writeln!(f, "  Event: +{:.1}%", self.event_bonus * 100.0)?;
        writeln!(f, "  TOTAL: {:.3}x", self.global_luck_multiplier())?;
        write!(
            f,
            "  Bad Luck Protection: {}/{}",
            self.pity_counter, self.pity_threshold
        )
    }
}

/// Receives the rarity of every rolled drop, in resolution order
pub trait DropObserver {
    fn notify_drop(&mut self, rarity: RarityTier);
}

impl DropObserver for LuckState {
    fn notify_drop(&mut self, rarity: RarityTier) {
        LuckState::notify_drop(self, rarity);
    }
}

/// Observer that ignores drops (previews, simulations)
impl DropObserver for () {
    fn notify_drop(&mut self, _rarity: RarityTier) {}
}

/// Plain data for session persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuckSnapshot {
    pub player_luck: f32,
    pub difficulty: Difficulty,
    pub clan_bonus: f32,
    pub pass_bonus: f32,
    pub event_bonus: f32,
    pub pity_counter: u32,
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
