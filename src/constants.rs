//! Centralized loot constants.
//!
//! Defaults for the tunables in `LootConfig` and the fixed balance numbers
//! shared by several modules. Per-tier tables (drop rates, stat ranges,
//! archetype multipliers) stay in their own modules.

// =====================================================
// Bad-luck protection
// =====================================================

/// Kills without a Legendary+ drop before one is forced
pub const PITY_THRESHOLD: u32 = 100;

/// Warning window before the pity threshold (kills remaining)
pub const PITY_WARNING_WINDOW: u32 = 10;

// =====================================================
// Luck modifiers
// =====================================================

/// Luck multiplier gained per player luck point (+0.1% per point)
pub const LUCK_PER_POINT: f32 = 0.001;

/// Upper clamp for the player luck stat
pub const MAX_LUCK_STAT: f32 = 1000.0;

/// Additive cap for clan/pass/event bonuses (+200%)
pub const MAX_BONUS: f32 = 2.0;

/// Premium pass bonus (+10%)
pub const PREMIUM_PASS_BONUS: f32 = 0.10;

// =====================================================
// Drops in the world
// =====================================================

/// Hard cap on concurrently active drops
pub const MAX_ACTIVE_DROPS: usize = 100;

/// Seconds before an untouched drop despawns
pub const DROP_LIFETIME_SECS: f32 = 60.0;

/// Radius used when several items spawn from one source
pub const DROP_SCATTER_RADIUS: f32 = 2.0;

/// Height offset applied to scattered drops
pub const DROP_HEIGHT_OFFSET: f32 = 0.5;

// =====================================================
// Collectors
// =====================================================

/// Immediate pickup radius
pub const PICKUP_RADIUS: f32 = 2.0;

/// Magnetic attraction radius
pub const MAGNETIC_RADIUS: f32 = 5.0;

/// Pull speed at zero distance (units/second)
pub const MAGNETIC_FORCE: f32 = 8.0;

// =====================================================
// Session
// =====================================================

/// Default session seed
pub const DEFAULT_SEED: u64 = 42;
