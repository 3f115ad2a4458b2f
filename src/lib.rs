//! Mech Defense - Procedural Loot Core
//!
//! Deterministic, seedable loot generation:
//! - Rarity tiers with luck-scaled drop rates
//! - Per-tier stat ranges and item stat rolls
//! - Weighted loot tables (JSON / RON) with guaranteed drops
//! - Luck aggregation and bad-luck protection (pity)
//! - World drop lifecycle with cap, expiry, magnetism and pickup
//! - Enemy archetype stat mixing
//! - Chests, Monte-Carlo balance checks, hot reload and a Bevy plugin

pub mod archetype;
pub mod balance;
pub mod catalog;
pub mod chest;
pub mod config;
pub mod constants;
pub mod drops;
pub mod error;
pub mod hotreload;
pub mod logging;
pub mod loot;
pub mod luck;
pub mod plugin;
pub mod rarity;
pub mod rng;
pub mod session;
pub mod stats;

pub use error::{LootError, LootResult};
pub use rarity::RarityTier;
pub use session::LootSession;
