//! Per-session loot context.
//!
//! `LootSession` owns the RNG, the content tables and the luck state, and is
//! passed explicitly to whatever needs to roll loot. It is also where the pity
//! policy lives: a due pity forces the next rarity roll to Legendary.

use std::path::Path;

use crate::archetype::{ArchetypeProfile, ArchetypeStatMixer};
use crate::catalog::ItemCatalog;
use crate::chest::LootChest;
use crate::config::LootConfig;
use crate::error::LootResult;
use crate::loot::LootTableRegistry;
use crate::luck::LuckState;
use crate::rarity::RarityTier;
use crate::rng::{self, LootRng};
use crate::stats::{RolledItem, StatRangeTable};

/// Result of a rarity roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityRoll {
    pub rarity: RarityTier,
    /// Substituted by the pity policy rather than drawn
    pub forced: bool,
}

#[derive(Debug, Clone)]
pub struct LootSession {
    pub rng: LootRng,
    pub stats: StatRangeTable,
    pub tables: LootTableRegistry,
    pub catalog: ItemCatalog,
    pub luck: LuckState,
    pub mixer: ArchetypeStatMixer,
}

impl Default for LootSession {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SEED)
    }
}

impl LootSession {
    /// Standard stat table, starter catalog, no loot tables
    pub fn new(seed: u64) -> Self {
        Self {
            rng: rng::seeded(seed),
            stats: StatRangeTable::standard(),
            tables: LootTableRegistry::new(),
            catalog: ItemCatalog::starter(),
            luck: LuckState::default(),
            mixer: ArchetypeStatMixer::default(),
        }
    }

    /// Build a session and load content from the configured paths.
    ///
    /// A missing table directory is logged and skipped.
    pub fn from_config(config: &LootConfig) -> LootResult<Self> {
        let mut session = Self::new(config.seed);
        session.luck = config.luck.build(config.pity_threshold);

        for dir in &config.table_dirs {
            if dir.is_dir() {
                session.tables.load_dir(dir)?;
            } else {
                tracing::warn!(dir = %dir.display(), "Loot table directory not found");
            }
        }
        if let Some(path) = &config.catalog_path {
            session.load_catalog(path)?;
        }

        tracing::info!(
            seed = config.seed,
            tables = session.tables.len(),
            catalog = session.catalog.len(),
            "Loot session ready"
        );
        Ok(session)
    }

    /// Replace the catalog with the contents of `path`
    pub fn load_catalog(&mut self, path: &Path) -> LootResult<usize> {
        let mut catalog = ItemCatalog::new();
        let count = catalog.load_file(path)?;
        self.catalog = catalog;
        Ok(count)
    }

    /// Global luck times the source's own luck
    pub fn effective_luck(&self, source_luck: f32) -> f32 {
        self.luck.global_luck_multiplier() * source_luck.max(0.0)
    }

    /// Pity-aware rarity roll. Always notifies the pity tracker.
    pub fn roll_rarity(&mut self, source_luck: f32) -> RarityRoll {
        let roll = if self.luck.should_force_legendary() {
            tracing::info!(
                pity = self.luck.pity_counter(),
                "Pity threshold reached, forcing Legendary"
            );
            RarityRoll {
                rarity: RarityTier::Legendary,
                forced: true,
            }
        } else {
            let luck = self.effective_luck(source_luck);
            RarityRoll {
                rarity: RarityTier::roll(luck, &mut self.rng),
                forced: false,
            }
        };
        self.luck.notify_drop(roll.rarity);
        roll
    }

    /// Roll rarity then the catalog's stats for `item_id`
    pub fn roll_item(&mut self, item_id: &str, source_luck: f32) -> RolledItem {
        let rarity = self.roll_rarity(source_luck).rarity;
        self.roll_item_at(item_id, rarity)
    }

    /// Stats for `item_id` at a fixed rarity; no luck or pity involvement
    pub fn roll_item_at(&mut self, item_id: &str, rarity: RarityTier) -> RolledItem {
        let stats = self.catalog.stats_for(item_id);
        if stats.is_empty() && !self.catalog.has_item(item_id) {
            tracing::debug!(item_id, "Item not in catalog, rolling no stats");
        }
        self.stats.roll_item(item_id, rarity, stats, &mut self.rng)
    }

    /// Resolve a loot table; pool rarities feed the pity counter
    pub fn resolve(&mut self, table_id: &str, source_luck: f32) -> Vec<String> {
        let luck = self.effective_luck(source_luck);
        self.tables
            .resolve(table_id, luck, &mut self.luck, &mut self.rng)
    }

    /// Resolve a loot table into `(item_id, rarity)` pairs for spawning.
    ///
    /// Rolled items keep the pool rarity that fed the pity tracker; a catalog
    /// entry for the item overrides it. Guaranteed drops not in the catalog are
    /// Common.
    pub fn resolve_with_rarity(&mut self, table_id: &str, source_luck: f32) -> Vec<(String, RarityTier)> {
        let luck = self.effective_luck(source_luck);
        self.tables
            .resolve_with_rarity(table_id, luck, &mut self.luck, &mut self.rng)
            .into_iter()
            .map(|drop| {
                let rarity = self
                    .catalog
                    .get(&drop.item_id)
                    .map_or(drop.rarity, |item| item.rarity);
                (drop.item_id, rarity)
            })
            .collect()
    }

    /// Rarity shown for a resolved item id (catalog rarity, else Common)
    pub fn rarity_of(&self, item_id: &str) -> RarityTier {
        self.catalog
            .get(item_id)
            .map(|item| item.rarity)
            .unwrap_or_default()
    }

    pub fn open_chest(&mut self, chest: &mut LootChest) -> Option<Vec<String>> {
        chest.open(&self.catalog, &mut self.rng)
    }

    pub fn generate_enemy(&mut self, rarity: RarityTier) -> ArchetypeProfile {
        self.mixer.generate(rarity, &mut self.rng)
    }
}
