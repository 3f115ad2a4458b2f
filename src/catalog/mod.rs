//! Item catalog: item id → display name, category, rarity and rollable stats.
//!
//! Chests pick items by rarity from here, and sessions look up which stats an
//! item rolls.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{LootError, LootResult};
use crate::rarity::RarityTier;
use crate::stats::StatId;

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub item_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rarity: RarityTier,
    #[serde(default)]
    pub stats: Vec<StatId>,
}

impl CatalogItem {
    pub fn new(item_id: &str, category: &str, rarity: RarityTier, stats: &[StatId]) -> Self {
        Self {
            item_id: item_id.to_string(),
            display_name: item_id.replace('_', " "),
            category: category.to_string(),
            rarity,
            stats: stats.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, CatalogItem>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small built-in catalog with one item per tier
    pub fn starter() -> Self {
        use StatId::*;
        let mut catalog = Self::new();
        for item in [
            CatalogItem::new("scrap_plating", "armor", RarityTier::Common, &[Hp, PhysicalResist]),
            CatalogItem::new("servo_legs", "legs", RarityTier::Uncommon, &[Speed, Dodge]),
            CatalogItem::new("plasma_rifle", "weapon", RarityTier::Rare, &[Damage, FireRate, Accuracy]),
            CatalogItem::new("ion_shield", "shield", RarityTier::Epic, &[Shield, ElectricResist, Regeneration]),
            CatalogItem::new("titan_core", "core", RarityTier::Legendary, &[Hp, Energy, EnergyEfficiency]),
            CatalogItem::new("void_lance", "weapon", RarityTier::Exotic, &[Damage, CritChance, CritDamage, Range]),
            CatalogItem::new("swarm_hive", "drone", RarityTier::Mythic, &[DroneSpeed, DroneDamage, DroneHealth]),
        ] {
            catalog.insert(item);
        }
        catalog
    }

    /// Insert or replace; returns the previous entry
    pub fn insert(&mut self, item: CatalogItem) -> Option<CatalogItem> {
        self.items.insert(item.item_id.clone(), item)
    }

    pub fn get(&self, item_id: &str) -> Option<&CatalogItem> {
        self.items.get(item_id)
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.items.contains_key(item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stats an item rolls; empty for unknown items
    pub fn stats_for(&self, item_id: &str) -> &[StatId] {
        self.items
            .get(item_id)
            .map(|item| item.stats.as_slice())
            .unwrap_or(&[])
    }

    /// Items of one rarity, sorted by id so picks are seed-stable
    pub fn items_by_rarity(&self, rarity: RarityTier) -> Vec<&CatalogItem> {
        let mut items: Vec<&CatalogItem> =
            self.items.values().filter(|i| i.rarity == rarity).collect();
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        items
    }

    pub fn items_by_category(&self, category: &str) -> Vec<&CatalogItem> {
        let mut items: Vec<&CatalogItem> = self
            .items
            .values()
            .filter(|i| i.category.eq_ignore_ascii_case(category))
            .collect();
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        items
    }

    /// Uniform pick among items of `rarity`
    pub fn random_of_rarity<R: Rng + ?Sized>(
        &self,
        rarity: RarityTier,
        rng: &mut R,
    ) -> Option<&CatalogItem> {
        let items = self.items_by_rarity(rarity);
        if items.is_empty() {
            return None;
        }
        Some(items[rng.gen_range(0..items.len())])
    }

    /// Load a list of items from a `.json` or `.ron` file, merging into the catalog
    pub fn load_file(&mut self, path: &Path) -> LootResult<usize> {
        let content = fs::read_to_string(path)?;
        let items: Vec<CatalogItem> = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("ron") => ron::from_str(&content)?,
            _ => return Err(LootError::UnsupportedFormat(path.to_path_buf())),
        };
        let count = items.len();
        for item in items {
            self.insert(item);
        }
        tracing::info!(path = %path.display(), count, "Item catalog loaded");
        Ok(count)
    }
}
