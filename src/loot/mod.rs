//! Loot table resolution.
//!
//! A table is a set of weighted pools plus guaranteed drops. Resolving a table:
//! guaranteed drops first, then `drop_count` weighted pool picks, each pick
//! followed by a uniform item pick and a rarity notification to the observer.
//! Resolving never spawns anything.

mod builder;
mod loader;

pub use builder::LootTableBuilder;
pub use loader::{is_table_file, load_table_file};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{LootError, LootResult};
use crate::luck::DropObserver;
use crate::rarity::RarityTier;

/// Upper clamp for luck applied to pool weights
const MAX_POOL_LUCK: f32 = 1_000_000.0;

/// Weighted pool of item ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootPool {
    #[serde(default, alias = "pool_name")]
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Rarity reported for items drawn from this pool
    #[serde(default)]
    pub rarity: RarityTier,
    #[serde(default)]
    pub items: Vec<String>,
}

impl LootPool {
    pub fn new(name: &str, weight: f32, rarity: RarityTier, items: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            weight,
            rarity,
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Weight after luck; empty pools weigh nothing
    pub fn effective_weight(&self, luck_multiplier: f32) -> f32 {
        if self.items.is_empty() || !(self.weight > 0.0) {
            return 0.0;
        }
        if self.rarity.is_rare_or_above() {
            self.weight * luck_multiplier
        } else {
            self.weight
        }
    }
}

fn default_weight() -> f32 {
    1.0
}

fn default_drop_count() -> (u32, u32) {
    (1, 3)
}

/// Complete loot table for an enemy, chest or other source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTableDefinition {
    #[serde(alias = "enemy_type")]
    pub table_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, alias = "loot_pools")]
    pub pools: Vec<LootPool>,
    #[serde(default)]
    pub guaranteed_drops: Vec<String>,
    /// Inclusive (min, max) number of pool picks
    #[serde(default = "default_drop_count")]
    pub drop_count_range: (u32, u32),
}

impl LootTableDefinition {
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            display_name: String::new(),
            pools: Vec::new(),
            guaranteed_drops: Vec::new(),
            drop_count_range: (0, 0),
        }
    }

    /// Level-scaled table for a generic enemy type
    pub fn for_enemy(enemy_type: &str, level: u32) -> Self {
        let credits = format!("credits_{level}");
        let material = format!("material_{level}");
        let upgrade = format!("upgrade_{level}");
        let weapon = format!("weapon_{level}");

        LootTableBuilder::new(enemy_type)
            .display_name(&format!("{enemy_type} Loot"))
            .drop_count((level / 5).max(1), (level / 3).max(2))
            .pool("credits", 0.7, RarityTier::Common, &[&credits])
            .pool("materials", 0.2, RarityTier::Uncommon, &[&material])
            .pool("upgrades", 0.08, RarityTier::Rare, &[&upgrade])
            .pool("weapons", 0.02, RarityTier::Epic, &[&weapon])
            .build()
    }

    pub fn total_weight(&self) -> f32 {
        self.pools.iter().map(|p| p.weight.max(0.0)).sum()
    }

    /// Rescale pool weights to sum to 1.0 (no-op when the total is 0)
    pub fn normalize_weights(&mut self) {
        let total = self.total_weight();
        if total > 0.0 {
            for pool in &mut self.pools {
                pool.weight = pool.weight.max(0.0) / total;
            }
        }
    }

    pub fn pools_of_rarity(&self, rarity: RarityTier) -> Vec<&LootPool> {
        self.pools.iter().filter(|p| p.rarity == rarity).collect()
    }

    /// Highest-rarity pool (first one on ties)
    pub fn rarest_pool(&self) -> Option<&LootPool> {
        self.pools.iter().fold(None, |best: Option<&LootPool>, pool| match best {
            Some(b) if b.rarity >= pool.rarity => Some(b),
            _ => Some(pool),
        })
    }

    /// Can this table roll anything beyond its guaranteed drops?
    pub fn has_rollable_pools(&self) -> bool {
        self.pools.iter().any(|p| p.effective_weight(1.0) > 0.0)
    }

    pub fn validate(&self) -> LootResult<()> {
        let invalid = |reason: String| LootError::InvalidTable {
            table_id: self.table_id.clone(),
            reason,
        };

        if self.table_id.trim().is_empty() {
            return Err(invalid("empty table id".into()));
        }
        let (min, max) = self.drop_count_range;
        if min > max {
            return Err(invalid(format!("drop_count_range min {min} > max {max}")));
        }
        if let Some(pool) = self
            .pools
            .iter()
            .find(|p| !p.weight.is_finite() || p.weight < 0.0)
        {
            return Err(invalid(format!(
                "pool '{}' has invalid weight {}",
                pool.name, pool.weight
            )));
        }
        if max > 0 && !self.has_rollable_pools() && self.guaranteed_drops.is_empty() {
            tracing::warn!(
                table_id = %self.table_id,
                "Table has no weighted pools and no guaranteed drops"
            );
        }
        Ok(())
    }
}

/// Named loot tables and the resolve operation
#[derive(Debug, Clone, Default)]
pub struct LootTableRegistry {
    tables: HashMap<String, LootTableDefinition>,
}

impl LootTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert, replacing any table with the same id
    pub fn insert(&mut self, table: LootTableDefinition) -> LootResult<()> {
        table.validate()?;
        self.tables.insert(table.table_id.clone(), table);
        Ok(())
    }

    pub fn get(&self, table_id: &str) -> Option<&LootTableDefinition> {
        self.tables.get(table_id)
    }

    pub fn remove(&mut self, table_id: &str) -> Option<LootTableDefinition> {
        self.tables.remove(table_id)
    }

    pub fn contains(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Sorted table ids
    pub fn table_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Item ids dropped by `table_id`. Unknown tables yield nothing.
    pub fn resolve<R, O>(
        &self,
        table_id: &str,
        luck_multiplier: f32,
        observer: &mut O,
        rng: &mut R,
    ) -> Vec<String>
    where
        R: Rng + ?Sized,
        O: DropObserver + ?Sized,
    {
        self.resolve_with_rarity(table_id, luck_multiplier, observer, rng)
            .into_iter()
            .map(|drop| drop.item_id)
            .collect()
    }

    /// Like [`resolve`](Self::resolve), keeping the rarity reported for each item
    pub fn resolve_with_rarity<R, O>(
        &self,
        table_id: &str,
        luck_multiplier: f32,
        observer: &mut O,
        rng: &mut R,
    ) -> Vec<ResolvedDrop>
    where
        R: Rng + ?Sized,
        O: DropObserver + ?Sized,
    {
        let Some(table) = self.tables.get(table_id) else {
            tracing::warn!(table_id, "Loot table not found");
            return Vec::new();
        };
        resolve_table_with_rarity(table, luck_multiplier, observer, rng)
    }
}

/// One resolved item and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDrop {
    pub item_id: String,
    /// Pool rarity for rolled items; Common for guaranteed drops
    pub rarity: RarityTier,
    pub guaranteed: bool,
}

/// Resolve a table definition directly (registry-free)
pub fn resolve_table<R, O>(
    table: &LootTableDefinition,
    luck_multiplier: f32,
    observer: &mut O,
    rng: &mut R,
) -> Vec<String>
where
    R: Rng + ?Sized,
    O: DropObserver + ?Sized,
{
    resolve_table_with_rarity(table, luck_multiplier, observer, rng)
        .into_iter()
        .map(|drop| drop.item_id)
        .collect()
}

/// Resolve a table; every rolled item carries the rarity its pool reported
pub fn resolve_table_with_rarity<R, O>(
    table: &LootTableDefinition,
    luck_multiplier: f32,
    observer: &mut O,
    rng: &mut R,
) -> Vec<ResolvedDrop>
where
    R: Rng + ?Sized,
    O: DropObserver + ?Sized,
{
    let luck = sanitize_luck(luck_multiplier);
    let mut drops: Vec<ResolvedDrop> = table
        .guaranteed_drops
        .iter()
        .map(|item_id| ResolvedDrop {
            item_id: item_id.clone(),
            rarity: RarityTier::Common,
            guaranteed: true,
        })
        .collect();

    let (lo, hi) = table.drop_count_range;
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let drop_count = rng.gen_range(lo..=hi);

    for _ in 0..drop_count {
        let Some(pool) = select_pool(&table.pools, luck, rng) else {
            continue;
        };
        let item = &pool.items[rng.gen_range(0..pool.items.len())];
        drops.push(ResolvedDrop {
            item_id: item.clone(),
            rarity: pool.rarity,
            guaranteed: false,
        });
        observer.notify_drop(pool.rarity);
    }

    tracing::debug!(
        table_id = %table.table_id,
        drop_count,
        total = drops.len(),
        "Resolved loot table"
    );
    drops
}

/// Cumulative-weight pick; first pool whose running total reaches the draw wins
fn select_pool<'a, R: Rng + ?Sized>(
    pools: &'a [LootPool],
    luck: f32,
    rng: &mut R,
) -> Option<&'a LootPool> {
    let weights: Vec<f32> = pools.iter().map(|p| p.effective_weight(luck)).collect();
    let total: f32 = weights.iter().sum();
    if !(total > 0.0) {
        return None;
    }

    let roll = rng.gen::<f32>() * total;
    let mut cumulative = 0.0;
    for (pool, weight) in pools.iter().zip(&weights) {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if roll <= cumulative {
            return Some(pool);
        }
    }

    // float shortfall: last eligible pool
    pools
        .iter()
        .zip(&weights)
        .rev()
        .find(|(_, w)| **w > 0.0)
        .map(|(p, _)| p)
}

fn sanitize_luck(luck: f32) -> f32 {
    if luck.is_nan() {
        1.0
    } else {
        luck.clamp(0.0, MAX_POOL_LUCK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luck::LuckState;
    use crate::rng::seeded;

    fn single_item_table() -> LootTableDefinition {
        LootTableBuilder::new("T")
            .drop_count(1, 1)
            .pool("only", 1.0, RarityTier::Common, &["itemA"])
            .build()
    }

    #[test]
    fn test_single_pool_always_returns_item() {
        let mut registry = LootTableRegistry::new();
        registry.insert(single_item_table()).unwrap();
        let mut rng = seeded(42);
        let mut luck = LuckState::default();
        for _ in 0..200 {
            assert_eq!(registry.resolve("T", 1.0, &mut luck, &mut rng), vec!["itemA"]);
        }
    }

    #[test]
    fn test_guaranteed_only() {
        let table = LootTableBuilder::new("chest")
            .drop_count(0, 0)
            .guaranteed("x")
            .pool("junk", 1.0, RarityTier::Common, &["scrap"])
            .build();
        let mut rng = seeded(1);
        for _ in 0..100 {
            assert_eq!(resolve_table(&table, 1.0, &mut (), &mut rng), vec!["x"]);
        }
    }

    #[test]
    fn test_resolved_rarity_matches_notified_pool() {
        let table = LootTableBuilder::new("boss")
            .drop_count(1, 1)
            .guaranteed("boss_key")
            .pool("crowns", 1.0, RarityTier::Legendary, &["crown"])
            .build();
        let mut rng = seeded(5);
        let mut luck = LuckState::default();
        luck.set_pity_counter(40);

        let drops = resolve_table_with_rarity(&table, 1.0, &mut luck, &mut rng);
        assert_eq!(
            drops,
            vec![
                ResolvedDrop {
                    item_id: "boss_key".into(),
                    rarity: RarityTier::Common,
                    guaranteed: true,
                },
                ResolvedDrop {
                    item_id: "crown".into(),
                    rarity: RarityTier::Legendary,
                    guaranteed: false,
                },
            ]
        );
        assert_eq!(luck.pity_counter(), 0);
    }

    #[test]
    fn test_unknown_table_is_empty() {
        let registry = LootTableRegistry::new();
        let mut rng = seeded(1);
        assert!(registry.resolve("nope", 1.0, &mut (), &mut rng).is_empty());
    }

    #[test]
    fn test_drop_count_within_range() {
        let table = LootTableBuilder::new("grunt")
            .drop_count(2, 4)
            .guaranteed("credits")
            .pool("a", 3.0, RarityTier::Common, &["a1", "a2"])
            .pool("b", 1.0, RarityTier::Rare, &["b1"])
            .build();
        let mut rng = seeded(77);
        for _ in 0..500 {
            let drops = resolve_table(&table, 1.0, &mut (), &mut rng);
            assert!(drops.len() >= 3 && drops.len() <= 5);
            assert_eq!(drops[0], "credits");
        }
    }

    #[test]
    fn test_notifies_pool_rarity() {
        let table = LootTableBuilder::new("boss")
            .drop_count(3, 3)
            .guaranteed("key")
            .pool("legendary", 1.0, RarityTier::Legendary, &["crown"])
            .build();
        let mut luck = LuckState::default();
        luck.set_pity_counter(50);
        let mut rng = seeded(2);
        resolve_table(&table, 1.0, &mut luck, &mut rng);
        assert_eq!(luck.pity_counter(), 0);

        let commons = LootTableBuilder::new("grunt")
            .drop_count(3, 3)
            .guaranteed("key")
            .pool("common", 1.0, RarityTier::Common, &["scrap"])
            .build();
        resolve_table(&commons, 1.0, &mut luck, &mut rng);
        // guaranteed drops are not luck events
        assert_eq!(luck.pity_counter(), 3);
    }

    #[test]
    fn test_weighted_selection_tracks_weights() {
        let table = LootTableBuilder::new("w")
            .drop_count(1, 1)
            .pool("heavy", 9.0, RarityTier::Common, &["heavy"])
            .pool("light", 1.0, RarityTier::Common, &["light"])
            .build();
        let mut rng = seeded(123);
        let heavy = (0..10_000)
            .filter(|_| resolve_table(&table, 1.0, &mut (), &mut rng)[0] == "heavy")
            .count();
        assert!((8_700..=9_300).contains(&heavy), "heavy = {heavy}");
    }

    #[test]
    fn test_luck_boosts_rare_pools_only() {
        let table = LootTableBuilder::new("w")
            .drop_count(1, 1)
            .pool("common", 1.0, RarityTier::Common, &["c"])
            .pool("rare", 1.0, RarityTier::Rare, &["r"])
            .build();
        let count_rare = |luck: f32| {
            let mut rng = seeded(5);
            (0..10_000)
                .filter(|_| resolve_table(&table, luck, &mut (), &mut rng)[0] == "r")
                .count()
        };
        assert!(count_rare(3.0) > count_rare(1.0));
        assert_eq!(count_rare(0.0), 0);
    }

    #[test]
    fn test_zero_weight_and_empty_pools_skipped() {
        let table = LootTableBuilder::new("z")
            .drop_count(5, 5)
            .pool("zero", 0.0, RarityTier::Common, &["never"])
            .pool("empty", 10.0, RarityTier::Common, &[])
            .pool("real", 0.5, RarityTier::Common, &["always"])
            .build();
        let mut rng = seeded(8);
        let drops = resolve_table(&table, 1.0, &mut (), &mut rng);
        assert_eq!(drops, vec!["always"; 5]);
    }

    #[test]
    fn test_no_rollable_pools_yields_guaranteed() {
        let table = LootTableBuilder::new("g")
            .drop_count(2, 2)
            .guaranteed("x")
            .build();
        let mut rng = seeded(8);
        assert_eq!(resolve_table(&table, 1.0, &mut (), &mut rng), vec!["x"]);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let mut table = single_item_table();
        table.drop_count_range = (3, 1);
        assert!(table.validate().is_err());

        let mut table = single_item_table();
        table.pools[0].weight = -1.0;
        assert!(matches!(
            table.validate(),
            Err(LootError::InvalidTable { .. })
        ));

        let table = LootTableDefinition::new("  ");
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_for_enemy_scaling() {
        let table = LootTableDefinition::for_enemy("grunt", 30);
        assert_eq!(table.drop_count_range, (6, 10));
        assert_eq!(table.pools.len(), 4);
        assert_eq!(table.rarest_pool().unwrap().rarity, RarityTier::Epic);
        assert!(table.validate().is_ok());

        let low = LootTableDefinition::for_enemy("grunt", 1);
        assert_eq!(low.drop_count_range, (1, 2));
    }

    #[test]
    fn test_normalize_weights() {
        let mut table = LootTableDefinition::for_enemy("grunt", 5);
        table.pools[0].weight = 7.0;
        table.normalize_weights();
        assert!((table.total_weight() - 1.0).abs() < 1e-5);
        assert_eq!(table.pools_of_rarity(RarityTier::Uncommon).len(), 1);
    }

    #[test]
    fn test_original_json_field_names() {
        let json = r#"{
            "enemy_type": "hunter",
            "loot_pools": [
                { "pool_name": "parts", "weight": 2.0, "items": ["servo", "plate"] },
                { "pool_name": "cores", "weight": 0.5, "rarity": "Epic", "items": ["core"] }
            ],
            "guaranteed_drops": ["credits"],
            "drop_count_range": [1, 2]
        }"#;
        let table: LootTableDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(table.table_id, "hunter");
        assert_eq!(table.pools[0].name, "parts");
        assert_eq!(table.pools[0].rarity, RarityTier::Common);
        assert_eq!(table.pools[1].rarity, RarityTier::Epic);
        assert_eq!(table.drop_count_range, (1, 2));
    }

    #[test]
    fn test_registry_table_ids_sorted() {
        let mut registry = LootTableRegistry::new();
        registry.insert(LootTableDefinition::for_enemy("b", 1)).unwrap();
        registry.insert(LootTableDefinition::for_enemy("a", 1)).unwrap();
        assert_eq!(registry.table_ids(), vec!["a", "b"]);
        assert!(registry.remove("a").is_some());
        assert_eq!(registry.len(), 1);
    }
}
