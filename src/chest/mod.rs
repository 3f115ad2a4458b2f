//! Loot chests: guaranteed contents plus catalog items rolled with a tier boost.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::rarity::RarityTier;

/// Luck applied to item rarity rolls for a chest of `rarity`
pub fn chest_boost(rarity: RarityTier) -> f32 {
    match rarity {
        RarityTier::Common => 1.0,
        RarityTier::Uncommon => 1.5,
        RarityTier::Rare => 2.0,
        RarityTier::Epic => 3.0,
        RarityTier::Legendary => 5.0,
        RarityTier::Exotic | RarityTier::Mythic => 10.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootChest {
    pub rarity: RarityTier,
    pub min_items: u32,
    pub max_items: u32,
    #[serde(default)]
    pub guaranteed: Vec<String>,
    #[serde(default)]
    pub opened: bool,
}

impl Default for LootChest {
    fn default() -> Self {
        Self::new(RarityTier::Common)
    }
}

impl LootChest {
    pub fn new(rarity: RarityTier) -> Self {
        Self {
            rarity,
            min_items: 1,
            max_items: 3,
            guaranteed: Vec::new(),
            opened: false,
        }
    }

    pub fn with_items(mut self, min_items: u32, max_items: u32) -> Self {
        self.min_items = min_items.min(max_items);
        self.max_items = min_items.max(max_items);
        self
    }

    pub fn with_guaranteed(mut self, item_id: &str) -> Self {
        self.guaranteed.push(item_id.to_string());
        self
    }

    pub fn boost(&self) -> f32 {
        chest_boost(self.rarity)
    }

    /// Roll the contents once. Returns `None` if the chest was already opened.
    ///
    /// Rolled rarities with no catalog item are skipped.
    pub fn open<R: Rng + ?Sized>(
        &mut self,
        catalog: &ItemCatalog,
        rng: &mut R,
    ) -> Option<Vec<String>> {
        if self.opened {
            tracing::debug!(rarity = ?self.rarity, "Chest already opened");
            return None;
        }
        self.opened = true;

        let mut items = self.guaranteed.clone();
        let (lo, hi) = (
            self.min_items.min(self.max_items),
            self.min_items.max(self.max_items),
        );
        let count = rng.gen_range(lo..=hi);
        let boost = self.boost();

        for _ in 0..count {
            let rarity = RarityTier::roll(boost, rng);
            match catalog.random_of_rarity(rarity, rng) {
                Some(item) => items.push(item.item_id.clone()),
                None => tracing::debug!(?rarity, "No catalog item for rolled chest rarity"),
            }
        }

        tracing::info!(rarity = ?self.rarity, count = items.len(), "Chest opened");
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::rng::seeded;

    #[test]
    fn test_open_once() {
        let catalog = ItemCatalog::starter();
        let mut chest = LootChest::new(RarityTier::Epic).with_guaranteed("key_card");
        let mut rng = seeded(4);

        let items = chest.open(&catalog, &mut rng).unwrap();
        assert_eq!(items[0], "key_card");
        assert!(items.len() >= 2 && items.len() <= 4);
        assert!(chest.opened);
        assert!(chest.open(&catalog, &mut rng).is_none());
    }

    #[test]
    fn test_missing_rarity_skipped() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(CatalogItem::new("only_mythic", "core", RarityTier::Mythic, &[]));
        let mut chest = LootChest::new(RarityTier::Common).with_items(5, 5);
        let mut rng = seeded(9);
        let items = chest.open(&catalog, &mut rng).unwrap();
        assert!(items.len() <= 5);
        assert!(items.iter().all(|i| i == "only_mythic"));
    }

    #[test]
    fn test_boost_table() {
        assert_eq!(chest_boost(RarityTier::Common), 1.0);
        assert_eq!(chest_boost(RarityTier::Legendary), 5.0);
        assert_eq!(chest_boost(RarityTier::Mythic), 10.0);
        for pair in RarityTier::ALL.windows(2) {
            assert!(chest_boost(pair[1]) >= chest_boost(pair[0]));
        }
    }

    #[test]
    fn test_better_chests_roll_rarer() {
        let catalog = ItemCatalog::starter();
        let rare_count = |tier: RarityTier| {
            let mut rng = seeded(21);
            (0..2_000)
                .flat_map(|_| {
                    let mut chest = LootChest::new(tier).with_items(1, 1);
                    chest.open(&catalog, &mut rng).unwrap_or_default()
                })
                .filter(|id| catalog.get(id).is_some_and(|i| i.rarity.is_rare_or_above()))
                .count()
        };
        assert!(rare_count(RarityTier::Legendary) > rare_count(RarityTier::Common));
    }
}
