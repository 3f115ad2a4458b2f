use super::{LootPool, LootTableDefinition};
use crate::rarity::RarityTier;

/// Fluent construction of loot tables in code
#[derive(Debug, Clone)]
pub struct LootTableBuilder {
    table: LootTableDefinition,
}

impl LootTableBuilder {
    pub fn new(table_id: &str) -> Self {
        Self {
            table: LootTableDefinition::new(table_id),
        }
    }

    pub fn display_name(mut self, name: &str) -> Self {
        self.table.display_name = name.to_string();
        self
    }

    /// Inclusive pick count range
    pub fn drop_count(mut self, min: u32, max: u32) -> Self {
        self.table.drop_count_range = (min, max);
        self
    }

    pub fn pool(mut self, name: &str, weight: f32, rarity: RarityTier, items: &[&str]) -> Self {
        self.table.pools.push(LootPool::new(name, weight, rarity, items));
        self
    }

    pub fn with_pool(mut self, pool: LootPool) -> Self {
        self.table.pools.push(pool);
        self
    }

    pub fn guaranteed(mut self, item_id: &str) -> Self {
        self.table.guaranteed_drops.push(item_id.to_string());
        self
    }

    pub fn build(self) -> LootTableDefinition {
        self.table
    }
}
