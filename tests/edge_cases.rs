//! Edge case & boundary tests
//!
//! Behavior at system boundaries:
//! - Empty / malformed content files → errors, never panics
//! - Unknown table ids, unknown items, unknown difficulty names
//! - Extreme luck values (0, huge, NaN, negative)
//! - Zero-width ranges, zero drop counts, cap of one
//! - Non-finite tick deltas and radii

use bevy::math::Vec3;
use tempfile::TempDir;

use loot_core::catalog::ItemCatalog;
use loot_core::chest::LootChest;
use loot_core::config::LootConfig;
use loot_core::drops::{Collector, DropEvent, DropSpawnCoordinator};
use loot_core::loot::{resolve_table, LootPool, LootTableBuilder, LootTableDefinition, LootTableRegistry};
use loot_core::luck::{Difficulty, LuckState};
use loot_core::rarity::RarityTier;
use loot_core::rng::seeded;
use loot_core::stats::{StatId, StatRange, StatRangeTable};
use loot_core::{LootError, LootSession};

// ============================================================
// 1. Content loading failures
// ============================================================

#[test]
fn test_empty_json_table_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "").unwrap();
    let mut registry = LootTableRegistry::new();
    assert!(matches!(registry.load_file(&path), Err(LootError::Json(_))));
}

#[test]
fn test_malformed_ron_table_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.ron");
    std::fs::write(&path, "(table_id: ").unwrap();
    let mut registry = LootTableRegistry::new();
    assert!(matches!(registry.load_file(&path), Err(LootError::Ron(_))));
}

#[test]
fn test_missing_table_file() {
    let mut registry = LootTableRegistry::new();
    let result = registry.load_file(std::path::Path::new("/nope/grunt.json"));
    assert!(matches!(result, Err(LootError::Io(_))));
}

#[test]
fn test_nan_weight_rejected() {
    let mut table = LootTableDefinition::new("nan");
    table.pools.push(LootPool::new("p", f32::NAN, RarityTier::Common, &["a"]));
    let mut registry = LootTableRegistry::new();
    assert!(registry.insert(table).is_err());
}

#[test]
fn test_empty_dir_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let mut registry = LootTableRegistry::new();
    assert_eq!(registry.load_dir(dir.path()).unwrap(), 0);
}

#[test]
fn test_malformed_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loot.ron");
    std::fs::write(&path, "(seed: \"forty-two\")").unwrap();
    assert!(LootConfig::load(&path).is_err());
}

#[test]
fn test_session_with_missing_catalog_fails() {
    let config = LootConfig {
        catalog_path: Some("/no/such/items.json".into()),
        ..Default::default()
    };
    assert!(LootSession::from_config(&config).is_err());
}

// ============================================================
// 2. Unknown ids
// ============================================================

#[test]
fn test_resolve_unknown_table_leaves_pity_alone() {
    let mut session = LootSession::new(1);
    session.luck.set_pity_counter(42);
    assert!(session.resolve("ghost_table", 5.0).is_empty());
    assert_eq!(session.luck.pity_counter(), 42);
}

#[test]
fn test_unknown_difficulty_name_is_normal() {
    let mut luck = LuckState::default();
    luck.set_difficulty(Difficulty::Hard);
    luck.set_difficulty_by_name("impossible");
    assert_eq!(luck.difficulty(), Difficulty::Normal);
    luck.set_difficulty_by_name("nightmare");
    assert_eq!(luck.difficulty(), Difficulty::Nightmare);
}

#[test]
fn test_pickup_unknown_drop() {
    let mut drops = DropSpawnCoordinator::default();
    let collector = Collector::new(1, Vec3::ZERO);
    assert!(drops
        .pickup(loot_core::drops::DropId(999), &collector)
        .is_none());
}

// ============================================================
// 3. Extreme luck
// ============================================================

#[test]
fn test_tie_break_at_extreme_luck() {
    // Mythic 0.1, Exotic 1.0: the rarest tier keeps its own slice first
    assert_eq!(RarityTier::from_draw(1000.0, 0.05), RarityTier::Mythic);
    assert_eq!(RarityTier::from_draw(1000.0, 0.5), RarityTier::Exotic);
    assert_eq!(RarityTier::from_draw(1.0e6, 0.999), RarityTier::Mythic);
}

#[test]
fn test_nan_luck_resolves_safely() {
    let table = LootTableBuilder::new("t")
        .drop_count(3, 3)
        .pool("c", 1.0, RarityTier::Common, &["c"])
        .pool("r", 1.0, RarityTier::Rare, &["r"])
        .build();
    let mut rng = seeded(1);
    assert_eq!(resolve_table(&table, f32::NAN, &mut (), &mut rng).len(), 3);
    assert_eq!(resolve_table(&table, f32::INFINITY, &mut (), &mut rng), vec!["r"; 3]);
}

#[test]
fn test_zero_luck_table_still_drops_commons() {
    let table = LootTableBuilder::new("t")
        .drop_count(10, 10)
        .pool("c", 1.0, RarityTier::Common, &["c"])
        .pool("r", 100.0, RarityTier::Legendary, &["r"])
        .build();
    let mut rng = seeded(2);
    assert_eq!(resolve_table(&table, 0.0, &mut (), &mut rng), vec!["c"; 10]);
}

#[test]
fn test_max_luck_stack() {
    let mut luck = LuckState::default();
    luck.set_player_luck(f32::MAX);
    luck.set_difficulty(Difficulty::Nightmare);
    luck.set_clan_bonus(10.0);
    luck.set_pass_bonus(10.0);
    luck.set_event_bonus(10.0);
    // 2.0 * 2.0 * (1 + 2 + 2 + 2)
    assert!((luck.global_luck_multiplier() - 28.0).abs() < 1e-4);
}

// ============================================================
// 4. Degenerate ranges and sizes
// ============================================================

#[test]
fn test_zero_width_stat_range() {
    let mut table = StatRangeTable::empty();
    table.insert(RarityTier::Rare, StatRange::new(StatId::Speed, 7.5, 7.5));
    let mut rng = seeded(3);
    for _ in 0..100 {
        assert_eq!(table.roll_stat(StatId::Speed, RarityTier::Rare, &mut rng), 7.5);
    }
}

#[test]
fn test_empty_table_resolves_empty() {
    let table = LootTableDefinition::new("nothing");
    let mut rng = seeded(4);
    assert!(resolve_table(&table, 1.0, &mut (), &mut rng).is_empty());
}

#[test]
fn test_cap_of_one() {
    let mut drops = DropSpawnCoordinator::new(1, 60.0);
    drops.spawn(Vec3::ZERO, "a", RarityTier::Common);
    let b = drops.spawn(Vec3::ZERO, "b", RarityTier::Common).unwrap();
    assert_eq!(drops.len(), 1);
    assert_eq!(drops.active().next().unwrap().id, b);
}

#[test]
fn test_cap_of_zero_behaves_like_one() {
    let mut drops = DropSpawnCoordinator::new(0, 60.0);
    assert!(drops.spawn(Vec3::ZERO, "a", RarityTier::Common).is_some());
    assert_eq!(drops.len(), 1);
    assert_eq!(drops.max_active(), 1);
}

#[test]
fn test_chest_with_empty_catalog() {
    let mut chest = LootChest::new(RarityTier::Mythic)
        .with_items(3, 3)
        .with_guaranteed("key");
    let mut rng = seeded(5);
    assert_eq!(chest.open(&ItemCatalog::new(), &mut rng).unwrap(), vec!["key"]);
}

// ============================================================
// 5. Non-finite time and geometry
// ============================================================

#[test]
fn test_non_finite_tick_is_ignored() {
    let mut drops = DropSpawnCoordinator::default();
    drops.spawn(Vec3::ZERO, "a", RarityTier::Common);
    drops.tick(f32::INFINITY);
    // non-finite deltas are ignored rather than expiring drops
    assert_eq!(drops.len(), 1);
    drops.tick(1.0e9);
    assert!(drops.is_empty());
}

#[test]
fn test_invalid_lifetime_falls_back() {
    let drops = DropSpawnCoordinator::new(10, f32::NAN);
    assert_eq!(drops.lifetime(), 60.0);
    let drops = DropSpawnCoordinator::new(10, -3.0);
    assert_eq!(drops.lifetime(), 60.0);
}

#[test]
fn test_zero_radius_collector() {
    let mut drops = DropSpawnCoordinator::default();
    let id = drops.spawn(Vec3::ZERO, "a", RarityTier::Common).unwrap();
    let collector = Collector::new(1, Vec3::ZERO).with_radii(0.0, 0.0);
    drops.attract(std::slice::from_ref(&collector), 1.0);
    // exact overlap still counts as in range
    assert!(drops.pickup(id, &collector).is_some());
}

#[test]
fn test_drop_on_top_of_collector_does_not_move() {
    let mut drops = DropSpawnCoordinator::default();
    let id = drops.spawn(Vec3::ONE, "a", RarityTier::Common).unwrap();
    drops.attract(&[Collector::new(1, Vec3::ONE)], 0.5);
    let position = drops.get(id).unwrap().position;
    assert!(position.is_finite());
    assert_eq!(position, Vec3::ONE);
}

#[test]
fn test_event_queue_survives_clear() {
    let mut drops = DropSpawnCoordinator::default();
    drops.spawn(Vec3::ZERO, "a", RarityTier::Common);
    drops.clear();
    let events = drops.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], DropEvent::Spawned { .. }));
}
