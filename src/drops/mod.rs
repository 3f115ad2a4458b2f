//! World drop lifecycle.
//!
//! Every drop is `Spawned` until it reaches exactly one terminal state:
//! `PickedUp`, `Expired` (age reached its lifetime) or `Evicted` (the oldest
//! drop when a spawn hits the cap). Terminal drops are removed immediately and
//! reported through the event queue.

mod collector;

pub use collector::{Collector, CollectorId};

use bevy::math::Vec3;
use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::TAU;

use crate::constants::{DROP_HEIGHT_OFFSET, DROP_LIFETIME_SECS, MAX_ACTIVE_DROPS};
use crate::rarity::RarityTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropId(pub u64);

impl std::fmt::Display for DropId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "drop#{}", self.0)
    }
}

/// A drop lying in the world
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrop {
    pub id: DropId,
    pub item_id: String,
    pub rarity: RarityTier,
    pub position: Vec3,
    /// Coordinator clock at spawn, in seconds
    pub spawn_time: f32,
    /// Seconds since spawn
    pub age: f32,
    pub lifetime_secs: f32,
    /// Only ever true on the copy handed back by a pickup
    pub picked_up: bool,
}

impl ActiveDrop {
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime_secs
    }

    pub fn remaining_secs(&self) -> f32 {
        (self.lifetime_secs - self.age).max(0.0)
    }
}

/// Lifecycle notifications, drained once per tick
#[derive(Debug, Clone, PartialEq)]
pub enum DropEvent {
    Spawned {
        id: DropId,
        item_id: String,
        rarity: RarityTier,
        position: Vec3,
    },
    PickedUp {
        id: DropId,
        item_id: String,
        rarity: RarityTier,
        collector: CollectorId,
    },
    Expired {
        id: DropId,
        item_id: String,
    },
    Evicted {
        id: DropId,
        item_id: String,
    },
}

impl DropEvent {
    pub fn drop_id(&self) -> DropId {
        match self {
            DropEvent::Spawned { id, .. }
            | DropEvent::PickedUp { id, .. }
            | DropEvent::Expired { id, .. }
            | DropEvent::Evicted { id, .. } => *id,
        }
    }
}

/// Owns every active drop, enforces the cap and lifetime
#[derive(Debug, Clone)]
pub struct DropSpawnCoordinator {
    // spawn order, oldest first
    drops: VecDeque<ActiveDrop>,
    events: Vec<DropEvent>,
    next_id: u64,
    max_active: usize,
    lifetime: f32,
    // seconds of valid ticks since construction
    clock: f32,
}

impl Default for DropSpawnCoordinator {
    fn default() -> Self {
        Self::new(MAX_ACTIVE_DROPS, DROP_LIFETIME_SECS)
    }
}

impl DropSpawnCoordinator {
    /// Cap is at least 1; non-positive lifetimes fall back to the default
    pub fn new(max_active: usize, lifetime: f32) -> Self {
        let lifetime = if lifetime.is_finite() && lifetime > 0.0 {
            lifetime
        } else {
            tracing::warn!(lifetime, "Invalid drop lifetime, using default");
            DROP_LIFETIME_SECS
        };
        Self {
            drops: VecDeque::new(),
            events: Vec::new(),
            next_id: 1,
            max_active: max_active.max(1),
            lifetime,
            clock: 0.0,
        }
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    /// Default lifetime for drops spawned without one
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// Active drops, oldest first
    pub fn active(&self) -> impl Iterator<Item = &ActiveDrop> {
        self.drops.iter()
    }

    pub fn get(&self, id: DropId) -> Option<&ActiveDrop> {
        self.drops.iter().find(|d| d.id == id)
    }

    /// Place one drop, evicting the oldest when at the cap
    pub fn spawn(&mut self, position: Vec3, item_id: &str, rarity: RarityTier) -> Option<DropId> {
        self.spawn_with_lifetime(position, item_id, rarity, self.lifetime)
    }

    /// Spawn with its own lifetime; invalid lifetimes use the coordinator default
    pub fn spawn_with_lifetime(
        &mut self,
        position: Vec3,
        item_id: &str,
        rarity: RarityTier,
        lifetime_secs: f32,
    ) -> Option<DropId> {
        let lifetime_secs = if lifetime_secs.is_finite() && lifetime_secs > 0.0 {
            lifetime_secs
        } else {
            tracing::warn!(lifetime_secs, item_id, "Invalid drop lifetime, using default");
            self.lifetime
        };
        if item_id.trim().is_empty() {
            tracing::error!(?position, "Refusing to spawn drop with empty item id");
            return None;
        }

        while self.drops.len() >= self.max_active {
            let Some(oldest) = self.drops.pop_front() else {
                break;
            };
            tracing::debug!(id = %oldest.id, item_id = %oldest.item_id, "Drop cap reached, evicting oldest");
            self.events.push(DropEvent::Evicted {
                id: oldest.id,
                item_id: oldest.item_id,
            });
        }

        let id = DropId(self.next_id);
        self.next_id += 1;

        self.drops.push_back(ActiveDrop {
            id,
            item_id: item_id.to_string(),
            rarity,
            position,
            spawn_time: self.clock,
            age: 0.0,
            lifetime_secs,
            picked_up: false,
        });
        self.events.push(DropEvent::Spawned {
            id,
            item_id: item_id.to_string(),
            rarity,
            position,
        });
        tracing::debug!(%id, item_id, ?rarity, "Spawned drop");
        Some(id)
    }

    /// Spawn several items around `center`, each at a random point of a disc
    pub fn spawn_scattered<I, S, R>(
        &mut self,
        center: Vec3,
        items: I,
        radius: f32,
        rng: &mut R,
    ) -> Vec<DropId>
    where
        I: IntoIterator<Item = (S, RarityTier)>,
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        items
            .into_iter()
            .filter_map(|(item_id, rarity)| {
                let position = center + scatter_offset(radius, rng);
                self.spawn(position, item_id.as_ref(), rarity)
            })
            .collect()
    }

    /// Age every drop and expire those past their lifetime
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += dt;
        let events = &mut self.events;

        self.drops.retain_mut(|drop| {
            drop.age += dt;
            if drop.is_expired() {
                tracing::debug!(id = %drop.id, item_id = %drop.item_id, "Drop expired");
                events.push(DropEvent::Expired {
                    id: drop.id,
                    item_id: drop.item_id.clone(),
                });
                false
            } else {
                true
            }
        });
    }

    /// Drops within `radius` of `position` (boundary inclusive)
    pub fn pickup_query(&self, position: Vec3, radius: f32) -> Vec<&ActiveDrop> {
        self.drops
            .iter()
            .filter(|d| d.distance_to(position) <= radius)
            .collect()
    }

    /// Pull drops toward the nearest magnetic collector in range.
    ///
    /// The target is chosen fresh every call.
    pub fn attract(&mut self, collectors: &[Collector], dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for drop in self.drops.iter_mut() {
            let nearest = collectors
                .iter()
                .filter(|c| c.in_magnetic_range(drop.position))
                .map(|c| (c, c.position.distance(drop.position)))
                .min_by(|a, b| a.1.total_cmp(&b.1));

            let Some((collector, distance)) = nearest else {
                continue;
            };
            if distance <= f32::EPSILON {
                continue;
            }

            let step = collector.pull_step(distance, dt);
            let direction = (collector.position - drop.position) / distance;
            drop.position += direction * step;
        }
    }

    /// Pick up everything within the collector's pickup radius
    pub fn collect(&mut self, collector: &Collector) -> Vec<ActiveDrop> {
        let mut picked = Vec::new();
        let mut kept = VecDeque::with_capacity(self.drops.len());

        for drop in self.drops.drain(..) {
            if collector.in_pickup_range(drop.position) {
                picked.push(drop);
            } else {
                kept.push_back(drop);
            }
        }
        self.drops = kept;

        for drop in &mut picked {
            self.record_pickup(drop, collector.id);
        }
        picked
    }

    /// Pick up one drop if it exists and is in range
    pub fn pickup(&mut self, id: DropId, collector: &Collector) -> Option<ActiveDrop> {
        let index = self.drops.iter().position(|d| d.id == id)?;
        if !collector.in_pickup_range(self.drops[index].position) {
            return None;
        }
        let mut drop = self.drops.remove(index)?;
        self.record_pickup(&mut drop, collector.id);
        Some(drop)
    }

    /// One collector pass: magnetism, then auto-pickup collectors collect
    pub fn update_collectors(&mut self, collectors: &[Collector], dt: f32) -> Vec<ActiveDrop> {
        self.attract(collectors, dt);
        collectors
            .iter()
            .filter(|c| c.auto_pickup)
            .flat_map(|c| self.collect(c))
            .collect()
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<DropEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove every drop without raising events
    pub fn clear(&mut self) {
        let removed = self.drops.len();
        self.drops.clear();
        tracing::debug!(removed, "Cleared all drops");
    }

    fn record_pickup(&mut self, drop: &mut ActiveDrop, collector: CollectorId) {
        drop.picked_up = true;
        tracing::debug!(id = %drop.id, item_id = %drop.item_id, ?collector, "Drop picked up");
        self.events.push(DropEvent::PickedUp {
            id: drop.id,
            item_id: drop.item_id.clone(),
            rarity: drop.rarity,
            collector,
        });
    }
}

/// Random point on a disc of `radius`, lifted to drop height
pub fn scatter_offset<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec3 {
    let radius = radius.max(0.0);
    let angle = rng.gen_range(0.0..TAU);
    let distance = if radius > 0.0 {
        rng.gen_range(0.0..=radius)
    } else {
        0.0
    };
    Vec3::new(angle.cos() * distance, DROP_HEIGHT_OFFSET, angle.sin() * distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn coordinator(cap: usize) -> DropSpawnCoordinator {
        DropSpawnCoordinator::new(cap, 60.0)
    }

    #[test]
    fn test_spawn_and_get() {
        let mut c = coordinator(10);
        let id = c.spawn(Vec3::ONE, "plasma_rifle", RarityTier::Rare).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(id).unwrap().item_id, "plasma_rifle");
        assert!(matches!(c.drain_events()[0], DropEvent::Spawned { .. }));
    }

    #[test]
    fn test_empty_item_rejected() {
        let mut c = coordinator(10);
        assert!(c.spawn(Vec3::ZERO, "", RarityTier::Common).is_none());
        assert!(c.spawn(Vec3::ZERO, "   ", RarityTier::Common).is_none());
        assert!(c.is_empty());
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut c = coordinator(3);
        let first = c.spawn(Vec3::ZERO, "a", RarityTier::Common).unwrap();
        c.spawn(Vec3::ZERO, "b", RarityTier::Common);
        c.spawn(Vec3::ZERO, "c", RarityTier::Common);
        c.drain_events();

        c.spawn(Vec3::ZERO, "d", RarityTier::Common);
        assert_eq!(c.len(), 3);
        assert!(c.get(first).is_none());
        let items: Vec<&str> = c.active().map(|d| d.item_id.as_str()).collect();
        assert_eq!(items, vec!["b", "c", "d"]);

        let events = c.drain_events();
        assert_eq!(
            events[0],
            DropEvent::Evicted {
                id: first,
                item_id: "a".into()
            }
        );
    }

    #[test]
    fn test_tick_expires_at_lifetime() {
        let mut c = DropSpawnCoordinator::new(10, 60.0);
        let id = c.spawn(Vec3::ZERO, "a", RarityTier::Common).unwrap();
        c.drain_events();

        c.tick(59.5);
        assert!(c.get(id).is_some());
        c.tick(0.5);
        assert!(c.get(id).is_none());
        assert_eq!(
            c.drain_events(),
            vec![DropEvent::Expired {
                id,
                item_id: "a".into()
            }]
        );
    }

    #[test]
    fn test_per_drop_lifetimes_expire_separately() {
        let mut c = DropSpawnCoordinator::new(10, 60.0);
        let short = c.spawn_with_lifetime(Vec3::ZERO, "flare", RarityTier::Common, 5.0).unwrap();
        let long = c.spawn(Vec3::ZERO, "rail_gun", RarityTier::Epic).unwrap();
        assert_eq!(c.get(long).unwrap().lifetime_secs, 60.0);

        c.tick(4.0);
        assert!(c.get(short).is_some());
        c.tick(1.0);
        assert!(c.get(short).is_none());
        assert!(c.get(long).is_some());
        assert_eq!(c.get(long).unwrap().remaining_secs(), 55.0);

        c.tick(55.0);
        assert!(c.is_empty());
        let expired: Vec<DropId> = c
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, DropEvent::Expired { .. }))
            .map(|e| e.drop_id())
            .collect();
        assert_eq!(expired, vec![short, long]);
    }

    #[test]
    fn test_invalid_spawn_lifetime_uses_default() {
        let mut c = DropSpawnCoordinator::new(10, 30.0);
        let id = c.spawn_with_lifetime(Vec3::ZERO, "a", RarityTier::Common, f32::NAN).unwrap();
        assert_eq!(c.get(id).unwrap().lifetime_secs, 30.0);
        let id = c.spawn_with_lifetime(Vec3::ZERO, "b", RarityTier::Common, 0.0).unwrap();
        assert_eq!(c.get(id).unwrap().lifetime_secs, 30.0);
    }

    #[test]
    fn test_spawn_time_follows_clock() {
        let mut c = coordinator(10);
        let early = c.spawn(Vec3::ZERO, "a", RarityTier::Common).unwrap();
        c.tick(2.5);
        c.tick(f32::NAN);
        let late = c.spawn(Vec3::ZERO, "b", RarityTier::Common).unwrap();
        assert_eq!(c.clock(), 2.5);
        assert_eq!(c.get(early).unwrap().spawn_time, 0.0);
        assert_eq!(c.get(late).unwrap().spawn_time, 2.5);
        assert_eq!(c.get(early).unwrap().age, 2.5);
    }

    #[test]
    fn test_pickup_marks_returned_drop() {
        let mut c = coordinator(10);
        let id = c.spawn(Vec3::ZERO, "a", RarityTier::Common).unwrap();
        assert!(!c.get(id).unwrap().picked_up);
        let picked = c.pickup(id, &Collector::new(1, Vec3::ZERO)).unwrap();
        assert!(picked.picked_up);
        let id = c.spawn(Vec3::ZERO, "b", RarityTier::Common).unwrap();
        let collected = c.collect(&Collector::new(1, Vec3::ZERO));
        assert_eq!(collected[0].id, id);
        assert!(collected[0].picked_up);
    }

    #[test]
    fn test_tick_ignores_bad_dt() {
        let mut c = coordinator(10);
        c.spawn(Vec3::ZERO, "a", RarityTier::Common);
        c.tick(f32::NAN);
        c.tick(-5.0);
        assert_eq!(c.active().next().unwrap().age, 0.0);
    }

    #[test]
    fn test_pickup_query_inclusive() {
        let mut c = coordinator(10);
        c.spawn(Vec3::new(2.0, 0.0, 0.0), "edge", RarityTier::Common);
        c.spawn(Vec3::new(2.1, 0.0, 0.0), "outside", RarityTier::Common);
        let hits = c.pickup_query(Vec3::ZERO, 2.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item_id, "edge");
    }

    #[test]
    fn test_attract_moves_toward_nearest_without_overshoot() {
        let mut c = coordinator(10);
        let id = c.spawn(Vec3::new(4.0, 0.0, 0.0), "a", RarityTier::Common).unwrap();
        let near = Collector::new(1, Vec3::new(6.0, 0.0, 0.0));
        let far = Collector::new(2, Vec3::ZERO);

        c.attract(&[far.clone(), near.clone()], 0.5);
        let pos = c.get(id).unwrap().position;
        // nearest is 2 away: 8 * (1 - 2/5) * 0.5 = 2.4, clamped to 2.0
        assert!((pos.x - 6.0).abs() < 1e-5);

        let mut c = coordinator(10);
        let id = c.spawn(Vec3::new(4.0, 0.0, 0.0), "a", RarityTier::Common).unwrap();
        c.attract(&[far], 0.5);
        let pos = c.get(id).unwrap().position;
        assert!((pos.x - 3.2).abs() < 1e-5);
    }

    #[test]
    fn test_attract_retargets_when_collector_moves_away() {
        let mut c = coordinator(10);
        let id = c.spawn(Vec3::new(4.0, 0.0, 0.0), "a", RarityTier::Common).unwrap();
        let mut a = Collector::new(1, Vec3::ZERO);

        c.attract(std::slice::from_ref(&a), 0.1);
        let mid = c.get(id).unwrap().position;
        // 8 * (1 - 4/5) * 0.1 = 0.16 toward A
        assert!((mid.x - 3.84).abs() < 1e-5);

        // A leaves magnetic range: the drop stays where it is
        a.position = Vec3::new(-20.0, 0.0, 0.0);
        c.attract(std::slice::from_ref(&a), 0.1);
        assert_eq!(c.get(id).unwrap().position, mid);

        // B in range picks the drop up from there
        let b = Collector::new(2, Vec3::new(8.0, 0.0, 0.0));
        c.attract(&[a, b], 0.1);
        let pos = c.get(id).unwrap().position;
        assert!(pos.x > mid.x);
        assert!(pos.x < 8.0);
    }

    #[test]
    fn test_attract_ignores_out_of_range_and_non_magnetic() {
        let mut c = coordinator(10);
        let id = c.spawn(Vec3::new(10.0, 0.0, 0.0), "a", RarityTier::Common).unwrap();
        let off = Collector::new(1, Vec3::new(9.0, 0.0, 0.0)).with_magnetic(false);
        c.attract(&[Collector::new(2, Vec3::ZERO), off], 1.0);
        assert_eq!(c.get(id).unwrap().position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_collect_and_pickup() {
        let mut c = coordinator(10);
        let near = c.spawn(Vec3::new(1.0, 0.0, 0.0), "near", RarityTier::Epic).unwrap();
        let far = c.spawn(Vec3::new(3.0, 0.0, 0.0), "far", RarityTier::Common).unwrap();
        c.drain_events();
        let player = Collector::new(7, Vec3::ZERO);

        assert!(c.pickup(far, &player).is_none());
        let picked = c.collect(&player);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, near);
        assert!(c.get(far).is_some());

        let events = c.drain_events();
        assert_eq!(
            events,
            vec![DropEvent::PickedUp {
                id: near,
                item_id: "near".into(),
                rarity: RarityTier::Epic,
                collector: CollectorId(7),
            }]
        );
    }

    #[test]
    fn test_update_collectors_auto_pickup() {
        let mut c = coordinator(10);
        c.spawn(Vec3::new(2.5, 0.0, 0.0), "a", RarityTier::Common);
        let manual = Collector::new(1, Vec3::ZERO);
        assert!(c.update_collectors(&[manual], 0.1).is_empty());
        assert_eq!(c.len(), 1);

        let auto = Collector::new(2, Vec3::ZERO).with_auto_pickup(true);
        let mut picked = Vec::new();
        for _ in 0..20 {
            picked.extend(c.update_collectors(std::slice::from_ref(&auto), 0.1));
        }
        assert_eq!(picked.len(), 1);
        assert!(c.is_empty());
    }

    #[test]
    fn test_spawn_scattered_within_disc() {
        let mut c = coordinator(100);
        let mut rng = seeded(11);
        let center = Vec3::new(10.0, 0.0, -4.0);
        let items = vec![("a", RarityTier::Common), ("", RarityTier::Rare), ("b", RarityTier::Epic)];
        let ids = c.spawn_scattered(center, items, 2.0, &mut rng);
        assert_eq!(ids.len(), 2);
        for drop in c.active() {
            let offset = drop.position - center;
            assert!((offset.y - DROP_HEIGHT_OFFSET).abs() < 1e-6);
            assert!(Vec3::new(offset.x, 0.0, offset.z).length() <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_clear() {
        let mut c = coordinator(10);
        c.spawn(Vec3::ZERO, "a", RarityTier::Common);
        c.drain_events();
        c.clear();
        assert!(c.is_empty());
        assert!(c.drain_events().is_empty());
    }
}
