//! Bevy integration.
//!
//! `LootPlugin` owns one `LootSession` and one `DropSpawnCoordinator` as
//! resources. Drop sources send `LootDropRequest`; each frame the plugin
//! resolves requests into drops, ages them, runs magnetism and auto-pickup for
//! every `Collector` entity (entities tagged `ConfiguredCollector` get one built
//! from `LootConfig::collector`), then republishes lifecycle changes as
//! `DropLifecycleEvent`s.

use bevy::prelude::*;

use crate::config::LootConfig;
use crate::drops::{Collector, CollectorId, DropEvent, DropId, DropSpawnCoordinator};
use crate::hotreload::TableWatcher;
use crate::session::LootSession;

#[derive(Default)]
pub struct LootPlugin {
    pub config: LootConfig,
}

impl LootPlugin {
    pub fn new(config: LootConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }
}

impl Plugin for LootPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();

        let session = LootSession::from_config(&config).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load loot content, starting with an empty registry");
            let mut session = LootSession::new(config.seed);
            session.luck = config.luck.build(config.pity_threshold);
            session
        });
        let drops = DropSpawnCoordinator::new(config.max_active_drops, config.drop_lifetime_secs);

        if config.hot_reload && !config.table_dirs.is_empty() {
            match TableWatcher::new(&config.table_dirs) {
                Ok(watcher) => {
                    app.insert_resource(TableWatcherResource(watcher));
                }
                Err(e) => tracing::warn!(error = %e, "Loot table hot reload disabled"),
            }
        }

        if !app.world().contains_resource::<Time>() {
            app.init_resource::<Time>();
        }

        app.insert_resource(LootSettings(config))
            .insert_resource(LootSessionResource(session))
            .insert_resource(DropCoordinatorResource(drops))
            .add_event::<LootDropRequest>()
            .add_event::<LootPickupRequest>()
            .add_event::<DropLifecycleEvent>()
            .add_systems(
                Update,
                (
                    reload_tables.run_if(resource_exists::<TableWatcherResource>),
                    handle_drop_requests,
                    tick_drops,
                    configure_collectors,
                    sync_collectors,
                    update_collectors,
                    handle_pickup_requests,
                    publish_drop_events,
                )
                    .chain(),
            );
    }
}

#[derive(Resource, Debug, Clone, Deref)]
pub struct LootSettings(pub LootConfig);

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct LootSessionResource(pub LootSession);

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct DropCoordinatorResource(pub DropSpawnCoordinator);

#[derive(Resource)]
pub struct TableWatcherResource(pub TableWatcher);

/// Resolve `table_id` and scatter the result around `position`
#[derive(Event, Debug, Clone)]
pub struct LootDropRequest {
    pub table_id: String,
    pub position: Vec3,
    pub source_luck: f32,
}

impl LootDropRequest {
    pub fn new(table_id: &str, position: Vec3) -> Self {
        Self {
            table_id: table_id.to_string(),
            position,
            source_luck: 1.0,
        }
    }
}

/// Manual pickup of one drop by a collector entity
#[derive(Event, Debug, Clone, Copy)]
pub struct LootPickupRequest {
    pub collector: Entity,
    pub drop: DropId,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct DropLifecycleEvent(pub DropEvent);

/// Marker: give this entity a `Collector` built from the configured settings
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ConfiguredCollector;

/// Entity behind a collector id assigned by `sync_collectors`
pub fn collector_entity(id: CollectorId) -> Entity {
    Entity::from_bits(id.0)
}

fn reload_tables(
    mut watcher: ResMut<TableWatcherResource>,
    mut session: ResMut<LootSessionResource>,
) {
    let summary = watcher.0.poll(&mut session.tables);
    if !summary.is_empty() {
        tracing::info!(
            reloaded = summary.reloaded.len(),
            removed = summary.removed.len(),
            failed = summary.failed.len(),
            "Loot tables hot reloaded"
        );
    }
}

fn handle_drop_requests(
    mut requests: EventReader<LootDropRequest>,
    mut session: ResMut<LootSessionResource>,
    mut drops: ResMut<DropCoordinatorResource>,
    settings: Res<LootSettings>,
) {
    let loot = &mut session.0;
    for request in requests.read() {
        let items = loot.resolve_with_rarity(&request.table_id, request.source_luck);

        drops.spawn_scattered(request.position, items, settings.scatter_radius, &mut loot.rng);
    }
}

fn tick_drops(time: Res<Time>, mut drops: ResMut<DropCoordinatorResource>) {
    drops.tick(time.delta_secs());
}

fn configure_collectors(
    mut commands: Commands,
    settings: Res<LootSettings>,
    added: Query<(Entity, Option<&Transform>), Added<ConfiguredCollector>>,
) {
    for (entity, transform) in &added {
        let position = transform.map_or(Vec3::ZERO, |t| t.translation);
        let collector = settings.collector.build(entity.to_bits(), position);
        tracing::debug!(?entity, pickup_radius = collector.pickup_radius, "Configured collector");
        commands.entity(entity).insert(collector);
    }
}

fn sync_collectors(mut collectors: Query<(Entity, &Transform, &mut Collector)>) {
    for (entity, transform, mut collector) in &mut collectors {
        collector.id = CollectorId(entity.to_bits());
        collector.position = transform.translation;
    }
}

fn update_collectors(
    time: Res<Time>,
    collectors: Query<&Collector>,
    mut drops: ResMut<DropCoordinatorResource>,
) {
    let collectors: Vec<Collector> = collectors.iter().cloned().collect();
    if collectors.is_empty() {
        return;
    }
    drops.update_collectors(&collectors, time.delta_secs());
}

fn handle_pickup_requests(
    mut requests: EventReader<LootPickupRequest>,
    collectors: Query<&Collector>,
    mut drops: ResMut<DropCoordinatorResource>,
) {
    for request in requests.read() {
        let Ok(collector) = collectors.get(request.collector) else {
            tracing::warn!(entity = ?request.collector, "Pickup request from entity without Collector");
            continue;
        };
        if drops.pickup(request.drop, collector).is_none() {
            tracing::debug!(drop = %request.drop, "Pickup request out of range or stale");
        }
    }
}

fn publish_drop_events(
    mut drops: ResMut<DropCoordinatorResource>,
    mut events: EventWriter<DropLifecycleEvent>,
) {
    for event in drops.drain_events() {
        events.send(DropLifecycleEvent(event));
    }
}
