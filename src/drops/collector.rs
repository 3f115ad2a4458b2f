use bevy::math::Vec3;
use bevy::prelude::Component;

use crate::constants::{MAGNETIC_FORCE, MAGNETIC_RADIUS, PICKUP_RADIUS};

/// Opaque id of whatever is collecting (player, drone, vacuum turret)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectorId(pub u64);

/// Anything that can pick up and attract drops
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Collector {
    pub id: CollectorId,
    pub position: Vec3,
    pub can_pickup: bool,
    pub auto_pickup: bool,
    pub magnetic: bool,
    pub pickup_radius: f32,
    pub magnetic_radius: f32,
    pub magnetic_force: f32,
}

impl Collector {
    pub fn new(id: u64, position: Vec3) -> Self {
        Self {
            id: CollectorId(id),
            position,
            can_pickup: true,
            auto_pickup: false,
            magnetic: true,
            pickup_radius: PICKUP_RADIUS,
            magnetic_radius: MAGNETIC_RADIUS,
            magnetic_force: MAGNETIC_FORCE,
        }
    }

    pub fn with_auto_pickup(mut self, auto_pickup: bool) -> Self {
        self.auto_pickup = auto_pickup;
        self
    }

    pub fn with_magnetic(mut self, magnetic: bool) -> Self {
        self.magnetic = magnetic;
        self
    }

    /// Radii are clamped non-negative
    pub fn with_radii(mut self, pickup_radius: f32, magnetic_radius: f32) -> Self {
        self.pickup_radius = pickup_radius.max(0.0);
        self.magnetic_radius = magnetic_radius.max(0.0);
        self
    }

    pub fn with_force(mut self, force: f32) -> Self {
        self.magnetic_force = force.max(0.0);
        self
    }

    pub fn in_pickup_range(&self, point: Vec3) -> bool {
        self.can_pickup && self.position.distance(point) <= self.pickup_radius
    }

    pub fn in_magnetic_range(&self, point: Vec3) -> bool {
        self.can_pickup && self.magnetic && self.position.distance(point) <= self.magnetic_radius
    }

    /// Distance covered this tick by a drop `distance` away; never overshoots
    pub fn pull_step(&self, distance: f32, dt: f32) -> f32 {
        if self.magnetic_radius <= 0.0 {
            return 0.0;
        }
        let falloff = (1.0 - distance / self.magnetic_radius).max(0.0);
        (self.magnetic_force * falloff * dt).clamp(0.0, distance)
    }
}
