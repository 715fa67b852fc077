//! Core entity state for the arena
//!
//! Tanks and obstacles are owned by the orchestrator; the AI mutates a tank's
//! position and heading during its tick and commands firing through the
//! fire-once flag, but never creates or destroys these entities.

use serde::{Deserialize, Serialize};

use crate::game::constants::arena;
use crate::util::vec2::Vec2;

/// Unique tank identifier
pub type TankId = uuid::Uuid;

/// A tank on the arena floor.
///
/// `position` and `heading` live on the ground plane; world height is the
/// renderer's concern and never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    /// Tank identifier
    pub id: TankId,
    /// Display name / callsign
    pub name: String,
    /// Position on the ground plane
    pub position: Vec2,
    /// Heading in radians (0 = +x, increasing toward +z)
    pub heading: f32,
    /// Current hit points
    pub health: f32,
    /// Maximum hit points
    pub max_health: f32,
    /// Seconds until the main gun can fire again (0 = ready)
    pub reload: f32,
    /// Set by the AI to command a single shot; cleared by the orchestrator
    pub fire_requested: bool,
    /// Whether the tank is alive
    pub alive: bool,
    /// Whether this tank is AI-controlled
    pub is_bot: bool,
}

impl Tank {
    pub fn new(name: impl Into<String>, position: Vec2, max_health: f32) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            position,
            heading: 0.0,
            health: max_health,
            max_health,
            reload: 0.0,
            fire_requested: false,
            alive: true,
            is_bot: false,
        }
    }

    /// Current health as a fraction of maximum
    #[inline]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Whether the main gun is ready to fire
    #[inline]
    pub fn is_weapon_ready(&self) -> bool {
        self.reload <= 0.0
    }

    /// Command a single shot. The orchestrator consumes the flag via
    /// [`Tank::take_fire_request`] when it spawns the projectile.
    pub fn request_fire(&mut self) {
        self.fire_requested = true;
    }

    /// Consume a pending fire command, starting the given reload time.
    /// Returns true if a shot was pending and the gun was ready.
    pub fn take_fire_request(&mut self, reload_time: f32) -> bool {
        if self.fire_requested && self.is_weapon_ready() {
            self.fire_requested = false;
            self.reload = reload_time;
            true
        } else {
            self.fire_requested = false;
            false
        }
    }

    /// Advance the reload timer. Called by the orchestrator each frame.
    pub fn tick_reload(&mut self, dt: f32) {
        if self.reload > 0.0 {
            self.reload = (self.reload - dt).max(0.0);
        }
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// A circular static obstacle (rock, wreck, pillar)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self { position, radius }
    }
}

/// Rectangular arena bounds with a navigation safety margin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub min: Vec2,
    pub max: Vec2,
    pub margin: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min: Vec2::new(arena::MIN, arena::MIN),
            max: Vec2::new(arena::MAX, arena::MAX),
            margin: arena::MARGIN,
        }
    }
}

impl ArenaBounds {
    pub fn new(min: Vec2, max: Vec2, margin: f32) -> Self {
        Self { min, max, margin }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half the arena's larger dimension, used to normalize center distances
    #[inline]
    pub fn half_extent(&self) -> f32 {
        ((self.max.x - self.min.x).max(self.max.z - self.min.z)) * 0.5
    }

    /// Clamp a point into the playable area minus the safety margin
    pub fn clamp_with_margin(&self, p: Vec2) -> Vec2 {
        p.max(self.min + Vec2::new(self.margin, self.margin))
            .min(self.max - Vec2::new(self.margin, self.margin))
    }

    /// Clamp a point into the raw arena bounds
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.max(self.min).min(self.max)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Distance to the nearest of the four walls (0 at a wall)
    pub fn distance_to_nearest_wall(&self, p: Vec2) -> f32 {
        let dx = (p.x - self.min.x).min(self.max.x - p.x);
        let dz = (p.z - self.min.z).min(self.max.z - p.z);
        dx.min(dz).max(0.0)
    }

    /// The four corner points
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.min.z),
            Vec2::new(self.min.x, self.max.z),
            Vec2::new(self.max.x, self.min.z),
            Vec2::new(self.max.x, self.max.z),
        ]
    }

    /// Nearest corner and the distance to it
    pub fn nearest_corner(&self, p: Vec2) -> (Vec2, f32) {
        let mut best = self.corners()[0];
        let mut best_dist_sq = f32::MAX;
        for corner in self.corners() {
            let d = p.distance_sq_to(corner);
            if d < best_dist_sq {
                best_dist_sq = d;
                best = corner;
            }
        }
        (best, best_dist_sq.sqrt())
    }

    /// Whether the point sits inside the given distance of a wall or corner
    pub fn is_near_edge(&self, p: Vec2, distance: f32) -> bool {
        self.distance_to_nearest_wall(p) < distance || self.nearest_corner(p).1 < distance
    }
}
