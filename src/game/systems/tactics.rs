//! Tactical positioner
//!
//! Takes the raw navigation target chosen by the state machine and perturbs
//! it with additive displacement forces: wall and corner avoidance, spacing
//! from other tanks, obstacle clearance, a pull toward the arena center, and
//! a bias away from hot heat-map cells. The adjusted target is always clamped
//! back inside the arena margin.

use std::f32::consts::TAU;

use crate::game::constants::heat::MAX_HEAT;
use crate::game::constants::tactics::*;
use crate::game::state::{ArenaBounds, Obstacle};
use crate::game::systems::difficulty::DifficultyProfile;
use crate::game::systems::heat_map::HeatMap;
use crate::util::vec2::Vec2;

/// Read-only snapshot of everything the positioner consults for one tick
pub struct TacticalContext<'a> {
    pub bounds: &'a ArenaBounds,
    pub profile: &'a DifficultyProfile,
    pub heat: &'a HeatMap,
    /// Positions of other AI tanks
    pub peers: &'a [Vec2],
    pub obstacles: &'a [Obstacle],
    /// Position of the opposing tank
    pub opponent: Vec2,
    /// True while in Chase or Attack; relaxes spacing and the central pull
    pub in_combat: bool,
}

/// Apply all forces to a raw target and clamp into the arena margin.
pub fn adjust_target(ctx: &TacticalContext, unit_pos: Vec2, raw_target: Vec2) -> Vec2 {
    let mut target = raw_target;

    target += wall_force(ctx.bounds, ctx.profile, target);
    target += corner_force(ctx.bounds, ctx.profile, unit_pos);
    target += spacing_force(ctx, unit_pos);
    target += obstacle_force(ctx.obstacles, unit_pos);
    target += center_force(ctx.bounds, ctx.profile, unit_pos, ctx.in_combat);
    target += heat_force(ctx.heat, unit_pos);

    ctx.bounds.clamp_with_margin(target)
}

/// Push the target off any wall it has penetrated the avoidance band of,
/// proportional to penetration depth.
fn wall_force(bounds: &ArenaBounds, profile: &DifficultyProfile, target: Vec2) -> Vec2 {
    let band = profile.wall_avoidance_distance;
    let mult = profile.edge_avoidance_multiplier;
    let mut push = Vec2::ZERO;

    let left = target.x - bounds.min.x;
    if left < band {
        push.x += (band - left) * mult;
    }
    let right = bounds.max.x - target.x;
    if right < band {
        push.x -= (band - right) * mult;
    }
    let near = target.z - bounds.min.z;
    if near < band {
        push.z += (band - near) * mult;
    }
    let far = bounds.max.z - target.z;
    if far < band {
        push.z -= (band - far) * mult;
    }

    push
}

/// Push away from any corner the tank itself is close to, along the
/// corner-to-tank axis. Corners are stickier than walls, so the push is
/// stronger than plain wall avoidance.
fn corner_force(bounds: &ArenaBounds, profile: &DifficultyProfile, unit_pos: Vec2) -> Vec2 {
    let band = profile.corner_avoidance_distance;
    let mult = profile.edge_avoidance_multiplier * CORNER_MULTIPLIER_BOOST;
    let mut push = Vec2::ZERO;

    for corner in bounds.corners() {
        let away = unit_pos - corner;
        let (dir, dist) = away.normalize_with_length();
        if dist > 0.0 && dist < band {
            push += dir * (band - dist) * mult;
        }
    }

    push
}

/// Keep spacing from other tanks. Outside combat the opponent counts too,
/// so idle bots do not bunch up on the player.
fn spacing_force(ctx: &TacticalContext, unit_pos: Vec2) -> Vec2 {
    let mut push = Vec2::ZERO;

    for &peer in ctx.peers {
        push += separation(unit_pos, peer, TANK_SPACING_DISTANCE);
    }
    if !ctx.in_combat {
        push += separation(unit_pos, ctx.opponent, TANK_SPACING_DISTANCE);
    }

    push
}

/// Push away from obstacles whose clearance band the tank has entered.
fn obstacle_force(obstacles: &[Obstacle], unit_pos: Vec2) -> Vec2 {
    let mut push = Vec2::ZERO;
    for obstacle in obstacles {
        push += separation(
            unit_pos,
            obstacle.position,
            OBSTACLE_AVOIDANCE_DISTANCE + obstacle.radius,
        );
    }
    push
}

/// Displacement away from `other` proportional to the spacing deficit.
/// A degenerate zero-length axis contributes nothing this tick.
fn separation(unit_pos: Vec2, other: Vec2, spacing: f32) -> Vec2 {
    let away = unit_pos - other;
    let (dir, dist) = away.normalize_with_length();
    if dist > 0.0 && dist < spacing {
        dir * (spacing - dist)
    } else {
        Vec2::ZERO
    }
}

/// Pull toward arena center, growing super-linearly with distance from it.
/// Damped during combat so fights are not dragged centerward.
fn center_force(
    bounds: &ArenaBounds,
    profile: &DifficultyProfile,
    unit_pos: Vec2,
    in_combat: bool,
) -> Vec2 {
    let to_center = bounds.center() - unit_pos;
    let (dir, dist) = to_center.normalize_with_length();
    if dist <= 0.0 {
        return Vec2::ZERO;
    }

    let normalized = (dist / bounds.half_extent()).min(1.0);
    let weight = if in_combat { COMBAT_CENTER_WEIGHT } else { 1.0 };
    dir * normalized * normalized * profile.central_area_preference * CENTER_PULL_SCALE * weight
}

/// When the tank's own cell is hot, probe a ring of directions and bias the
/// target toward the coolest one, scaled by how hot it currently is.
fn heat_force(heat: &HeatMap, unit_pos: Vec2) -> Vec2 {
    let current = heat.heat_at(unit_pos);
    if current <= HEAT_AVOIDANCE_THRESHOLD {
        return Vec2::ZERO;
    }

    let mut coolest_dir = Vec2::ZERO;
    let mut coolest = f32::MAX;
    for i in 0..HEAT_PROBE_DIRECTIONS {
        let angle = TAU * i as f32 / HEAT_PROBE_DIRECTIONS as f32;
        let dir = Vec2::from_angle(angle);
        let sampled = heat.heat_at(unit_pos + dir * HEAT_PROBE_DISTANCE);
        if sampled < coolest {
            coolest = sampled;
            coolest_dir = dir;
        }
    }

    coolest_dir * HEAT_BIAS_DISTANCE * (current / MAX_HEAT)
}
