//! Behavioral state machine
//!
//! Five states drive each hostile tank: Idle wanders, Chase closes in,
//! Attack holds range and fires, Retreat flees on low health, Reposition
//! breaks camping/stuck situations. Transitions are a pure function of the
//! current state and a small input snapshot; the per-state shooting
//! configuration is applied atomically on every transition.

use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::game::constants::{movement, state as state_consts};
use crate::game::state::{ArenaBounds, Tank};
use crate::game::systems::difficulty::DifficultyProfile;
use crate::util::vec2::Vec2;

/// Behavioral state of one AI tank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    /// No engagement; wander between random nearby points, guns cold
    Idle,
    /// Close on the opponent while keeping the minimum engagement distance
    Chase,
    /// Hold optimal range and fire
    Attack,
    /// Flee from the opponent until health recovers
    Retreat,
    /// Forced non-combat move (stuck/anti-camping), guns cold
    Reposition,
}

/// Per-state shooting and timing configuration.
///
/// Built in one place and swapped wholesale on every transition so state
/// identity and its knobs can never drift apart.
#[derive(Debug, Clone, Copy)]
pub struct StateConfig {
    /// State duration for Retreat/Reposition; zero for states without one
    pub timer: f32,
    /// Base fire probability while in this state
    pub shoot_probability: f32,
    /// Base seconds between fire decisions while in this state
    pub shoot_cooldown: f32,
    /// Whether firing is allowed at all in this state
    pub shooting_enabled: bool,
}

impl StateConfig {
    /// The fixed per-state configuration table.
    pub fn for_state(state: AiState, profile: &DifficultyProfile) -> Self {
        use state_consts::*;
        match state {
            AiState::Idle => Self {
                timer: 0.0,
                shoot_probability: 0.0,
                shoot_cooldown: profile.shoot_cooldown,
                shooting_enabled: false,
            },
            AiState::Chase => Self {
                timer: 0.0,
                shoot_probability: profile.shoot_probability * CHASE_PROB_FACTOR,
                shoot_cooldown: profile.shoot_cooldown * CHASE_COOLDOWN_FACTOR,
                shooting_enabled: true,
            },
            AiState::Attack => Self {
                timer: 0.0,
                shoot_probability: profile.shoot_probability,
                shoot_cooldown: profile.shoot_cooldown,
                shooting_enabled: true,
            },
            AiState::Retreat => Self {
                timer: rand::thread_rng()
                    .gen_range(RETREAT_DURATION_MIN..RETREAT_DURATION_MAX),
                shoot_probability: profile.shoot_probability * RETREAT_PROB_FACTOR,
                shoot_cooldown: profile.shoot_cooldown * RETREAT_COOLDOWN_FACTOR,
                shooting_enabled: true,
            },
            AiState::Reposition => Self {
                timer: REPOSITION_DURATION,
                shoot_probability: 0.0,
                shoot_cooldown: profile.shoot_cooldown,
                shooting_enabled: false,
            },
        }
    }
}

/// Snapshot of everything a transition decision needs
#[derive(Debug, Clone, Copy)]
pub struct TransitionInputs {
    /// Current health as a fraction of maximum
    pub health_fraction: f32,
    /// Ground-plane distance to the opponent
    pub distance_to_target: f32,
    /// Whether the current state's timer has run out
    pub timer_expired: bool,
    /// Whether the current navigation target has been reached
    pub target_reached: bool,
}

/// Pure transition function. Retreat on low health overrides everything;
/// otherwise distance thresholds decide, with Retreat and Reposition holding
/// until their exit conditions are met.
pub fn next_state(
    current: AiState,
    profile: &DifficultyProfile,
    inputs: &TransitionInputs,
) -> AiState {
    if inputs.health_fraction < profile.retreat_health_fraction && current != AiState::Retreat {
        return AiState::Retreat;
    }

    let dist = inputs.distance_to_target;
    match current {
        AiState::Idle => {
            if dist < profile.detection_range {
                AiState::Chase
            } else {
                AiState::Idle
            }
        }
        AiState::Chase => {
            if dist < profile.attack_range {
                AiState::Attack
            } else if dist > profile.detection_range {
                AiState::Idle
            } else {
                AiState::Chase
            }
        }
        AiState::Attack => {
            if dist > profile.attack_range {
                AiState::Chase
            } else {
                AiState::Attack
            }
        }
        AiState::Retreat => {
            let recovered = inputs.health_fraction
                > profile.retreat_health_fraction * state_consts::RECOVERY_FACTOR;
            if recovered && inputs.timer_expired {
                engagement_for_distance(profile, dist)
            } else {
                AiState::Retreat
            }
        }
        AiState::Reposition => {
            if inputs.timer_expired || inputs.target_reached {
                engagement_for_distance(profile, dist)
            } else {
                AiState::Reposition
            }
        }
    }
}

/// Distance-based engagement fallback used when leaving Retreat/Reposition
fn engagement_for_distance(profile: &DifficultyProfile, distance: f32) -> AiState {
    if distance < profile.attack_range {
        AiState::Attack
    } else if distance < profile.detection_range {
        AiState::Chase
    } else {
        AiState::Idle
    }
}

/// Wrap an angle into (-PI, PI]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Rotate toward the target at a bounded rate; once facing within epsilon,
/// advance at fixed speed. The resulting position is clamped to the arena.
pub fn drive(tank: &mut Tank, target: Vec2, bounds: &ArenaBounds, dt: f32) {
    let to_target = target - tank.position;
    if to_target.is_zero(1e-4) {
        return;
    }

    let diff = wrap_angle(to_target.angle() - tank.heading);
    if diff.abs() > movement::ANGLE_EPSILON {
        let step = movement::ROTATION_RATE * dt;
        tank.heading = wrap_angle(tank.heading + diff.clamp(-step, step));
    } else {
        tank.position += Vec2::from_angle(tank.heading) * movement::SPEED * dt;
        tank.position = bounds.clamp(tank.position);
    }
}

/// Rotate toward the target without advancing. Used while Attack holds its
/// sweet-spot band and only needs to keep the gun on target.
pub fn aim(tank: &mut Tank, target: Vec2, dt: f32) {
    let to_target = target - tank.position;
    if to_target.is_zero(1e-4) {
        return;
    }

    let diff = wrap_angle(to_target.angle() - tank.heading);
    if diff.abs() > movement::ANGLE_EPSILON {
        let step = movement::ROTATION_RATE * dt;
        tank.heading = wrap_angle(tank.heading + diff.clamp(-step, step));
    }
}

/// Absolute heading error toward a point, in radians
pub fn aim_error(tank: &Tank, target: Vec2) -> f32 {
    let to_target = target - tank.position;
    if to_target.is_zero(1e-4) {
        return 0.0;
    }
    wrap_angle(to_target.angle() - tank.heading).abs()
}
