//! Probabilistic fire control
//!
//! Firing is a gated random draw rather than a reflex: the current state must
//! allow shooting, the decision cooldown must have elapsed, and the weapon
//! must be reloaded. The draw probability starts from the state's base value
//! and shifts with range and aim quality before being clamped, so even a
//! perfectly lined-up Insane bot sometimes holds fire.

use rand::Rng;

use crate::game::constants::shoot::*;
use crate::game::systems::difficulty::DifficultyProfile;
use crate::game::systems::state_machine::StateConfig;

/// Per-tank fire decision timer and draw logic
#[derive(Debug, Clone)]
pub struct ShootDecider {
    /// Seconds until the next fire decision may be made
    cooldown: f32,
}

impl Default for ShootDecider {
    fn default() -> Self {
        Self::new()
    }
}

impl ShootDecider {
    pub fn new() -> Self {
        Self { cooldown: 0.0 }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Decide whether to fire this tick. A successful draw arms the jittered
    /// state cooldown; a declined draw backs off briefly so the question is
    /// re-asked soon. Gate failures leave the cooldown untouched.
    pub fn decide<R: Rng>(
        &mut self,
        rng: &mut R,
        config: &StateConfig,
        profile: &DifficultyProfile,
        distance: f32,
        aim_error: f32,
        weapon_ready: bool,
    ) -> bool {
        if !config.shooting_enabled || !weapon_ready || self.cooldown > 0.0 {
            return false;
        }

        let p = fire_probability(config, profile, distance, aim_error);
        if rng.gen::<f32>() < p {
            self.cooldown =
                config.shoot_cooldown * rng.gen_range(1.0 - COOLDOWN_JITTER..1.0 + COOLDOWN_JITTER);
            true
        } else {
            self.cooldown = DECLINE_COOLDOWN;
            false
        }
    }
}

/// Fire probability for one decision: the state's base value shifted by range
/// band and aim quality plus the tier's bias, clamped so the result is never
/// a certainty in either direction.
pub fn fire_probability(
    config: &StateConfig,
    profile: &DifficultyProfile,
    distance: f32,
    aim_error: f32,
) -> f32 {
    let mut p = config.shoot_probability + profile.shoot_bias;

    if distance < profile.attack_range * 0.5 {
        p += CLOSE_RANGE_BONUS;
    } else if distance > profile.attack_range {
        p -= LONG_RANGE_PENALTY;
    }

    if aim_error <= profile.aim_tolerance {
        p += AIMED_BONUS;
    } else {
        p -= UNAIMED_PENALTY;
    }

    p.clamp(PROB_MIN, PROB_MAX)
}
