//! Difficulty tiers and their tuning tables
//!
//! Each tier is a fixed bundle of ranges, cooldowns and steering weights.
//! The numbers are tuning data, not derived values; Easy in particular keeps
//! its original near-flat range band (30/20/18).

use serde::{Deserialize, Serialize};

/// Difficulty tier selected at game configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
    ];
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}

/// Tuning parameters for one difficulty tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Distance at which an opponent is noticed (Idle -> Chase)
    pub detection_range: f32,
    /// Distance at which the tank commits to attacking (Chase -> Attack)
    pub attack_range: f32,
    /// Minimum engagement distance; closer than this the tank backs off
    pub min_engagement_distance: f32,
    /// Health fraction below which the tank retreats
    pub retreat_health_fraction: f32,
    /// Base seconds between shots
    pub shoot_cooldown: f32,
    /// Base per-decision fire probability
    pub shoot_probability: f32,
    /// Angular tolerance (radians) within which the tank counts as aimed
    pub aim_tolerance: f32,
    /// Distance from a wall at which wall avoidance engages
    pub wall_avoidance_distance: f32,
    /// Distance from a corner at which corner avoidance engages
    pub corner_avoidance_distance: f32,
    /// Weight of the central-area pull
    pub central_area_preference: f32,
    /// Multiplier applied to wall/corner pushes
    pub edge_avoidance_multiplier: f32,
    /// Flat fire-probability bonus for harder tiers
    pub shoot_bias: f32,
}

impl DifficultyProfile {
    /// The fixed tuning table, one row per tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                detection_range: 30.0,
                attack_range: 20.0,
                min_engagement_distance: 18.0,
                retreat_health_fraction: 0.35,
                shoot_cooldown: 2.0,
                shoot_probability: 0.3,
                aim_tolerance: 0.3,
                wall_avoidance_distance: 8.0,
                corner_avoidance_distance: 12.0,
                central_area_preference: 0.5,
                edge_avoidance_multiplier: 1.0,
                shoot_bias: 0.0,
            },
            Difficulty::Normal => Self {
                detection_range: 40.0,
                attack_range: 25.0,
                min_engagement_distance: 15.0,
                retreat_health_fraction: 0.3,
                shoot_cooldown: 1.5,
                shoot_probability: 0.4,
                aim_tolerance: 0.2,
                wall_avoidance_distance: 10.0,
                corner_avoidance_distance: 15.0,
                central_area_preference: 0.8,
                edge_avoidance_multiplier: 1.2,
                shoot_bias: 0.0,
            },
            Difficulty::Hard => Self {
                detection_range: 50.0,
                attack_range: 30.0,
                min_engagement_distance: 12.0,
                retreat_health_fraction: 0.25,
                shoot_cooldown: 1.0,
                shoot_probability: 0.55,
                aim_tolerance: 0.12,
                wall_avoidance_distance: 12.0,
                corner_avoidance_distance: 18.0,
                central_area_preference: 1.2,
                edge_avoidance_multiplier: 1.5,
                shoot_bias: 0.05,
            },
            Difficulty::Insane => Self {
                detection_range: 60.0,
                attack_range: 35.0,
                min_engagement_distance: 10.0,
                retreat_health_fraction: 0.2,
                shoot_cooldown: 0.7,
                shoot_probability: 0.7,
                aim_tolerance: 0.08,
                wall_avoidance_distance: 14.0,
                corner_avoidance_distance: 20.0,
                central_area_preference: 1.5,
                edge_avoidance_multiplier: 1.8,
                shoot_bias: 0.1,
            },
        }
    }
}
