/// Arena geometry constants
///
/// The arena is a flat square on the ground plane. All AI navigation targets
/// are clamped into `[MIN + MARGIN, MAX - MARGIN]` on both axes.
pub mod arena {
    /// Minimum coordinate on both axes
    pub const MIN: f32 = -45.0;
    /// Maximum coordinate on both axes
    pub const MAX: f32 = 45.0;
    /// Safety margin kept between any navigation target and the walls
    pub const MARGIN: f32 = 5.0;
    /// Half extent of the playable square
    pub const HALF_EXTENT: f32 = MAX;
}

/// Tank movement constants
pub mod movement {
    /// Forward speed in units per second
    pub const SPEED: f32 = 10.0;
    /// Maximum turn rate in radians per second
    pub const ROTATION_RATE: f32 = 2.5;
    /// Heading error below which the tank counts as facing its target
    pub const ANGLE_EPSILON: f32 = 0.1;
    /// Distance at which a navigation target counts as reached
    pub const TARGET_REACHED_DISTANCE: f32 = 3.0;
}

/// Heat map constants
///
/// The heat map discourages camping: cells the tank lingers in accumulate
/// heat, and the tactical positioner steers away from hot cells.
pub mod heat {
    /// Cells per axis (grid is RESOLUTION x RESOLUTION)
    pub const RESOLUTION: usize = 15;
    /// Heat values are clamped to [0, MAX_HEAT]
    pub const MAX_HEAT: f32 = 10.0;
    /// Linear decay toward zero, per second
    pub const DECAY_RATE: f32 = 0.1;
    /// Base accumulation in the occupied cell, per second
    pub const GENERATION_RATE: f32 = 1.5;
    /// Distance from a wall inside which seeding/amplification applies
    pub const EDGE_ZONE: f32 = 12.0;
    /// Distance from a corner inside which the stronger corner rules apply
    pub const CORNER_ZONE: f32 = 15.0;
    /// Pre-seeded heat at a wall (linear falloff across EDGE_ZONE)
    pub const WALL_SEED: f32 = 2.0;
    /// Pre-seeded heat at a corner (linear falloff across CORNER_ZONE)
    pub const CORNER_SEED: f32 = 3.5;
    /// Accumulation multiplier at a wall (1.0 at the zone boundary)
    pub const EDGE_AMPLIFY: f32 = 3.0;
    /// Accumulation multiplier at a corner
    pub const CORNER_AMPLIFY: f32 = 4.0;
    /// Neighbor cells within this radius receive a share of generated heat
    pub const NEIGHBOR_FALLOFF_RADIUS: f32 = 9.0;
    /// Fraction of generated heat given to neighbors at zero distance
    pub const NEIGHBOR_SHARE: f32 = 0.5;
}

/// Stuck detection and anti-camping constants
pub mod stuck {
    /// Number of recent position samples kept
    pub const HISTORY_LEN: usize = 5;
    /// Seconds between centroid-spread stuck checks
    pub const CHECK_INTERVAL: f32 = 3.0;
    /// Seconds between position samples, spreading the history window over a
    /// full check interval regardless of tick rate
    pub const SAMPLE_INTERVAL: f32 = CHECK_INTERVAL / HISTORY_LEN as f32;
    /// Max sample distance from centroid below which the tank is stuck
    pub const SPREAD_THRESHOLD: f32 = 2.0;
    /// Minimum delay of the randomized anti-camp sweep (seconds)
    pub const CAMP_CHECK_MIN: f32 = 10.0;
    /// Maximum delay of the randomized anti-camp sweep (seconds)
    pub const CAMP_CHECK_MAX: f32 = 30.0;
    /// Movement below this distance counts as standing still for stickiness
    pub const STICKINESS_MOVE_EPSILON: f32 = 5.0;
    /// Stickiness seconds that force a reposition while near a wall/corner
    pub const STICKINESS_EDGE_THRESHOLD: f32 = 4.0;
    /// Stickiness seconds that force a reposition anywhere
    pub const STICKINESS_GLOBAL_THRESHOLD: f32 = 8.0;
    /// Cooldown between stickiness-forced repositions (seconds)
    pub const FORCED_REPOSITION_COOLDOWN: f32 = 5.0;
}

/// Shoot decision constants
pub mod shoot {
    /// Final fire probability is clamped to [PROB_MIN, PROB_MAX]
    pub const PROB_MIN: f32 = 0.1;
    pub const PROB_MAX: f32 = 0.9;
    /// Cooldown applied when the decision maker declines to fire
    pub const DECLINE_COOLDOWN: f32 = 0.5;
    /// Probability bonus when the target is inside half the attack range
    pub const CLOSE_RANGE_BONUS: f32 = 0.15;
    /// Probability penalty when the target is beyond the attack range
    pub const LONG_RANGE_PENALTY: f32 = 0.2;
    /// Probability bonus when aimed within the tier's tolerance
    pub const AIMED_BONUS: f32 = 0.25;
    /// Probability penalty when not aimed
    pub const UNAIMED_PENALTY: f32 = 0.15;
    /// Fired cooldowns are jittered by U(1 - JITTER, 1 + JITTER)
    pub const COOLDOWN_JITTER: f32 = 0.2;
}

/// Tactical positioner constants
pub mod tactics {
    /// Preferred spacing between friendly tanks
    pub const TANK_SPACING_DISTANCE: f32 = 12.0;
    /// Clearance kept beyond an obstacle's own radius
    pub const OBSTACLE_AVOIDANCE_DISTANCE: f32 = 6.0;
    /// Corner pushes are this much stronger than wall pushes
    pub const CORNER_MULTIPLIER_BOOST: f32 = 1.5;
    /// Central pull weight while in Chase/Attack
    pub const COMBAT_CENTER_WEIGHT: f32 = 0.3;
    /// Displacement of the central pull at the arena edge, per unit weight
    pub const CENTER_PULL_SCALE: f32 = 12.0;
    /// Local heat above which the radial heat probe runs
    pub const HEAT_AVOIDANCE_THRESHOLD: f32 = 3.0;
    /// Number of radial directions sampled by the heat probe
    pub const HEAT_PROBE_DIRECTIONS: usize = 12;
    /// Distance at which each probe direction samples heat
    pub const HEAT_PROBE_DISTANCE: f32 = 10.0;
    /// Maximum displacement toward the coolest probed direction
    pub const HEAT_BIAS_DISTANCE: f32 = 8.0;
}

/// Per-state behavior constants
pub mod state {
    /// Seconds between Idle wander target refreshes
    pub const IDLE_TARGET_REFRESH: f32 = 3.0;
    /// Idle wander targets are picked within this radius of the tank
    pub const IDLE_WANDER_RADIUS: f32 = 15.0;
    /// Seconds between Retreat flee-point refreshes
    pub const RETREAT_REFRESH: f32 = 2.5;
    /// How far past the tank a flee point is projected
    pub const RETREAT_DISTANCE: f32 = 20.0;
    /// Randomized Retreat duration bounds (seconds)
    pub const RETREAT_DURATION_MIN: f32 = 3.0;
    pub const RETREAT_DURATION_MAX: f32 = 5.0;
    /// Health must exceed RECOVERY_FACTOR x retreat threshold to re-engage
    pub const RECOVERY_FACTOR: f32 = 1.5;
    /// Reposition duration (seconds)
    pub const REPOSITION_DURATION: f32 = 4.0;
    /// Reposition targets scatter this far around arena center
    pub const REPOSITION_JITTER: f32 = 10.0;
    /// Attack holds fire position inside [min_distance, factor x attack_range]
    pub const ATTACK_SWEET_SPOT_FACTOR: f32 = 0.8;
    /// Chase shoot probability relative to the tier's base probability
    pub const CHASE_PROB_FACTOR: f32 = 0.5;
    /// Chase shoot cooldown relative to the tier's base cooldown
    pub const CHASE_COOLDOWN_FACTOR: f32 = 1.5;
    /// Retreat shoot probability relative to the tier's base probability
    pub const RETREAT_PROB_FACTOR: f32 = 0.4;
    /// Retreat shoot cooldown relative to the tier's base cooldown
    pub const RETREAT_COOLDOWN_FACTOR: f32 = 2.0;
}

/// Side length of one heat cell in world units
#[inline]
pub fn heat_cell_size() -> f32 {
    (arena::MAX - arena::MIN) / heat::RESOLUTION as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_margin_sane() {
        assert!(arena::MIN < arena::MAX);
        assert!(arena::MARGIN > 0.0);
        assert!(arena::MARGIN * 2.0 < arena::MAX - arena::MIN);
    }

    #[test]
    fn test_heat_cell_size() {
        let size = heat_cell_size();
        assert!((size - 6.0).abs() < 0.001); // 90 / 15
        assert!(size * heat::RESOLUTION as f32 <= arena::MAX - arena::MIN + 0.001);
    }

    #[test]
    fn test_heat_rates_saturate_below_max() {
        // A tank camping the center must approach MAX_HEAT, not blow past it
        assert!(heat::GENERATION_RATE > heat::DECAY_RATE);
        assert!(heat::MAX_HEAT > 0.0);
    }

    #[test]
    fn test_corner_rules_dominate_wall_rules() {
        assert!(heat::CORNER_SEED > heat::WALL_SEED);
        assert!(heat::CORNER_AMPLIFY > heat::EDGE_AMPLIFY);
        assert!(heat::CORNER_ZONE >= heat::EDGE_ZONE);
        assert!(tactics::CORNER_MULTIPLIER_BOOST > 1.0);
    }

    #[test]
    fn test_shoot_probability_clamps_ordered() {
        assert!(shoot::PROB_MIN > 0.0);
        assert!(shoot::PROB_MIN < shoot::PROB_MAX);
        assert!(shoot::PROB_MAX < 1.0);
    }

    #[test]
    fn test_stickiness_thresholds_ordered() {
        // The anywhere threshold must be the harder one to hit
        assert!(stuck::STICKINESS_EDGE_THRESHOLD < stuck::STICKINESS_GLOBAL_THRESHOLD);
        assert!(stuck::CAMP_CHECK_MIN < stuck::CAMP_CHECK_MAX);
    }

    #[test]
    fn test_stuck_samples_cover_the_check_window() {
        let window = stuck::SAMPLE_INTERVAL * stuck::HISTORY_LEN as f32;
        assert!((window - stuck::CHECK_INTERVAL).abs() < 0.001);
        // A tank at full speed must spread well past the threshold
        assert!(movement::SPEED * stuck::SAMPLE_INTERVAL > stuck::SPREAD_THRESHOLD);
    }

    #[test]
    fn test_state_factors_reduce_combat_pressure() {
        assert!(state::CHASE_PROB_FACTOR < 1.0);
        assert!(state::RETREAT_PROB_FACTOR < state::CHASE_PROB_FACTOR);
        assert!(state::CHASE_COOLDOWN_FACTOR > 1.0);
        assert!(state::RETREAT_COOLDOWN_FACTOR > state::CHASE_COOLDOWN_FACTOR);
        assert!(state::ATTACK_SWEET_SPOT_FACTOR < 1.0);
        assert!(state::RECOVERY_FACTOR > 1.0);
    }
}
