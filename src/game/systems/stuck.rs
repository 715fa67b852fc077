//! Stuck detection and anti-camping
//!
//! Three independent mechanisms can force a tank into Reposition:
//! a centroid-spread check over recent positions (hard stuck), a randomized
//! long-period sweep against edge camping, and a stickiness accumulator that
//! trips when the tank barely moves for too long.

use rand::Rng;
use smallvec::SmallVec;

use crate::game::constants::stuck::*;
use crate::util::vec2::Vec2;

/// Why a forced reposition was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckReason {
    /// Recent positions cluster within the spread threshold
    Stationary,
    /// Long-period sweep caught the tank loitering near a wall or corner
    Camping,
    /// The tank spent too long with almost no net movement
    Sticky,
}

/// Per-tank stuck/camping tracker
#[derive(Debug, Clone)]
pub struct StuckTracker {
    /// Ring of recent position samples, oldest first. Sampled on an interval
    /// rather than per tick so the window covers a full check period at any
    /// tick rate.
    history: SmallVec<[Vec2; HISTORY_LEN]>,
    /// Countdown to the next history sample
    sample_timer: f32,
    /// Countdown to the next centroid-spread check
    check_timer: f32,
    /// Countdown to the next anti-camp sweep (randomized period)
    camp_timer: f32,
    /// Seconds spent with less than STICKINESS_MOVE_EPSILON of movement
    stickiness: f32,
    /// Reference point stickiness is measured against
    stickiness_anchor: Vec2,
    /// Cooldown preventing back-to-back stickiness repositions
    forced_cooldown: f32,
}

impl StuckTracker {
    pub fn new(position: Vec2) -> Self {
        let mut history = SmallVec::new();
        history.push(position);
        Self {
            history,
            sample_timer: SAMPLE_INTERVAL,
            check_timer: CHECK_INTERVAL,
            camp_timer: rand::thread_rng().gen_range(CAMP_CHECK_MIN..CAMP_CHECK_MAX),
            stickiness: 0.0,
            stickiness_anchor: position,
            forced_cooldown: 0.0,
        }
    }

    /// Record the current position and evaluate all three mechanisms.
    /// Returns the first trigger, if any; the caller forces Reposition.
    pub fn update(
        &mut self,
        position: Vec2,
        near_edge: bool,
        in_combat: bool,
        dt: f32,
    ) -> Option<StuckReason> {
        self.sample_timer -= dt;
        if self.sample_timer <= 0.0 {
            self.sample_timer = SAMPLE_INTERVAL;
            self.record(position);
        }

        if self.forced_cooldown > 0.0 {
            self.forced_cooldown = (self.forced_cooldown - dt).max(0.0);
        }

        // Stickiness bookkeeping runs before any early return so real
        // movement is never missed on a check tick
        if position.distance_to(self.stickiness_anchor) < STICKINESS_MOVE_EPSILON {
            self.stickiness += dt;
        } else {
            self.stickiness_anchor = position;
            self.stickiness = 0.0;
        }

        // Hard stuck check fires immediately, ignoring the cooldown
        self.check_timer -= dt;
        if self.check_timer <= 0.0 {
            self.check_timer = CHECK_INTERVAL;
            if self.history.len() >= HISTORY_LEN && self.spread() < SPREAD_THRESHOLD {
                self.reset_history(position);
                return Some(StuckReason::Stationary);
            }
        }

        self.camp_timer -= dt;
        if self.camp_timer <= 0.0 {
            self.camp_timer = rand::thread_rng().gen_range(CAMP_CHECK_MIN..CAMP_CHECK_MAX);
            if near_edge && !in_combat {
                return Some(StuckReason::Camping);
            }
        }

        let tripped = (near_edge && self.stickiness > STICKINESS_EDGE_THRESHOLD)
            || self.stickiness > STICKINESS_GLOBAL_THRESHOLD;
        if tripped && self.forced_cooldown <= 0.0 {
            self.stickiness = 0.0;
            self.stickiness_anchor = position;
            self.forced_cooldown = FORCED_REPOSITION_COOLDOWN;
            return Some(StuckReason::Sticky);
        }

        None
    }

    /// Maximum sample distance from the centroid of the history
    pub fn spread(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        let mut centroid = Vec2::ZERO;
        for p in &self.history {
            centroid += *p;
        }
        centroid *= 1.0 / self.history.len() as f32;

        self.history
            .iter()
            .map(|p| p.distance_to(centroid))
            .fold(0.0, f32::max)
    }

    /// Collapse the history to a single sample at the given position
    pub fn reset_history(&mut self, position: Vec2) {
        self.history.clear();
        self.history.push(position);
    }

    fn record(&mut self, position: Vec2) {
        if self.history.len() == HISTORY_LEN {
            self.history.remove(0);
        }
        self.history.push(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the tracker until the next spread check fires
    fn run_until_check(tracker: &mut StuckTracker, position: Vec2) -> Option<StuckReason> {
        let dt = 0.1;
        let steps = (CHECK_INTERVAL / dt) as usize + 1;
        for _ in 0..steps {
            if let Some(reason) = tracker.update(position, false, false, dt) {
                return Some(reason);
            }
        }
        None
    }

    #[test]
    fn test_clustered_history_reports_stationary() {
        let pos = Vec2::new(3.0, 3.0);
        let mut tracker = StuckTracker::new(pos);
        let reason = run_until_check(&mut tracker, pos);
        assert_eq!(reason, Some(StuckReason::Stationary));
    }

    #[test]
    fn test_moving_tank_is_not_stationary() {
        let mut tracker = StuckTracker::new(Vec2::ZERO);
        let dt = 0.1;
        let mut pos = Vec2::ZERO;
        let steps = (CHECK_INTERVAL / dt) as usize + 1;
        for _ in 0..steps {
            pos += Vec2::new(1.0, 0.0); // well past the spread threshold
            let verdict = tracker.update(pos, false, false, dt);
            assert_ne!(verdict, Some(StuckReason::Stationary));
        }
    }

    #[test]
    fn test_stationary_check_resets_history() {
        let pos = Vec2::new(3.0, 3.0);
        let mut tracker = StuckTracker::new(pos);
        run_until_check(&mut tracker, pos);
        assert_eq!(tracker.spread(), 0.0);
    }

    #[test]
    fn test_camping_requires_edge_and_no_combat() {
        // Drive long enough that the randomized sweep must have fired at
        // least once; a combat tank in the open never trips it.
        let mut tracker = StuckTracker::new(Vec2::ZERO);
        let mut pos = Vec2::ZERO;
        let mut camped = false;
        for step in 0..4000 {
            // Keep moving so Stationary/Sticky stay quiet
            pos = Vec2::new((step % 2) as f32 * 10.0, 0.0);
            if let Some(reason) = tracker.update(pos, true, false, 0.1) {
                if reason == StuckReason::Camping {
                    camped = true;
                    break;
                }
            }
        }
        assert!(camped);

        let mut tracker = StuckTracker::new(Vec2::ZERO);
        for step in 0..4000 {
            let pos = Vec2::new((step % 2) as f32 * 10.0, 0.0);
            let verdict = tracker.update(pos, true, true, 0.1);
            assert_ne!(verdict, Some(StuckReason::Camping));
        }
    }

    #[test]
    fn test_stickiness_trips_sooner_near_edge() {
        // Near an edge, small shuffling inside the movement epsilon trips
        // the lower threshold first.
        let pos = Vec2::new(40.0, 0.0);
        let mut tracker = StuckTracker::new(pos);
        // Pre-expire the camp sweep risk by using a short run: edge
        // threshold (4s) always fires before CAMP_CHECK_MIN (10s).
        let mut fired_at = None;
        let dt = 0.05;
        for step in 0..((STICKINESS_GLOBAL_THRESHOLD / dt) as usize) {
            // Shuffle within the epsilon so the spread check stays quiet
            let jitter = Vec2::new((step % 2) as f32 * 3.0, 0.0);
            if let Some(StuckReason::Sticky) = tracker.update(pos + jitter, true, false, dt) {
                fired_at = Some(step as f32 * dt);
                break;
            }
        }
        let fired_at = fired_at.expect("stickiness should have fired");
        assert!(fired_at >= STICKINESS_EDGE_THRESHOLD);
        assert!(fired_at < STICKINESS_GLOBAL_THRESHOLD);
    }

    #[test]
    fn test_stickiness_resets_on_real_movement() {
        // The move lands exactly on the spread-check tick: even though that
        // tick reports Stationary, the stickiness reset must still happen.
        let mut tracker = StuckTracker::new(Vec2::ZERO);
        for _ in 0..30 {
            tracker.update(Vec2::new(1.0, 0.0), false, false, 0.1);
        }
        assert!(tracker.stickiness > 0.0);
        let verdict = tracker.update(Vec2::new(20.0, 0.0), false, false, 0.1);
        assert_eq!(verdict, Some(StuckReason::Stationary));
        assert_eq!(tracker.stickiness, 0.0);
    }

    #[test]
    fn test_zero_dt_never_triggers() {
        let pos = Vec2::new(3.0, 3.0);
        let mut tracker = StuckTracker::new(pos);
        for _ in 0..100 {
            assert_eq!(tracker.update(pos, true, false, 0.0), None);
        }
    }
}
