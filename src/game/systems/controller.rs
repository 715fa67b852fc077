//! Per-tank AI controller and the manager that owns the fleet
//!
//! [`AiController`] is the composition root for one hostile tank: it owns the
//! heat map, stuck tracker, state machine bookkeeping, and fire-control timer,
//! and advances them all in a fixed order each tick. [`AiManager`] keeps one
//! controller per registered bot and runs them sequentially with fresh peer
//! snapshots.

use hashbrown::HashMap;
use rand::Rng;
use tracing::debug;

use crate::game::constants::{movement, state as state_consts};
use crate::game::state::{ArenaBounds, Obstacle, Tank, TankId};
use crate::game::systems::difficulty::{Difficulty, DifficultyProfile};
use crate::game::systems::heat_map::HeatMap;
use crate::game::systems::shooting::ShootDecider;
use crate::game::systems::state_machine::{
    self, AiState, StateConfig, TransitionInputs,
};
use crate::game::systems::stuck::{StuckReason, StuckTracker};
use crate::game::systems::tactics::{self, TacticalContext};
use crate::util::vec2::Vec2;

/// Full AI stack for a single hostile tank.
///
/// The orchestrator calls [`AiController::update`] once per frame with the
/// controlled tank and its current opponent; everything else is internal.
pub struct AiController {
    difficulty: Difficulty,
    profile: DifficultyProfile,
    bounds: ArenaBounds,
    state: AiState,
    config: StateConfig,
    /// Remaining duration of the current state, where one applies
    state_timer: f32,
    /// Countdown until the wander / flee target is re-picked
    refresh_timer: f32,
    /// Raw navigation target before tactical adjustment
    nav_target: Vec2,
    heat: HeatMap,
    stuck: StuckTracker,
    shooter: ShootDecider,
    peers: Vec<Vec2>,
    obstacles: Vec<Obstacle>,
}

impl AiController {
    pub fn new(position: Vec2, difficulty: Difficulty, bounds: ArenaBounds) -> Self {
        let profile = DifficultyProfile::for_difficulty(difficulty);
        let config = StateConfig::for_state(AiState::Idle, &profile);
        Self {
            difficulty,
            profile,
            bounds,
            state: AiState::Idle,
            config,
            state_timer: config.timer,
            refresh_timer: 0.0,
            nav_target: position,
            heat: HeatMap::new(bounds, crate::game::constants::heat::RESOLUTION),
            stuck: StuckTracker::new(position),
            shooter: ShootDecider::new(),
            peers: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> AiState {
        self.state
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Swap the difficulty tier in place. The current state is kept; its
    /// shooting configuration is rebuilt from the new profile.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = DifficultyProfile::for_difficulty(difficulty);
        self.config = StateConfig::for_state(self.state, &self.profile);
    }

    /// Replace the peer position snapshot used for spacing
    pub fn set_peers(&mut self, positions: &[Vec2]) {
        self.peers.clear();
        self.peers.extend_from_slice(positions);
    }

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    /// Advisory query: would a shot taken right now be sensible? True when
    /// the current state allows firing, the gun is loaded, and the hull is
    /// aimed within the tier's tolerance. Does not consume anything.
    pub fn try_shoot(&self, tank: &Tank, opponent: &Tank) -> bool {
        self.config.shooting_enabled
            && tank.is_weapon_ready()
            && state_machine::aim_error(tank, opponent.position) <= self.profile.aim_tolerance
    }

    /// Advance the controller one tick: timers, heat, stuck detection, state
    /// transitions, navigation, movement, and the fire decision, in that
    /// order. A non-positive `dt` or a dead tank leaves everything untouched.
    pub fn update(&mut self, tank: &mut Tank, opponent: &Tank, dt: f32) {
        if dt <= 0.0 || !tank.alive {
            return;
        }

        self.shooter.tick(dt);
        if self.state_timer > 0.0 {
            self.state_timer = (self.state_timer - dt).max(0.0);
        }
        if self.refresh_timer > 0.0 {
            self.refresh_timer = (self.refresh_timer - dt).max(0.0);
        }

        self.heat.update(tank.position, dt);

        let in_combat = matches!(self.state, AiState::Chase | AiState::Attack);
        let near_edge = self
            .bounds
            .is_near_edge(tank.position, self.profile.wall_avoidance_distance);

        // Holding the Attack sweet spot is deliberate stillness, not being
        // stuck. The camp/stickiness timers keep running; only the spread
        // history must not accuse the hold.
        let holding =
            self.state == AiState::Attack && self.engagement_target(tank, opponent).is_none();
        if holding {
            self.stuck.reset_history(tank.position);
        }
        let verdict = match self.stuck.update(tank.position, near_edge, in_combat, dt) {
            Some(StuckReason::Stationary) if holding => None,
            other => other,
        };

        // Low health outranks a forced reposition
        let low_health = tank.health_fraction() < self.profile.retreat_health_fraction;

        match verdict {
            Some(reason) if !low_health => {
                if self.state != AiState::Reposition {
                    debug!(tank = %tank.name, ?reason, "forcing reposition");
                    self.transition(AiState::Reposition);
                }
            }
            _ => {
                let distance = tank.position.distance_to(opponent.position);
                let inputs = TransitionInputs {
                    health_fraction: tank.health_fraction(),
                    distance_to_target: distance,
                    timer_expired: self.state_timer <= 0.0,
                    target_reached: tank.position.distance_to(self.nav_target)
                        < movement::TARGET_REACHED_DISTANCE,
                };
                let next = state_machine::next_state(self.state, &self.profile, &inputs);
                if next != self.state {
                    debug!(tank = %tank.name, from = ?self.state, to = ?next, "state transition");
                    self.transition(next);
                }
            }
        }

        self.refresh_nav_target(tank, opponent);

        let in_combat = matches!(self.state, AiState::Chase | AiState::Attack);
        let hold_and_aim =
            self.state == AiState::Attack && self.engagement_target(tank, opponent).is_none();
        if hold_and_aim {
            state_machine::aim(tank, opponent.position, dt);
        } else {
            let ctx = TacticalContext {
                bounds: &self.bounds,
                profile: &self.profile,
                heat: &self.heat,
                peers: &self.peers,
                obstacles: &self.obstacles,
                opponent: opponent.position,
                in_combat,
            };
            let adjusted = tactics::adjust_target(&ctx, tank.position, self.nav_target);
            state_machine::drive(tank, adjusted, &self.bounds, dt);
        }

        let distance = tank.position.distance_to(opponent.position);
        let aim_error = state_machine::aim_error(tank, opponent.position);
        let mut rng = rand::thread_rng();
        if self.shooter.decide(
            &mut rng,
            &self.config,
            &self.profile,
            distance,
            aim_error,
            tank.is_weapon_ready(),
        ) {
            debug!(tank = %tank.name, distance, "fire commanded");
            tank.request_fire();
        }
    }

    /// Enter a new state: swap the shooting configuration atomically, arm the
    /// state timer, and pick an initial navigation target where the state
    /// owns one.
    fn transition(&mut self, next: AiState) {
        self.state = next;
        self.config = StateConfig::for_state(next, &self.profile);
        self.state_timer = self.config.timer;
        self.refresh_timer = 0.0;

        if next == AiState::Reposition {
            let mut rng = rand::thread_rng();
            let jitter = Vec2::new(
                rng.gen_range(-state_consts::REPOSITION_JITTER..state_consts::REPOSITION_JITTER),
                rng.gen_range(-state_consts::REPOSITION_JITTER..state_consts::REPOSITION_JITTER),
            );
            self.nav_target = self.bounds.clamp_with_margin(self.bounds.center() + jitter);
        }
    }

    /// Keep the raw navigation target current for the active state
    fn refresh_nav_target(&mut self, tank: &Tank, opponent: &Tank) {
        match self.state {
            AiState::Idle => {
                if self.refresh_timer <= 0.0 {
                    let mut rng = rand::thread_rng();
                    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                    let radius = rng.gen_range(0.0..state_consts::IDLE_WANDER_RADIUS);
                    self.nav_target = self
                        .bounds
                        .clamp_with_margin(tank.position + Vec2::from_angle(angle) * radius);
                    self.refresh_timer = state_consts::IDLE_TARGET_REFRESH;
                }
            }
            AiState::Retreat => {
                if self.refresh_timer <= 0.0 {
                    let away = tank.position - opponent.position;
                    let dir = if away.is_zero(1e-4) {
                        let mut rng = rand::thread_rng();
                        Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
                    } else {
                        away.normalize()
                    };
                    self.nav_target = self.bounds.clamp_with_margin(
                        tank.position + dir * state_consts::RETREAT_DISTANCE,
                    );
                    self.refresh_timer = state_consts::RETREAT_REFRESH;
                }
            }
            AiState::Chase | AiState::Attack => {
                if let Some(target) = self.engagement_target(tank, opponent) {
                    self.nav_target = target;
                }
            }
            // Chosen once at transition
            AiState::Reposition => {}
        }
    }

    /// Where to stand relative to the opponent. `None` means the current
    /// position is already inside the Attack sweet-spot band and the tank
    /// should hold and aim instead of moving.
    fn engagement_target(&self, tank: &Tank, opponent: &Tank) -> Option<Vec2> {
        let away = tank.position - opponent.position;
        let (dir, dist) = away.normalize_with_length();
        let min = self.profile.min_engagement_distance;

        match self.state {
            AiState::Attack => {
                let sweet_max =
                    self.profile.attack_range * state_consts::ATTACK_SWEET_SPOT_FACTOR;
                if dist >= min && dist <= sweet_max {
                    None
                } else if dist > 0.0 {
                    Some(opponent.position + dir * (min + sweet_max) * 0.5)
                } else {
                    // On top of the opponent: any direction restores spacing
                    Some(opponent.position + Vec2::new(min, 0.0))
                }
            }
            _ => {
                if dist > 0.0 && dist < min {
                    Some(opponent.position + dir * min)
                } else {
                    Some(opponent.position)
                }
            }
        }
    }
}

/// Per-state controller counts for one manager tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiManagerStats {
    pub total: usize,
    pub idle: usize,
    pub chasing: usize,
    pub attacking: usize,
    pub retreating: usize,
    pub repositioning: usize,
}

/// Owns one [`AiController`] per registered bot tank
#[derive(Default)]
pub struct AiManager {
    controllers: HashMap<TankId, AiController>,
}

impl AiManager {
    pub fn new() -> Self {
        Self {
            controllers: HashMap::new(),
        }
    }

    /// Attach a controller to a tank and mark it as a bot.
    pub fn register_bot(&mut self, tank: &mut Tank, difficulty: Difficulty, bounds: ArenaBounds) {
        tank.is_bot = true;
        debug!(tank = %tank.name, ?difficulty, "bot registered");
        self.controllers
            .insert(tank.id, AiController::new(tank.position, difficulty, bounds));
    }

    pub fn unregister_bot(&mut self, id: &TankId) -> bool {
        self.controllers.remove(id).is_some()
    }

    pub fn get(&self, id: &TankId) -> Option<&AiController> {
        self.controllers.get(id)
    }

    pub fn get_mut(&mut self, id: &TankId) -> Option<&mut AiController> {
        self.controllers.get_mut(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Advance every registered bot one tick, refreshing each controller's
    /// peer snapshot with the positions of the other live bots first.
    pub fn update_all(&mut self, bots: &mut [Tank], opponent: &Tank, dt: f32) {
        let mut peers: Vec<Vec2> = Vec::with_capacity(bots.len());

        for i in 0..bots.len() {
            let tank = &bots[i];
            if !tank.alive || !self.controllers.contains_key(&tank.id) {
                continue;
            }

            peers.clear();
            peers.extend(
                bots.iter()
                    .enumerate()
                    .filter(|(j, other)| *j != i && other.alive && other.is_bot)
                    .map(|(_, other)| other.position),
            );

            let id = bots[i].id;
            if let Some(controller) = self.controllers.get_mut(&id) {
                controller.set_peers(&peers);
                controller.update(&mut bots[i], opponent, dt);
            }
        }
    }

    pub fn stats(&self) -> AiManagerStats {
        let mut stats = AiManagerStats {
            total: self.controllers.len(),
            ..Default::default()
        };
        for controller in self.controllers.values() {
            match controller.state() {
                AiState::Idle => stats.idle += 1,
                AiState::Chase => stats.chasing += 1,
                AiState::Attack => stats.attacking += 1,
                AiState::Retreat => stats.retreating += 1,
                AiState::Reposition => stats.repositioning += 1,
            }
        }
        stats
    }
}

const CALLSIGN_PREFIXES: &[&str] = &[
    "Viper", "Rhino", "Jackal", "Mamba", "Basilisk", "Warthog", "Scarab", "Kodiak", "Fennec",
    "Harrier",
];

/// Random callsign for a freshly spawned bot, e.g. `Rhino-07`
pub fn generate_callsign() -> String {
    let mut rng = rand::thread_rng();
    let prefix = CALLSIGN_PREFIXES[rng.gen_range(0..CALLSIGN_PREFIXES.len())];
    format!("{}-{:02}", prefix, rng.gen_range(1..100))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot_at(position: Vec2) -> Tank {
        let mut tank = Tank::new(generate_callsign(), position, 100.0);
        tank.is_bot = true;
        tank
    }

    fn controller_for(tank: &Tank, difficulty: Difficulty) -> AiController {
        AiController::new(tank.position, difficulty, ArenaBounds::default())
    }

    #[test]
    fn test_try_shoot_false_while_shooting_disabled() {
        // Fresh controllers are Idle; perfect geometry must not matter
        let tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(5.0, 0.0), 100.0);

        let controller = controller_for(&tank, Difficulty::Insane);
        assert_eq!(controller.state(), AiState::Idle);
        assert!(!controller.try_shoot(&tank, &opponent));
    }

    #[test]
    fn test_try_shoot_requires_loaded_gun_and_aim() {
        let mut tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(10.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        // Two ticks walk Idle -> Chase -> Attack at this distance
        controller.update(&mut tank, &opponent, 0.01);
        controller.update(&mut tank, &opponent, 0.01);
        assert_eq!(controller.state(), AiState::Attack);

        tank.heading = 0.0; // facing the opponent at +x
        tank.reload = 0.0;
        assert!(controller.try_shoot(&tank, &opponent));

        tank.reload = 1.0;
        assert!(!controller.try_shoot(&tank, &opponent));

        tank.reload = 0.0;
        tank.heading = 2.0; // well outside any tier's aim tolerance
        assert!(!controller.try_shoot(&tank, &opponent));
    }

    #[test]
    fn test_zero_dt_update_is_a_no_op() {
        let mut tank = bot_at(Vec2::new(5.0, 5.0));
        let opponent = Tank::new("Player", Vec2::new(10.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        let before = tank.clone();
        let state_before = controller.state();
        for _ in 0..10 {
            controller.update(&mut tank, &opponent, 0.0);
        }
        assert_eq!(tank.position, before.position);
        assert_eq!(tank.heading, before.heading);
        assert!(!tank.fire_requested);
        assert_eq!(controller.state(), state_before);
    }

    #[test]
    fn test_dead_tank_is_left_alone() {
        let mut tank = bot_at(Vec2::ZERO);
        tank.alive = false;
        let opponent = Tank::new("Player", Vec2::new(10.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        let before = tank.clone();
        controller.update(&mut tank, &opponent, 0.1);
        assert_eq!(tank.position, before.position);
        assert_eq!(controller.state(), AiState::Idle);
    }

    #[test]
    fn test_detection_pulls_idle_into_chase() {
        let mut tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(25.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        controller.update(&mut tank, &opponent, 0.01);
        assert_eq!(controller.state(), AiState::Chase);
    }

    #[test]
    fn test_distant_opponent_leaves_bot_idle() {
        let mut tank = bot_at(Vec2::new(-40.0, -40.0));
        let opponent = Tank::new("Player", Vec2::new(40.0, 40.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Easy);

        controller.update(&mut tank, &opponent, 0.01);
        assert_eq!(controller.state(), AiState::Idle);
    }

    #[test]
    fn test_low_health_forces_retreat_next_update() {
        let mut tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(10.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        controller.update(&mut tank, &opponent, 0.01);
        tank.apply_damage(80.0); // 0.2 fraction, below the 0.3 threshold
        controller.update(&mut tank, &opponent, 0.01);
        assert_eq!(controller.state(), AiState::Retreat);
    }

    #[test]
    fn test_retreat_moves_away_from_opponent() {
        let mut tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(10.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        controller.update(&mut tank, &opponent, 0.01);
        tank.apply_damage(80.0);

        let start_distance = tank.position.distance_to(opponent.position);
        for _ in 0..60 {
            controller.update(&mut tank, &opponent, 0.05);
        }
        assert_eq!(controller.state(), AiState::Retreat);
        assert!(tank.position.distance_to(opponent.position) > start_distance);
    }

    #[test]
    fn test_pinned_tank_gets_repositioned() {
        // Simulate a blocked tank by snapping it back every tick; the
        // spread check must eventually force Reposition.
        let pinned = Vec2::new(5.0, 5.0);
        let mut tank = bot_at(pinned);
        let opponent = Tank::new("Player", Vec2::new(-40.0, -40.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        let mut repositioned = false;
        for _ in 0..100 {
            controller.update(&mut tank, &opponent, 0.1);
            tank.position = pinned;
            if controller.state() == AiState::Reposition {
                repositioned = true;
                break;
            }
        }
        assert!(repositioned);
    }

    #[test]
    fn test_low_health_outranks_forced_reposition() {
        // Health drops right before the spread check fires: the retreat
        // override must win over the stuck-forced Reposition.
        let pinned = Vec2::new(5.0, 5.0);
        let mut tank = bot_at(pinned);
        let opponent = Tank::new("Player", Vec2::new(-40.0, -40.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        for _ in 0..29 {
            controller.update(&mut tank, &opponent, 0.1);
            tank.position = pinned;
        }
        tank.apply_damage(90.0); // fraction 0.1, below the 0.3 threshold
        for _ in 0..20 {
            controller.update(&mut tank, &opponent, 0.1);
            tank.position = pinned;
            assert_ne!(controller.state(), AiState::Reposition);
        }
        assert_eq!(controller.state(), AiState::Retreat);
    }

    #[test]
    fn test_long_attack_hold_still_trips_stickiness() {
        // Holding the sweet spot suppresses the spread check only; the
        // anywhere-stickiness threshold keeps counting and eventually
        // forces a reposition.
        let mut tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(17.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        let mut repositioned = false;
        for _ in 0..100 {
            controller.update(&mut tank, &opponent, 0.1);
            if controller.state() == AiState::Reposition {
                repositioned = true;
                break;
            }
        }
        assert!(repositioned);
    }

    #[test]
    fn test_chase_closes_distance() {
        let mut tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(35.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        let start_distance = tank.position.distance_to(opponent.position);
        for _ in 0..100 {
            controller.update(&mut tank, &opponent, 0.05);
        }
        assert!(tank.position.distance_to(opponent.position) < start_distance);
    }

    #[test]
    fn test_set_difficulty_keeps_state() {
        let mut tank = bot_at(Vec2::ZERO);
        let opponent = Tank::new("Player", Vec2::new(25.0, 0.0), 100.0);
        let mut controller = controller_for(&tank, Difficulty::Normal);

        controller.update(&mut tank, &opponent, 0.01);
        let state = controller.state();
        controller.set_difficulty(Difficulty::Insane);
        assert_eq!(controller.state(), state);
        assert_eq!(controller.difficulty(), Difficulty::Insane);
    }

    #[test]
    fn test_manager_register_and_unregister() {
        let mut manager = AiManager::new();
        let mut tank = Tank::new(generate_callsign(), Vec2::ZERO, 100.0);

        manager.register_bot(&mut tank, Difficulty::Hard, ArenaBounds::default());
        assert!(tank.is_bot);
        assert_eq!(manager.len(), 1);
        assert!(manager.get(&tank.id).is_some());

        assert!(manager.unregister_bot(&tank.id));
        assert!(!manager.unregister_bot(&tank.id));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_manager_updates_every_live_bot() {
        let mut manager = AiManager::new();
        let bounds = ArenaBounds::default();
        let mut bots = vec![
            bot_at(Vec2::new(-35.0, 0.0)),
            bot_at(Vec2::new(35.0, 0.0)),
            bot_at(Vec2::new(0.0, 35.0)),
        ];
        for bot in &mut bots {
            manager.register_bot(bot, Difficulty::Normal, bounds);
        }
        let opponent = Tank::new("Player", Vec2::ZERO, 100.0);

        let start: Vec<Vec2> = bots.iter().map(|b| b.position).collect();
        for _ in 0..100 {
            manager.update_all(&mut bots, &opponent, 0.05);
        }
        // Every bot detects the central opponent and moves
        for (bot, start_pos) in bots.iter().zip(&start) {
            assert!(bot.position.distance_to(*start_pos) > 0.5, "{}", bot.name);
        }

        let stats = manager.stats();
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn test_manager_skips_dead_bots() {
        let mut manager = AiManager::new();
        let bounds = ArenaBounds::default();
        let mut bots = vec![bot_at(Vec2::new(-20.0, 0.0))];
        manager.register_bot(&mut bots[0], Difficulty::Normal, bounds);
        bots[0].alive = false;

        let opponent = Tank::new("Player", Vec2::ZERO, 100.0);
        let before = bots[0].position;
        manager.update_all(&mut bots, &opponent, 0.1);
        assert_eq!(bots[0].position, before);
    }

    #[test]
    fn test_callsigns_have_prefix_and_number() {
        for _ in 0..20 {
            let name = generate_callsign();
            let (prefix, number) = name.split_once('-').expect("dash separator");
            assert!(CALLSIGN_PREFIXES.contains(&prefix));
            assert!(number.parse::<u32>().is_ok());
        }
    }
}
