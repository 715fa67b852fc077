//! Tank Arena AI
//!
//! Combat AI for the hostile tanks in a top-down arena shooter. Each bot runs
//! a five-state behavior machine (Idle, Chase, Attack, Retreat, Reposition)
//! fed by a decaying occupancy heat map, stuck/camping detection, a tactical
//! positioner that perturbs navigation targets with displacement forces, and
//! probabilistic fire control. Four difficulty tiers tune every threshold.
//!
//! The crate mutates only the tanks handed to it: the game orchestrator owns
//! entity lifecycles, projectiles, and damage, and consumes fire commands via
//! [`game::state::Tank::take_fire_request`].

pub mod config;
pub mod game;
pub mod util;
