pub mod controller;
pub mod difficulty;
pub mod heat_map;
pub mod shooting;
pub mod state_machine;
pub mod stuck;
pub mod tactics;
