pub mod constants;
pub mod state;
pub mod systems;
