pub mod actor;
pub mod footsteps;
pub mod input;
pub mod time;
pub mod tuning;
