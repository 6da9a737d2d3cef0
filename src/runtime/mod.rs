//! Async driver that turns the engine's scheduled continuations into real timers.

pub mod player;

pub use player::{Player, PlayerCommand, PlayerHandle, PlayerOptions};
