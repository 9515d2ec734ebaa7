//! Wave-based arcade shooter simulation.
//!
//! The library holds the whole simulation (entities, combat, wave spawning,
//! level progression and the per-frame driver) plus the terminal-side
//! collaborators it renders and plays sounds through.  `main.rs` only wires
//! the terminal, the input thread and the frame pacing together.

pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;
pub mod progression;
pub mod spawner;
pub mod surface;
pub mod timers;
