//! Game entities and the aggregate state shown to the player.
//!
//! Every entity advances itself one tick at a time through [`Entity::update`]
//! and renders through [`Entity::draw`]; drawing never mutates.

mod bullet;
mod effects;
mod enemy;
mod player;
mod power_up;

use rand::RngCore;

use crate::collision::Rect;
use crate::input::InputState;
use crate::surface::Surface;

pub use bullet::{Bullet, BulletOwner};
pub use effects::{Explosion, Particle, Star};
pub use enemy::{DiveState, Enemy, EnemyKind, Motion};
pub use player::{Player, StatusEffect, StatusEffects};
pub use power_up::{PowerUp, PowerUpKind};

/// Everything an entity may look at while advancing one tick.
pub struct Frame<'a> {
    /// Game clock in milliseconds.
    pub now: u64,
    pub input: InputState,
    /// Centre of the player ship; divers aim at it.
    pub target: (f32, f32),
    pub rng: &'a mut dyn RngCore,
}

pub trait Entity {
    fn bounds(&self) -> Rect;

    /// Advance one tick.
    fn update(&mut self, frame: &mut Frame<'_>);

    fn draw(&self, surface: &mut dyn Surface);

    fn collides_with(&self, other: &dyn Entity) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

// ── Aggregate state ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// What the HUD needs to know.  Score and health are mutated by the combat
/// resolver, level and victory by the level progression.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub score: u32,
    pub health: u32,
    pub status: GameStatus,
    /// Set while a cleared level is waiting to advance.
    pub victory: bool,
    pub level: u32,
}

impl GameState {
    pub fn new(max_health: u32) -> Self {
        Self {
            score: 0,
            health: max_health,
            status: GameStatus::Playing,
            victory: false,
            level: 1,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
