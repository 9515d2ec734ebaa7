//! Collision geometry and the per-frame combat resolver.
//!
//! [`resolve`] runs once per frame after every entity has updated itself.
//! Nothing is removed while the nested scans are running: hits only flip an
//! entity to dead (`alive = false`, `health == 0`) and the collections are
//! compacted at the end, so every score and health change happens exactly
//! once per qualifying event.

use rand::Rng;

use crate::audio::{Audio, SoundEvent};
use crate::compute::Game;
use crate::constants::{FIELD_HEIGHT, HIT_PARTICLES, INTERCEPT_PARTICLES, MAX_PARTICLES};
use crate::entities::{
    BulletOwner, Entity, Explosion, GameStatus, Particle, PowerUp, PowerUpKind,
};
use crate::surface::Color;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned box, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Box of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow every edge outward by `margin`.
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Strict overlap on both axes.  Boxes that only touch along an edge or
    /// at a corner do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlap test with `margin` added to all four edges.  Symmetric: the
    /// boxes count as touching when they are less than `margin` apart.
    pub fn overlaps_with_margin(&self, other: &Rect, margin: f32) -> bool {
        self.expand(margin).overlaps(other)
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────────

/// Resolve every collision of the current frame.
///
/// Per bullet: off-field bullets are dropped; enemy bullets test the player
/// (skipped while shielded or invulnerable); player bullets test enemy
/// bullets first, then enemies.  Power-ups are checked against the player
/// afterwards.  Once the player dies nothing else is resolved.
pub fn resolve(game: &mut Game, rng: &mut impl Rng, audio: &mut dyn Audio) {
    let now = game.now;
    let margin = game.config.bullet_intercept_margin;

    for i in 0..game.bullets.len() {
        if !game.bullets[i].alive {
            continue;
        }
        let bullet_box = game.bullets[i].bounds();
        if bullet_box.bottom() < 0.0 || bullet_box.y > FIELD_HEIGHT {
            game.bullets[i].alive = false;
            continue;
        }

        match game.bullets[i].owner {
            BulletOwner::Enemy(_) => {
                if !game.player.is_vulnerable(now) || !bullet_box.overlaps(&game.player.bounds()) {
                    continue;
                }
                game.bullets[i].alive = false;
                damage_player(game, rng, audio);
                if game.state.status == GameStatus::GameOver {
                    break;
                }
            }
            BulletOwner::Player => {
                let intercepted = (0..game.bullets.len()).find(|&j| {
                    let other = &game.bullets[j];
                    j != i
                        && other.alive
                        && other.owner.is_enemy()
                        && bullet_box.overlaps_with_margin(&other.bounds(), margin)
                });
                if let Some(j) = intercepted {
                    intercept(game, i, j, rng, audio);
                    continue;
                }

                let target = game
                    .enemies
                    .iter()
                    .position(|e| !e.is_destroyed() && bullet_box.overlaps(&e.bounds()));
                if let Some(e) = target {
                    game.bullets[i].alive = false;
                    hit_enemy(game, e, rng, audio);
                }
            }
        }
    }

    if game.state.status != GameStatus::GameOver {
        collect_power_ups(game, audio);
    }

    game.bullets.retain(|b| b.alive);
    game.enemies.retain(|e| !e.is_destroyed());
    game.power_ups.retain(|p| p.alive);
}

fn damage_player(game: &mut Game, rng: &mut impl Rng, audio: &mut dyn Audio) {
    let now = game.now;
    let (cx, cy) = game.player.bounds().center();
    burst(&mut game.particles, cx, cy, Color::White, HIT_PARTICLES, rng);

    game.player.take_hit(now, game.config.invulnerability_ms);
    game.state.health = game.state.health.saturating_sub(1);
    tracing::debug!(health = game.state.health, "Player hit");

    if game.state.health == 0 {
        game.state.status = GameStatus::GameOver;
        game.progression.enter_game_over();
        game.explosions.push(Explosion::new(cx, cy, 60.0, 900, Color::Yellow, now));
        audio.play(SoundEvent::PlayerDestroyed);
        audio.play(SoundEvent::GameOver);
        audio.stop_music();
        tracing::info!(
            score = game.state.score,
            level = game.state.level,
            "Game over"
        );
    } else {
        audio.play(SoundEvent::PlayerDamaged);
    }
}

/// Player bullet `i` meets enemy bullet `j`: both go, no enemy is touched.
fn intercept(game: &mut Game, i: usize, j: usize, rng: &mut impl Rng, audio: &mut dyn Audio) {
    game.bullets[i].alive = false;
    game.bullets[j].alive = false;

    let color = match game.bullets[j].owner {
        BulletOwner::Enemy(kind) => kind.color(),
        BulletOwner::Player => Color::Cyan,
    };
    let (cx, cy) = game.bullets[j].bounds().center();
    burst(&mut game.particles, cx, cy, color, INTERCEPT_PARTICLES, rng);

    game.state.score += game.config.bullet_intercept_bonus;
    audio.play(SoundEvent::BulletIntercept);
}

fn hit_enemy(game: &mut Game, e: usize, rng: &mut impl Rng, audio: &mut dyn Audio) {
    let now = game.now;
    let enemy = &mut game.enemies[e];
    let (cx, cy) = enemy.bounds().center();
    let kind = enemy.kind;

    burst(&mut game.particles, cx, cy, kind.color(), HIT_PARTICLES, rng);
    if !enemy.hit() {
        return;
    }

    let drop_chance = enemy.drop_chance;
    game.explosions.push(Explosion::for_enemy(kind, cx, cy, now));
    if rng.gen_bool(drop_chance.clamp(0.0, 1.0)) {
        let power_kind = PowerUpKind::random(rng);
        game.power_ups.push(PowerUp::new(cx, cy, power_kind));
    }
    game.state.score += kind.score();
    audio.play(SoundEvent::EnemyDestroyed);
}

fn collect_power_ups(game: &mut Game, audio: &mut dyn Audio) {
    let now = game.now;
    let player_box = game.player.bounds();

    for power_up in game.power_ups.iter_mut().filter(|p| p.alive) {
        let bounds = power_up.bounds();
        if bounds.y > FIELD_HEIGHT {
            power_up.alive = false;
            continue;
        }
        if !bounds.overlaps(&player_box) {
            continue;
        }
        power_up.alive = false;
        match power_up.kind {
            PowerUpKind::Health => {
                game.state.health = (game.state.health + 1).min(game.config.max_health);
            }
            kind => game.player.collect(kind, now, &game.config),
        }
        tracing::debug!(kind = ?power_up.kind, "Power-up collected");
        audio.play(SoundEvent::PowerUp);
    }
}

/// Push `count` particles at `(x, y)`, dropping the oldest past the cap.
pub fn burst(
    particles: &mut Vec<Particle>,
    x: f32,
    y: f32,
    color: Color,
    count: usize,
    rng: &mut impl Rng,
) {
    for _ in 0..count {
        particles.push(Particle::new(x, y, color, rng));
    }
    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}
