//! Non-colliding visuals: particles, explosions and the star background.

use rand::Rng;

use crate::collision::Rect;
use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::surface::{Color, Surface};

use super::{EnemyKind, Entity, Frame};

// ── Particle ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Starts at 1.0; the particle is gone once it reaches zero.
    pub life: f32,
    pub decay: f32,
    pub color: Color,
}

impl Particle {
    pub fn new(x: f32, y: f32, color: Color, rng: &mut impl Rng) -> Self {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(1.0f32..4.0);
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life: 1.0,
            decay: rng.gen_range(0.02f32..0.05),
            color,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

impl Entity for Particle {
    fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, 3.0, 3.0)
    }

    fn update(&mut self, _frame: &mut Frame<'_>) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= 0.96;
        self.vy *= 0.96;
        self.life -= self.decay;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let glyph = if self.life > 0.5 { "*" } else { "·" };
        surface.text(self.x, self.y, glyph, self.color);
    }
}

// ── Explosion ────────────────────────────────────────────────────────────────

/// An expanding ring that runs for a fixed duration.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub max_radius: f32,
    pub duration_ms: u64,
    pub started: u64,
    pub elapsed_ms: u64,
    pub color: Color,
}

impl Explosion {
    pub fn new(x: f32, y: f32, max_radius: f32, duration_ms: u64, color: Color, now: u64) -> Self {
        Self {
            x,
            y,
            max_radius,
            duration_ms,
            started: now,
            elapsed_ms: 0,
            color,
        }
    }

    /// Sized and timed to the kind of enemy destroyed.
    pub fn for_enemy(kind: EnemyKind, x: f32, y: f32, now: u64) -> Self {
        let (radius, duration) = match kind {
            EnemyKind::Tank => (50.0, 700),
            EnemyKind::Fast => (22.0, 300),
            EnemyKind::Basic | EnemyKind::Shooter => (32.0, 450),
        };
        Self::new(x, y, radius, duration, kind.color(), now)
    }

    /// Fraction of the duration that has elapsed, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

impl Entity for Explosion {
    fn bounds(&self) -> Rect {
        let r = self.max_radius * self.progress();
        Rect::centered(self.x, self.y, r * 2.0, r * 2.0)
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        self.elapsed_ms = frame.now.saturating_sub(self.started);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let r = self.max_radius * self.progress();
        let glyph = if self.progress() < 0.5 { "✶" } else { "+" };
        for (dx, dy) in [(0.0, 0.0), (-r, 0.0), (r, 0.0), (0.0, -r), (0.0, r)] {
            surface.text(self.x + dx, self.y + dy, glyph, self.color);
        }
    }
}

// ── Star ─────────────────────────────────────────────────────────────────────

/// Background star scrolling down the field.
#[derive(Clone, Debug)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

impl Star {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            x: rng.gen_range(0.0..FIELD_WIDTH),
            y: rng.gen_range(0.0..FIELD_HEIGHT),
            speed: rng.gen_range(0.3f32..1.5),
        }
    }
}

impl Entity for Star {
    fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, 1.0, 1.0)
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        self.y += self.speed;
        if self.y > FIELD_HEIGHT {
            self.y = 0.0;
            self.x = frame.rng.gen_range(0.0..FIELD_WIDTH);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let color = if self.speed > 1.0 { Color::White } else { Color::DarkGrey };
        surface.text(self.x, self.y, ".", color);
    }
}
