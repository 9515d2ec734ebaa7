use rand::{Rng, RngCore};

use crate::collision::Rect;
use crate::constants::*;
use crate::difficulty::DifficultyConfig;
use crate::surface::{Color, Surface};

use super::{Bullet, Entity, Frame};

// ── Kinds ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    /// Fires most often, bobs vertically in formation.
    Shooter,
    /// Three hits to kill, shrinks with each hit.
    Tank,
    /// Double speed with erratic sideways motion.
    Fast,
}

impl EnemyKind {
    pub fn base_health(&self) -> u32 {
        match self {
            EnemyKind::Tank => 3,
            _ => 1,
        }
    }

    pub fn speed_factor(&self) -> f32 {
        match self {
            EnemyKind::Basic | EnemyKind::Shooter => 1.0,
            EnemyKind::Tank => 0.5,
            EnemyKind::Fast => 2.0,
        }
    }

    /// Chance per tick to fire once the cooldown allows, before level scaling.
    pub fn shoot_chance(&self) -> f64 {
        match self {
            EnemyKind::Basic => 0.003,
            EnemyKind::Shooter => 0.012,
            EnemyKind::Tank => 0.004,
            EnemyKind::Fast => 0.006,
        }
    }

    pub fn shot_interval_ms(&self) -> u64 {
        match self {
            EnemyKind::Shooter => 600,
            _ => 1_000,
        }
    }

    /// Scales the level's power-up drop chance.
    pub fn drop_factor(&self) -> f64 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Shooter => 1.2,
            EnemyKind::Tank => 2.0,
            EnemyKind::Fast => 1.5,
        }
    }

    /// Score awarded when destroyed.
    pub fn score(&self) -> u32 {
        match self {
            EnemyKind::Basic => 100,
            EnemyKind::Shooter => 150,
            EnemyKind::Fast => 200,
            EnemyKind::Tank => 300,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            EnemyKind::Basic => Color::Green,
            EnemyKind::Shooter => Color::Red,
            EnemyKind::Tank => Color::DarkYellow,
            EnemyKind::Fast => Color::Magenta,
        }
    }

    pub fn bullet_color(&self) -> Color {
        match self {
            EnemyKind::Basic => Color::Magenta,
            EnemyKind::Shooter => Color::Red,
            EnemyKind::Tank => Color::Yellow,
            EnemyKind::Fast => Color::DarkMagenta,
        }
    }

    fn base_size(&self) -> f32 {
        match self {
            EnemyKind::Tank => TANK_SIZE,
            _ => ENEMY_SIZE,
        }
    }

    fn sprite(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "«▼»",
            EnemyKind::Shooter => "(◎)",
            EnemyKind::Tank => "[█]",
            EnemyKind::Fast => "<v>",
        }
    }
}

// ── Behaviour state ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Descending from above the field towards the formation row.
    Entering,
    /// Sweeping left and right with the formation.
    Sweeping,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiveState {
    Ready,
    Diving { started: u64, vx: f32 },
    Returning,
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    /// Top-left of the full-size box; hit tanks shrink around its centre.
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
    pub health: u32,
    pub max_health: u32,
    /// Horizontal sweep speed per tick.
    pub speed: f32,
    pub shoot_chance: f64,
    pub drop_chance: f64,
    /// Formation slot the enemy sweeps with and returns to after a dive.
    pub slot_x: f32,
    pub slot_y: f32,
    /// +1 sweeping right, -1 sweeping left.
    pub direction: f32,
    pub motion: Motion,
    pub can_dive: bool,
    pub dive: DiveState,
    pub last_shot: Option<u64>,
    pub off_field_since: Option<u64>,
    bob_phase: f32,
}

impl Enemy {
    /// An enemy whose formation slot is at `(slot_x, slot_y)`, scaled to
    /// the level.  It starts above its slot and flies in.
    pub fn new(
        kind: EnemyKind,
        slot_x: f32,
        slot_y: f32,
        difficulty: &DifficultyConfig,
        can_dive: bool,
    ) -> Self {
        // Tanks always take exactly three hits; the level scales the rest.
        let health = if kind == EnemyKind::Tank {
            kind.base_health()
        } else {
            ((kind.base_health() as f32 * difficulty.health_multiplier).round() as u32)
                .max(kind.base_health())
        };
        Self {
            x: slot_x,
            y: slot_y - ENTRY_DISTANCE,
            kind,
            health,
            max_health: health,
            speed: BASE_ENEMY_SPEED * kind.speed_factor() * difficulty.speed_multiplier,
            shoot_chance: (kind.shoot_chance() * difficulty.shoot_rate_multiplier).min(1.0),
            drop_chance: (difficulty.power_up_drop_chance * kind.drop_factor()).min(1.0),
            slot_x,
            slot_y,
            direction: 1.0,
            motion: Motion::Entering,
            can_dive,
            dive: DiveState::Ready,
            last_shot: None,
            off_field_since: None,
            bob_phase: slot_x,
        }
    }

    /// Current edge length.  Tanks shrink as they lose health.
    pub fn size(&self) -> f32 {
        let base = self.kind.base_size();
        if self.kind != EnemyKind::Tank || self.max_health == 0 {
            return base;
        }
        let ratio = self.health as f32 / self.max_health as f32;
        base * (0.5 + 0.5 * ratio)
    }

    /// Take one hit.  Returns `true` only for the hit that destroys it.
    pub fn hit(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.health == 0
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Settled in its formation row (not entering, not diving).
    pub fn is_in_formation(&self) -> bool {
        self.motion == Motion::Sweeping
            && self.dive == DiveState::Ready
            && (self.y - self.slot_y).abs() < 6.0
    }

    /// Roll for a shot.  Only fires near the formation row or mid-dive, and
    /// never faster than the kind's shot interval.
    pub fn try_shoot(
        &mut self,
        now: u64,
        difficulty: &DifficultyConfig,
        base_speed: f32,
        target: (f32, f32),
        rng: &mut impl Rng,
    ) -> Option<Bullet> {
        if let Some(last) = self.last_shot {
            if now.saturating_sub(last) < self.kind.shot_interval_ms() {
                return None;
            }
        }
        let diving = matches!(self.dive, DiveState::Diving { .. });
        if !diving && !self.is_in_formation() {
            return None;
        }
        if !rng.gen_bool(self.shoot_chance) {
            return None;
        }

        let mut speed = base_speed * difficulty.bullet_speed_multiplier;
        match self.kind {
            EnemyKind::Shooter => speed *= 1.15,
            EnemyKind::Fast => speed += rng.gen_range(-0.5f32..0.5),
            _ => {}
        }

        let bounds = self.bounds();
        let (cx, cy) = bounds.center();
        let angle = if difficulty.angled_shots {
            let dx = target.0 - cx;
            let dy = (target.1 - cy).max(1.0);
            dx.atan2(dy).clamp(-0.5, 0.5)
        } else {
            0.0
        };

        self.last_shot = Some(now);
        Some(Bullet::enemy(self.kind, cx, bounds.bottom(), angle, speed.max(0.5)))
    }

    fn sweep(&mut self, rng: &mut dyn RngCore) {
        let mut step = self.speed * self.direction;
        if self.kind == EnemyKind::Fast {
            step += rng.gen_range(-0.5f32..0.5) * self.speed;
        }
        self.slot_x += step;

        let size = self.kind.base_size();
        let left = FORMATION_MARGIN;
        let right = FIELD_WIDTH - FORMATION_MARGIN - size;
        let turned = if self.slot_x <= left {
            self.slot_x = left;
            self.direction = 1.0;
            true
        } else if self.slot_x >= right {
            self.slot_x = right;
            self.direction = -1.0;
            true
        } else {
            false
        };
        if turned {
            self.slot_y = (self.slot_y + FORMATION_STEP_DOWN).min(FORMATION_FLOOR);
        }
    }

    fn formation_y(&self) -> f32 {
        if self.kind == EnemyKind::Shooter {
            self.slot_y + (self.bob_phase * 0.05).sin() * 3.0
        } else {
            self.slot_y
        }
    }

    fn move_in_formation(&mut self, frame: &mut Frame<'_>) {
        match self.motion {
            Motion::Entering => {
                self.y += ENTRY_SPEED.max(self.speed * 2.0);
                if self.y >= self.slot_y {
                    self.y = self.slot_y;
                    self.motion = Motion::Sweeping;
                }
            }
            Motion::Sweeping => {
                self.sweep(&mut *frame.rng);
                self.bob_phase += 1.0;
                self.x = self.slot_x;
                let goal = self.formation_y();
                self.y += (goal - self.y).clamp(-1.0, 1.0);

                if self.can_dive && frame.rng.gen_bool(DIVE_TRIGGER_CHANCE) {
                    let (cx, _) = self.bounds().center();
                    let vx = ((frame.target.0 - cx) / 60.0).clamp(-3.0, 3.0);
                    self.dive = DiveState::Diving {
                        started: frame.now,
                        vx,
                    };
                }
            }
        }
    }

    fn keep_on_field(&mut self, now: u64) {
        if self.motion == Motion::Entering {
            self.off_field_since = None;
            return;
        }
        let field = Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
        if self.bounds().overlaps(&field) {
            self.off_field_since = None;
            return;
        }
        let since = *self.off_field_since.get_or_insert(now);
        if now.saturating_sub(since) > OFF_FIELD_TIMEOUT_MS {
            let size = self.kind.base_size();
            self.slot_x = self
                .slot_x
                .clamp(FORMATION_MARGIN, FIELD_WIDTH - FORMATION_MARGIN - size);
            self.slot_y = self.slot_y.clamp(FORMATION_TOP, FORMATION_FLOOR);
            self.x = self.slot_x;
            self.y = self.slot_y;
            self.dive = DiveState::Ready;
            self.off_field_since = None;
            tracing::debug!(kind = ?self.kind, "Recovered enemy stuck off-field");
        }
    }
}

impl Entity for Enemy {
    fn bounds(&self) -> Rect {
        let base = self.kind.base_size();
        let size = self.size();
        Rect::centered(self.x + base / 2.0, self.y + base / 2.0, size, size)
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        let now = frame.now;
        match self.dive {
            DiveState::Ready => self.move_in_formation(frame),
            DiveState::Diving { started, vx } => {
                self.y += DIVE_SPEED * self.speed.max(1.0);
                self.x += vx;
                if now.saturating_sub(started) >= DIVE_DURATION_MS || self.y > FIELD_HEIGHT {
                    self.dive = DiveState::Returning;
                }
            }
            DiveState::Returning => {
                self.x += (self.slot_x - self.x) * RETURN_LERP;
                self.y += (self.slot_y - self.y) * RETURN_LERP;
                let distance = (self.slot_x - self.x).hypot(self.slot_y - self.y);
                if distance < RETURN_SNAP_DISTANCE {
                    self.x = self.slot_x;
                    self.y = self.slot_y;
                    self.dive = DiveState::Ready;
                }
            }
        }
        self.keep_on_field(now);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let bounds = self.bounds();
        let (cx, cy) = bounds.center();
        if self.kind == EnemyKind::Tank {
            surface.fill_rect(bounds, self.kind.color());
        }
        surface.text(cx, cy, self.kind.sprite(), self.kind.color());
    }
}
