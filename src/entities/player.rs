use crate::collision::Rect;
use crate::config::GameConfig;
use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH, PLAYER_BOTTOM_GAP, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::surface::{Color, Surface};

use super::{Bullet, Entity, Frame, PowerUpKind};

// ── Status effects ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusEffect {
    /// Blocks all damage.
    Shield,
    /// Fires three bullets per shot.
    SpreadShot,
    SpeedBoost,
    /// Granted after taking a hit.
    Invulnerable,
}

impl StatusEffect {
    pub const ALL: [StatusEffect; 4] = [
        StatusEffect::Shield,
        StatusEffect::SpreadShot,
        StatusEffect::SpeedBoost,
        StatusEffect::Invulnerable,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// One expiry timestamp per effect.  `None` means inactive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusEffects {
    expiries: [Option<u64>; 4],
}

impl StatusEffects {
    /// Activate `effect` until `now + duration_ms`.  Never shortens an
    /// effect that is already running longer.
    pub fn grant(&mut self, effect: StatusEffect, now: u64, duration_ms: u64) {
        let until = now.saturating_add(duration_ms);
        let slot = &mut self.expiries[effect.index()];
        *slot = Some(slot.map_or(until, |current| current.max(until)));
    }

    pub fn is_active(&self, effect: StatusEffect, now: u64) -> bool {
        self.expiries[effect.index()].is_some_and(|until| now < until)
    }

    /// Whether `effect` has not yet been expired by [`StatusEffects::expire`].
    pub fn is_set(&self, effect: StatusEffect) -> bool {
        self.expiries[effect.index()].is_some()
    }

    pub fn remaining_ms(&self, effect: StatusEffect, now: u64) -> Option<u64> {
        self.expiries[effect.index()]
            .filter(|&until| now < until)
            .map(|until| until - now)
    }

    /// Drop every effect whose expiry has passed.
    pub fn expire(&mut self, now: u64) {
        for (slot, effect) in self.expiries.iter_mut().zip(StatusEffect::ALL) {
            if slot.is_some_and(|until| now >= until) {
                tracing::debug!(?effect, "Status effect expired");
                *slot = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.expiries = [None; 4];
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub base_speed: f32,
    /// `base_speed`, raised while a speed boost is active.
    pub speed: f32,
    pub boost_multiplier: f32,
    pub fire_cooldown_ms: u64,
    pub last_shot: Option<u64>,
    pub effects: StatusEffects,
}

impl Player {
    /// A ship centred at the bottom of the field.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: (FIELD_WIDTH - PLAYER_WIDTH) / 2.0,
            y: FIELD_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_GAP,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            base_speed: config.player_speed,
            speed: config.player_speed,
            boost_multiplier: config.speed_boost_multiplier,
            fire_cooldown_ms: config.player_fire_cooldown_ms,
            last_shot: None,
            effects: StatusEffects::default(),
        }
    }

    pub fn can_shoot(&self, now: u64) -> bool {
        self.last_shot
            .map_or(true, |last| now.saturating_sub(last) >= self.fire_cooldown_ms)
    }

    /// Fire if the cooldown allows.  Spread shot adds two angled bullets.
    pub fn shoot(&mut self, now: u64, config: &GameConfig) -> Vec<Bullet> {
        if !self.can_shoot(now) {
            return Vec::new();
        }
        self.last_shot = Some(now);

        let cx = self.x + self.width / 2.0;
        let speed = config.player_bullet_speed;
        let mut bullets = vec![Bullet::player(cx, self.y - 1.0, 0.0, speed)];
        if self.effects.is_active(StatusEffect::SpreadShot, now) {
            let angle = config.spread_angle;
            bullets.push(Bullet::player(cx, self.y - 1.0, -angle, speed));
            bullets.push(Bullet::player(cx, self.y - 1.0, angle, speed));
        }
        bullets
    }

    /// Shielded and invulnerable ships take no damage.
    pub fn is_vulnerable(&self, now: u64) -> bool {
        !self.effects.is_active(StatusEffect::Shield, now)
            && !self.effects.is_active(StatusEffect::Invulnerable, now)
    }

    pub fn take_hit(&mut self, now: u64, invulnerability_ms: u64) {
        self.effects
            .grant(StatusEffect::Invulnerable, now, invulnerability_ms);
    }

    /// Apply a timed power-up.  Health is handled by the caller since the
    /// ship does not own the health counter.
    pub fn collect(&mut self, kind: PowerUpKind, now: u64, config: &GameConfig) {
        match kind {
            PowerUpKind::Shield => self.effects.grant(StatusEffect::Shield, now, config.shield_ms),
            PowerUpKind::SpreadShot => {
                self.effects
                    .grant(StatusEffect::SpreadShot, now, config.spread_shot_ms)
            }
            PowerUpKind::Speed => {
                self.effects
                    .grant(StatusEffect::SpeedBoost, now, config.speed_boost_ms);
                self.speed = self.base_speed * self.boost_multiplier;
            }
            PowerUpKind::Health => {}
        }
    }
}

impl Entity for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        let now = frame.now;
        self.effects.expire(now);
        self.speed = if self.effects.is_active(StatusEffect::SpeedBoost, now) {
            self.base_speed * self.boost_multiplier
        } else {
            self.base_speed
        };

        let input = frame.input;
        if input.left {
            self.x -= self.speed;
        }
        if input.right {
            self.x += self.speed;
        }
        if input.up {
            self.y -= self.speed;
        }
        if input.down {
            self.y += self.speed;
        }
        self.x = self.x.clamp(0.0, FIELD_WIDTH - self.width);
        self.y = self.y.clamp(0.0, FIELD_HEIGHT - self.height);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (cx, cy) = self.bounds().center();
        let color = if self.effects.is_set(StatusEffect::Invulnerable) {
            Color::DarkGrey
        } else {
            Color::White
        };
        surface.text(cx, cy - self.height / 4.0, "▲", color);
        surface.text(cx, cy + self.height / 4.0, "/█\\", color);
        if self.effects.is_set(StatusEffect::Shield) {
            surface.text(cx, self.y - 4.0, "(   )", Color::Blue);
        }
    }
}
