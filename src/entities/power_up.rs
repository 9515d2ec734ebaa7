use rand::Rng;

use crate::collision::Rect;
use crate::constants::{POWER_UP_FALL_SPEED, POWER_UP_SIZE};
use crate::surface::{Color, Surface};

use super::{Entity, Frame};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Shield,
    SpreadShot,
    Speed,
    /// Restores one point of health, up to the maximum.
    Health,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::SpreadShot,
        PowerUpKind::Speed,
        PowerUpKind::Health,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    fn glyph(&self) -> (&'static str, Color) {
        match self {
            PowerUpKind::Shield => ("◊", Color::Blue),
            PowerUpKind::SpreadShot => ("★", Color::Yellow),
            PowerUpKind::Speed => ("»", Color::Cyan),
            PowerUpKind::Health => ("♥", Color::Magenta),
        }
    }
}

/// A power-up falling at constant speed until caught or lost off the bottom.
#[derive(Clone, Debug)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
    pub alive: bool,
}

impl PowerUp {
    /// Centred on `(cx, cy)`, typically where an enemy was destroyed.
    pub fn new(cx: f32, cy: f32, kind: PowerUpKind) -> Self {
        Self {
            x: cx - POWER_UP_SIZE / 2.0,
            y: cy - POWER_UP_SIZE / 2.0,
            kind,
            alive: true,
        }
    }
}

impl Entity for PowerUp {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, POWER_UP_SIZE, POWER_UP_SIZE)
    }

    fn update(&mut self, _frame: &mut Frame<'_>) {
        self.y += POWER_UP_FALL_SPEED;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (cx, cy) = self.bounds().center();
        let (glyph, color) = self.kind.glyph();
        surface.text(cx, cy, glyph, color);
    }
}
