use crate::collision::Rect;
use crate::constants::{
    ENEMY_BULLET_HEIGHT, ENEMY_BULLET_WIDTH, PLAYER_BULLET_HEIGHT, PLAYER_BULLET_WIDTH,
};
use crate::surface::{Color, Surface};

use super::{EnemyKind, Entity, Frame};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    /// Fired by an enemy of this kind; picks the bullet's look.
    Enemy(EnemyKind),
}

impl BulletOwner {
    pub fn is_enemy(&self) -> bool {
        matches!(self, BulletOwner::Enemy(_))
    }
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Radians away from straight travel; positive leans right.
    pub angle: f32,
    pub speed: f32,
    pub owner: BulletOwner,
    pub alive: bool,
}

impl Bullet {
    /// Player bullet centred horizontally on `cx`, top edge at `y`.
    pub fn player(cx: f32, y: f32, angle: f32, speed: f32) -> Self {
        Self {
            x: cx - PLAYER_BULLET_WIDTH / 2.0,
            y,
            width: PLAYER_BULLET_WIDTH,
            height: PLAYER_BULLET_HEIGHT,
            angle,
            speed,
            owner: BulletOwner::Player,
            alive: true,
        }
    }

    /// Enemy bullet centred horizontally on `cx`, top edge at `y`.
    pub fn enemy(kind: EnemyKind, cx: f32, y: f32, angle: f32, speed: f32) -> Self {
        Self {
            x: cx - ENEMY_BULLET_WIDTH / 2.0,
            y,
            width: ENEMY_BULLET_WIDTH,
            height: ENEMY_BULLET_HEIGHT,
            angle,
            speed,
            owner: BulletOwner::Enemy(kind),
            alive: true,
        }
    }

    /// Per-tick displacement.  Player bullets travel up, enemy bullets down.
    pub fn velocity(&self) -> (f32, f32) {
        let dx = self.angle.sin() * self.speed;
        let dy = self.angle.cos() * self.speed;
        match self.owner {
            BulletOwner::Player => (dx, -dy),
            BulletOwner::Enemy(_) => (dx, dy),
        }
    }
}

impl Entity for Bullet {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn update(&mut self, _frame: &mut Frame<'_>) {
        let (dx, dy) = self.velocity();
        self.x += dx;
        self.y += dy;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let color = match self.owner {
            BulletOwner::Player => Color::Cyan,
            BulletOwner::Enemy(kind) => kind.bullet_color(),
        };
        surface.fill_rect(self.bounds(), color);
    }
}
