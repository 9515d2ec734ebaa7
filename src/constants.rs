//! Compile-time defaults.
//!
//! Values that a player may want to tune live in [`crate::config::GameConfig`]
//! and take their defaults from here; the rest are fixed gameplay geometry.

// ── Playfield ────────────────────────────────────────────────────────────────

/// Logical playfield width.  Rendering scales this to the terminal.
pub const FIELD_WIDTH: f32 = 800.0;
/// Logical playfield height.
pub const FIELD_HEIGHT: f32 = 600.0;

// ── Player ───────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
/// Distance between the player's bottom edge and the bottom of the field.
pub const PLAYER_BOTTOM_GAP: f32 = 30.0;

pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_FIRE_COOLDOWN_MS: u64 = 250;
pub const PLAYER_BULLET_SPEED: f32 = 8.0;
/// Angle (radians) of the two outer bullets of a spread shot.
pub const SPREAD_ANGLE: f32 = 0.25;
pub const MAX_HEALTH: u32 = 3;
pub const INVULNERABILITY_MS: u64 = 2_000;

pub const SHIELD_MS: u64 = 5_000;
pub const SPREAD_SHOT_MS: u64 = 8_000;
pub const SPEED_BOOST_MS: u64 = 6_000;
pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;

// ── Bullets ──────────────────────────────────────────────────────────────────

pub const PLAYER_BULLET_WIDTH: f32 = 4.0;
pub const PLAYER_BULLET_HEIGHT: f32 = 12.0;
pub const ENEMY_BULLET_WIDTH: f32 = 6.0;
pub const ENEMY_BULLET_HEIGHT: f32 = 12.0;
pub const ENEMY_BULLET_SPEED: f32 = 5.0;

/// Extra reach added to every edge when a player bullet tests an enemy bullet.
pub const BULLET_INTERCEPT_MARGIN: f32 = 5.0;
pub const BULLET_INTERCEPT_BONUS: u32 = 10;

/// Enemy bullet speed multiplier, indexed by `level - 1`.  Levels past the
/// end of the table use the last entry.
pub const BULLET_SPEED_TABLE: [f32; 10] = [0.5, 0.55, 0.6, 0.65, 0.7, 0.8, 0.9, 0.95, 1.0, 1.1];

// ── Enemies ──────────────────────────────────────────────────────────────────

pub const ENEMY_SIZE: f32 = 30.0;
pub const TANK_SIZE: f32 = 36.0;
/// Inset from the left/right edges at which a sweeping formation turns.
pub const FORMATION_MARGIN: f32 = 20.0;
/// How far the formation steps down on each turn.
pub const FORMATION_STEP_DOWN: f32 = 10.0;
pub const FORMATION_TOP: f32 = 60.0;
/// Lowest row a formation may step down to.
pub const FORMATION_FLOOR: f32 = 330.0;
pub const FORMATION_ROW_SPACING: f32 = 45.0;
/// How far above its slot a freshly spawned enemy starts its descent.
pub const ENTRY_DISTANCE: f32 = 320.0;
pub const ENTRY_SPEED: f32 = 3.0;
pub const BASE_ENEMY_SPEED: f32 = 1.0;

/// Chance per tick that a dive-capable enemy in formation starts a dive.
pub const DIVE_TRIGGER_CHANCE: f64 = 0.002;
/// Chance that a spawned enemy may dive at all, on levels that allow it.
pub const DIVE_ENABLE_CHANCE: f64 = 0.3;
pub const DIVE_SPEED: f32 = 5.0;
pub const DIVE_DURATION_MS: u64 = 2_000;
/// Fraction of the remaining distance covered per tick when returning.
pub const RETURN_LERP: f32 = 0.08;
/// Returning enemies snap into their slot once this close.
pub const RETURN_SNAP_DISTANCE: f32 = 2.0;

/// An enemy outside the field for longer than this is put back in bounds.
pub const OFF_FIELD_TIMEOUT_MS: u64 = 3_000;

// ── Power-ups & effects ──────────────────────────────────────────────────────

pub const POWER_UP_SIZE: f32 = 24.0;
pub const POWER_UP_FALL_SPEED: f32 = 2.0;
pub const HIT_PARTICLES: usize = 8;
pub const INTERCEPT_PARTICLES: usize = 6;
pub const MAX_PARTICLES: usize = 400;
pub const STAR_COUNT: usize = 60;

// ── Progression timing ───────────────────────────────────────────────────────

pub const FRAME_MS: u64 = 16;
pub const FIRST_WAVE_DELAY_MS: u64 = 1_000;
pub const GRACE_WINDOW_MS: u64 = 2_000;
pub const COMPLETION_CONFIRM_MS: u64 = 500;
pub const COMPLETION_FALLBACK_MS: u64 = 20_000;
pub const SAFETY_POLL_MS: u64 = 1_000;
pub const LEVEL_ADVANCE_DELAY_MS: u64 = 1_500;
pub const NOTIFICATION_MS: u64 = 2_000;
