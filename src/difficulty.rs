//! Per-level difficulty, derived purely from the level number.
//!
//! Every parameter moves in one direction as the level rises and stops at a
//! cap (or floor).  Spawn counts, enemy stats, type mix and unlocked
//! mechanics only ever get harder; the inter-wave delay and the power-up
//! drop chance only ever shrink.

use crate::constants::BULLET_SPEED_TABLE;
use crate::spawner::Formation;

#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyConfig {
    pub level: u32,
    /// Enemies in the first wave of the level; later waves add one each.
    pub enemies_per_wave: u32,
    pub max_waves: u32,
    pub wave_delay_ms: u64,
    pub health_multiplier: f32,
    pub speed_multiplier: f32,
    pub shoot_rate_multiplier: f64,
    pub shooter_chance: f64,
    pub tank_chance: f64,
    pub fast_chance: f64,
    pub bullet_speed_multiplier: f32,
    pub power_up_drop_chance: f64,
    pub diving_enabled: bool,
    pub angled_shots: bool,
    /// How many formations (in [`Formation::ALL`] order) are unlocked.
    pub formations_unlocked: usize,
}

pub const MAX_ENEMIES_PER_WAVE: u32 = 12;
/// Cap on the size of any single wave, including the per-wave increase.
pub const MAX_WAVE_SIZE: u32 = 16;
pub const MAX_WAVES: u32 = 6;
pub const MIN_WAVE_DELAY_MS: u64 = 1_500;
pub const MAX_HEALTH_MULTIPLIER: f32 = 3.0;
pub const MAX_SPEED_MULTIPLIER: f32 = 2.0;
pub const MAX_SHOOT_RATE_MULTIPLIER: f64 = 2.5;
pub const MIN_DROP_CHANCE: f64 = 0.1;

/// Level at which each special enemy kind starts to appear.
pub const SHOOTER_LEVEL: u32 = 2;
pub const TANK_LEVEL: u32 = 3;
pub const FAST_LEVEL: u32 = 4;
pub const DIVING_LEVEL: u32 = 3;
pub const ANGLED_SHOTS_LEVEL: u32 = 5;

/// Probability ramp that is zero before `from` and then climbs to `cap`.
fn ramp(level: u32, from: u32, start: f64, step: f64, cap: f64) -> f64 {
    if level < from {
        return 0.0;
    }
    (start + step * (level - from) as f64).min(cap)
}

impl DifficultyConfig {
    /// Derive the configuration for `level`.  Levels below 1 are treated
    /// as level 1.
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let steps = level - 1;

        let table_index = (steps as usize).min(BULLET_SPEED_TABLE.len() - 1);

        Self {
            level,
            enemies_per_wave: steps.saturating_add(5).min(MAX_ENEMIES_PER_WAVE),
            max_waves: (1 + level / 2).min(MAX_WAVES),
            wave_delay_ms: 3_000u64
                .saturating_sub(150 * steps as u64)
                .max(MIN_WAVE_DELAY_MS),
            health_multiplier: (1.0 + 0.15 * steps as f32).min(MAX_HEALTH_MULTIPLIER),
            speed_multiplier: (1.0 + 0.1 * steps as f32).min(MAX_SPEED_MULTIPLIER),
            shoot_rate_multiplier: (1.0 + 0.1 * steps as f64).min(MAX_SHOOT_RATE_MULTIPLIER),
            shooter_chance: ramp(level, SHOOTER_LEVEL, 0.15, 0.05, 0.35),
            tank_chance: ramp(level, TANK_LEVEL, 0.10, 0.04, 0.25),
            fast_chance: ramp(level, FAST_LEVEL, 0.10, 0.04, 0.25),
            bullet_speed_multiplier: BULLET_SPEED_TABLE[table_index],
            power_up_drop_chance: (0.3 - 0.02 * steps as f64).max(MIN_DROP_CHANCE),
            diving_enabled: level >= DIVING_LEVEL,
            angled_shots: level >= ANGLED_SHOTS_LEVEL,
            formations_unlocked: (2 + steps as usize / 2).min(Formation::ALL.len()),
        }
    }

    /// Enemy count for wave `wave` (zero-based) of this level.
    pub fn wave_size(&self, wave: u32) -> u32 {
        self.enemies_per_wave.saturating_add(wave).min(MAX_WAVE_SIZE)
    }

    pub fn unlocked_formations(&self) -> &'static [Formation] {
        &Formation::ALL[..self.formations_unlocked.clamp(1, Formation::ALL.len())]
    }
}
