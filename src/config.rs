//! Runtime configuration loaded from a TOML file.
//!
//! [`GameConfig`] mirrors the tunable constants in [`crate::constants`].
//! Every field is optional in the file; missing keys keep the compiled
//! default, so a config can override just the values you care about:
//!
//! ```toml
//! max_health = 5
//! grace_window_ms = 3000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};

/// Default location checked when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "assets/game.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Frame pacing ─────────────────────────────────────────────────────────
    pub frame_ms: u64,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_speed: f32,
    pub player_fire_cooldown_ms: u64,
    pub player_bullet_speed: f32,
    pub spread_angle: f32,
    pub max_health: u32,
    pub invulnerability_ms: u64,

    // ── Power-ups ────────────────────────────────────────────────────────────
    pub shield_ms: u64,
    pub spread_shot_ms: u64,
    pub speed_boost_ms: u64,
    pub speed_boost_multiplier: f32,

    // ── Combat ───────────────────────────────────────────────────────────────
    pub enemy_bullet_speed: f32,
    pub bullet_intercept_margin: f32,
    pub bullet_intercept_bonus: u32,

    // ── Progression timing ───────────────────────────────────────────────────
    pub first_wave_delay_ms: u64,
    pub grace_window_ms: u64,
    pub completion_confirm_ms: u64,
    pub completion_fallback_ms: u64,
    pub safety_poll_ms: u64,
    pub level_advance_delay_ms: u64,
    pub notification_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_ms: FRAME_MS,
            player_speed: PLAYER_SPEED,
            player_fire_cooldown_ms: PLAYER_FIRE_COOLDOWN_MS,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            spread_angle: SPREAD_ANGLE,
            max_health: MAX_HEALTH,
            invulnerability_ms: INVULNERABILITY_MS,
            shield_ms: SHIELD_MS,
            spread_shot_ms: SPREAD_SHOT_MS,
            speed_boost_ms: SPEED_BOOST_MS,
            speed_boost_multiplier: SPEED_BOOST_MULTIPLIER,
            enemy_bullet_speed: ENEMY_BULLET_SPEED,
            bullet_intercept_margin: BULLET_INTERCEPT_MARGIN,
            bullet_intercept_bonus: BULLET_INTERCEPT_BONUS,
            first_wave_delay_ms: FIRST_WAVE_DELAY_MS,
            grace_window_ms: GRACE_WINDOW_MS,
            completion_confirm_ms: COMPLETION_CONFIRM_MS,
            completion_fallback_ms: COMPLETION_FALLBACK_MS,
            safety_poll_ms: SAFETY_POLL_MS,
            level_advance_delay_ms: LEVEL_ADVANCE_DELAY_MS,
            notification_ms: NOTIFICATION_MS,
        }
    }
}

impl GameConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the file at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.frame_ms == 0 {
            return Err(invalid("frame_ms", self.frame_ms, "must be at least 1"));
        }
        if self.max_health == 0 {
            return Err(invalid("max_health", self.max_health, "must be at least 1"));
        }
        if self.safety_poll_ms == 0 {
            return Err(invalid("safety_poll_ms", self.safety_poll_ms, "must be at least 1"));
        }
        let non_negative = [
            ("player_speed", self.player_speed),
            ("player_bullet_speed", self.player_bullet_speed),
            ("spread_angle", self.spread_angle),
            ("speed_boost_multiplier", self.speed_boost_multiplier),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("bullet_intercept_margin", self.bullet_intercept_margin),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, value, "must be a finite, non-negative number"));
            }
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason,
    }
}
