//! Level progression: which level and wave the game is on and when a level
//! counts as cleared.
//!
//! ```text
//!   Active ──(cleared)──▶ Completing ──(confirmed)──▶ Advancing ──▶ Active
//!     │                       │ (no longer clear)
//!     │                       ▼
//!     │                    Active
//!     └──(health 0)──▶ GameOver
//! ```
//!
//! [`LevelProgression::is_level_cleared`] is the only completion predicate.
//! The per-frame check, the fallback timer after the last wave, the grace
//! expiry and the safety poll all funnel into
//! [`LevelProgression::check_completion`], which only moves `Active` to
//! `Completing`.  The confirmation timer re-validates before the level is
//! declared cleared, and the advance timer re-checks the phase before the
//! level number moves, so a stale timer is a no-op.

use rand::Rng;

use crate::config::GameConfig;
use crate::difficulty::DifficultyConfig;
use crate::entities::Enemy;
use crate::spawner::{self, Formation};
use crate::timers::{Scheduler, TimerKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    Completing,
    Advancing,
    GameOver,
}

/// Delays used by the progression, in game-clock milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressionTiming {
    pub first_wave_delay_ms: u64,
    pub grace_window_ms: u64,
    pub completion_confirm_ms: u64,
    pub completion_fallback_ms: u64,
    pub safety_poll_ms: u64,
    pub level_advance_delay_ms: u64,
}

impl From<&GameConfig> for ProgressionTiming {
    fn from(config: &GameConfig) -> Self {
        Self {
            first_wave_delay_ms: config.first_wave_delay_ms,
            grace_window_ms: config.grace_window_ms,
            completion_confirm_ms: config.completion_confirm_ms,
            completion_fallback_ms: config.completion_fallback_ms,
            safety_poll_ms: config.safety_poll_ms,
            level_advance_delay_ms: config.level_advance_delay_ms,
        }
    }
}

impl Default for ProgressionTiming {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

/// Something the game loop should react to (banner, sound, HUD).
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    WaveSpawned {
        level: u32,
        /// Zero-based.
        wave: u32,
        formation: Formation,
        enemies: usize,
    },
    LevelCleared {
        level: u32,
    },
    LevelStarted {
        level: u32,
    },
}

#[derive(Clone, Debug)]
pub struct LevelProgression {
    level: u32,
    difficulty: DifficultyConfig,
    waves_spawned: u32,
    last_formation: Option<Formation>,
    phase: Phase,
    just_started: bool,
    victory_in_progress: bool,
    timers: Scheduler,
    timing: ProgressionTiming,
}

impl LevelProgression {
    /// Level 1 with nothing scheduled.  Call [`start`](Self::start) to begin.
    pub fn new(timing: ProgressionTiming) -> Self {
        Self {
            level: 1,
            difficulty: DifficultyConfig::for_level(1),
            waves_spawned: 0,
            last_formation: None,
            phase: Phase::Active,
            just_started: true,
            victory_in_progress: false,
            timers: Scheduler::new(),
            timing,
        }
    }

    /// Reset to level 1 and schedule the first wave.  Every pending timer
    /// from a previous game is dropped.
    pub fn start(&mut self, now: u64) -> ProgressEvent {
        self.timers.cancel_all();
        *self = Self::new(self.timing);
        self.timers
            .arm(TimerKind::NextWave, now, self.timing.first_wave_delay_ms);
        self.arm_grace(now);
        tracing::info!(level = self.level, "Level started");
        ProgressEvent::LevelStarted { level: self.level }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn difficulty(&self) -> &DifficultyConfig {
        &self.difficulty
    }

    /// Waves spawned so far in this level.
    pub fn waves_spawned(&self) -> u32 {
        self.waves_spawned
    }

    pub fn max_waves(&self) -> u32 {
        self.difficulty.max_waves
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_just_started(&self) -> bool {
        self.just_started
    }

    pub fn is_victory_in_progress(&self) -> bool {
        self.victory_in_progress
    }

    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }

    // ── Completion ───────────────────────────────────────────────────────────

    /// Whether the current level is cleared: nothing alive, nothing left to
    /// spawn, no victory already under way and outside the grace window.
    pub fn is_level_cleared(&self, enemies_alive: usize) -> bool {
        self.phase == Phase::Active && self.clear_conditions_hold(enemies_alive)
    }

    fn clear_conditions_hold(&self, enemies_alive: usize) -> bool {
        enemies_alive == 0
            && !self.timers.is_armed(TimerKind::NextWave)
            && self.waves_spawned >= self.difficulty.max_waves
            && !self.victory_in_progress
            && !self.just_started
    }

    /// Begin completing the level if it is cleared.  Safe to call every
    /// frame; returns `true` only on the call that starts confirmation.
    pub fn check_completion(&mut self, now: u64, enemies_alive: usize) -> bool {
        if !self.is_level_cleared(enemies_alive) {
            return false;
        }
        self.phase = Phase::Completing;
        self.timers.arm(
            TimerKind::ConfirmCompletion,
            now,
            self.timing.completion_confirm_ms,
        );
        tracing::debug!(level = self.level, "Level completion pending confirmation");
        true
    }

    /// Stop all spawning and advancement for the rest of the session.
    pub fn enter_game_over(&mut self) {
        self.timers.cancel_all();
        self.phase = Phase::GameOver;
    }

    // ── Timers ───────────────────────────────────────────────────────────────

    /// Fire every timer due at `now`, earliest first.
    pub fn fire_due_timers(
        &mut self,
        now: u64,
        enemies: &mut Vec<Enemy>,
        rng: &mut impl Rng,
    ) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Some(kind) = self.timers.pop_due(now) {
            match kind {
                TimerKind::NextWave => {
                    if self.phase == Phase::Active {
                        events.extend(self.spawn_next_wave(now, enemies, rng));
                    } else {
                        tracing::debug!(phase = ?self.phase, "Ignoring stale wave timer");
                    }
                }
                TimerKind::GraceExpiry => {
                    self.just_started = false;
                    self.check_completion(now, enemies.len());
                }
                TimerKind::SafetyPoll => {
                    if self.phase != Phase::GameOver {
                        self.timers
                            .arm(TimerKind::SafetyPoll, now, self.timing.safety_poll_ms.max(1));
                    }
                    self.check_completion(now, enemies.len());
                }
                TimerKind::CompletionFallback => {
                    self.check_completion(now, enemies.len());
                }
                TimerKind::ConfirmCompletion => {
                    events.extend(self.confirm_completion(now, enemies.len()));
                }
                TimerKind::LevelAdvance => {
                    events.extend(self.advance_level(now, enemies, rng));
                }
            }
        }
        events
    }

    fn arm_grace(&mut self, now: u64) {
        self.just_started = true;
        self.timers
            .arm(TimerKind::GraceExpiry, now, self.timing.grace_window_ms);
        self.timers
            .arm(TimerKind::SafetyPoll, now, self.timing.safety_poll_ms.max(1));
    }

    fn confirm_completion(&mut self, now: u64, enemies_alive: usize) -> Option<ProgressEvent> {
        if self.phase != Phase::Completing {
            tracing::debug!(phase = ?self.phase, "Ignoring stale completion confirmation");
            return None;
        }
        if !self.clear_conditions_hold(enemies_alive) {
            tracing::debug!(level = self.level, "Level no longer clear, resuming");
            self.phase = Phase::Active;
            return None;
        }

        self.victory_in_progress = true;
        self.timers.cancel_all();
        self.phase = Phase::Advancing;
        self.timers.arm(
            TimerKind::LevelAdvance,
            now,
            self.timing.level_advance_delay_ms,
        );
        tracing::info!(level = self.level, "Level cleared");
        Some(ProgressEvent::LevelCleared { level: self.level })
    }

    fn advance_level(
        &mut self,
        now: u64,
        enemies: &mut Vec<Enemy>,
        rng: &mut impl Rng,
    ) -> Vec<ProgressEvent> {
        if self.phase != Phase::Advancing {
            tracing::debug!(phase = ?self.phase, "Ignoring stale level advance");
            return Vec::new();
        }

        self.level += 1;
        self.difficulty = DifficultyConfig::for_level(self.level);
        self.waves_spawned = 0;
        self.last_formation = None;
        enemies.clear();
        self.victory_in_progress = false;
        self.phase = Phase::Active;
        self.arm_grace(now);
        tracing::info!(level = self.level, max_waves = self.difficulty.max_waves, "Level started");

        let mut events = vec![ProgressEvent::LevelStarted { level: self.level }];
        events.extend(self.spawn_next_wave(now, enemies, rng));
        events
    }

    // ── Waves ────────────────────────────────────────────────────────────────

    /// Spawn the next wave of the current level, if any remain.  Schedules
    /// the following wave, or arms the completion fallback after the last.
    pub fn spawn_next_wave(
        &mut self,
        now: u64,
        enemies: &mut Vec<Enemy>,
        rng: &mut impl Rng,
    ) -> Option<ProgressEvent> {
        if self.phase != Phase::Active {
            return None;
        }
        let wave = spawner::spawn_wave(
            &self.difficulty,
            self.waves_spawned,
            self.last_formation,
            rng,
        )?;

        let count = wave.enemies.len();
        enemies.extend(wave.enemies);
        self.waves_spawned += 1;
        self.last_formation = Some(wave.formation);
        tracing::info!(
            level = self.level,
            wave = wave.index + 1,
            max_waves = self.difficulty.max_waves,
            formation = ?wave.formation,
            enemies = count,
            "Wave spawned"
        );

        if self.waves_spawned < self.difficulty.max_waves {
            self.timers
                .arm(TimerKind::NextWave, now, self.difficulty.wave_delay_ms);
        } else {
            self.timers.cancel(TimerKind::NextWave);
            self.timers.arm(
                TimerKind::CompletionFallback,
                now,
                self.timing.completion_fallback_ms,
            );
        }

        Some(ProgressEvent::WaveSpawned {
            level: self.level,
            wave: wave.index,
            formation: wave.formation,
            enemies: count,
        })
    }
}
