/// Game loop driver.
///
/// [`tick`] advances the whole simulation by one frame in a fixed order:
/// due timers, player, enemies and every other entity, enemy fire,
/// collision resolution, then the level-completion check.  All randomness
/// comes through the injected RNG and all sound through the injected
/// [`Audio`], so tests can drive a game with a seeded RNG and inspect what
/// was played.

use rand::Rng;

use crate::audio::{Audio, SoundEvent};
use crate::collision;
use crate::config::GameConfig;
use crate::constants::STAR_COUNT;
use crate::entities::{
    Bullet, Enemy, Entity, Explosion, Frame, GameState, GameStatus, Particle, Player, PowerUp,
    Star,
};
use crate::input::InputState;
use crate::progression::{LevelProgression, ProgressEvent, ProgressionTiming};
use crate::surface::Surface;

/// Banner shown over the playfield until the game clock reaches `until`.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub text: String,
    pub until: u64,
}

/// One play session's complete mutable state.
#[derive(Clone, Debug)]
pub struct Game {
    pub config: GameConfig,
    pub state: GameState,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    pub progression: LevelProgression,
    pub notification: Option<Notification>,
    /// Game clock in milliseconds.  Only advances while not paused.
    pub now: u64,
}

impl Game {
    /// Current wave for display, 1-based (0 before the first spawn).
    pub fn wave(&self) -> u32 {
        self.progression.waves_spawned()
    }

    pub fn max_waves(&self) -> u32 {
        self.progression.max_waves()
    }

    fn notify(&mut self, text: String) {
        self.notification = Some(Notification {
            text,
            until: self.now + self.config.notification_ms,
        });
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh game at level 1 with the first wave scheduled.
pub fn init_state(config: GameConfig, rng: &mut impl Rng) -> Game {
    let mut progression = LevelProgression::new(ProgressionTiming::from(&config));
    let started = progression.start(0);

    let mut game = Game {
        state: GameState::new(config.max_health),
        player: Player::new(&config),
        enemies: Vec::new(),
        bullets: Vec::new(),
        power_ups: Vec::new(),
        particles: Vec::new(),
        explosions: Vec::new(),
        stars: (0..STAR_COUNT).map(|_| Star::new(rng)).collect(),
        progression,
        notification: None,
        now: 0,
        config,
    };
    apply_event(&mut game, started, &mut NoCue);
    game
}

/// Throw the current session away and start over from level 1.  Every
/// pending timer and every collection goes with it.
pub fn new_game(game: &mut Game, rng: &mut impl Rng, audio: &mut dyn Audio) {
    *game = init_state(game.config.clone(), rng);
    audio.play(SoundEvent::GameStart);
    audio.start_music();
    tracing::info!("New game started");
}

/// Toggle between playing and paused.  Music follows the game; the game
/// clock, and with it every timer, stands still while paused.
pub fn toggle_pause(game: &mut Game, audio: &mut dyn Audio) {
    match game.state.status {
        GameStatus::Playing => {
            game.state.status = GameStatus::Paused;
            audio.pause_music();
            tracing::info!(now = game.now, "Game paused");
        }
        GameStatus::Paused => {
            game.state.status = GameStatus::Playing;
            audio.resume_music();
            tracing::info!(now = game.now, "Game resumed");
        }
        GameStatus::GameOver => {}
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by `dt_ms` of game time.
///
/// A paused game does not move at all.  After game over only the visual
/// effects keep running so the final explosion can play out.
pub fn tick(
    game: &mut Game,
    input: &InputState,
    dt_ms: u64,
    rng: &mut impl Rng,
    audio: &mut dyn Audio,
) {
    match game.state.status {
        GameStatus::Paused => return,
        GameStatus::GameOver => {
            game.now += dt_ms;
            update_effects(game, rng);
            return;
        }
        GameStatus::Playing => {}
    }
    game.now += dt_ms;
    let now = game.now;

    // ── 1. Scheduled spawns and level transitions ────────────────────────────
    let events = game
        .progression
        .fire_due_timers(now, &mut game.enemies, rng);
    for event in events {
        apply_event(game, event, audio);
    }

    // ── 2. Player ────────────────────────────────────────────────────────────
    let target = game.player.bounds().center();
    let mut frame = Frame {
        now,
        input: *input,
        target,
        rng: &mut *rng,
    };
    game.player.update(&mut frame);
    if input.fire {
        let shots = game.player.shoot(now, &game.config);
        if !shots.is_empty() {
            audio.play(SoundEvent::Shot);
            game.bullets.extend(shots);
        }
    }

    // ── 3. Everything else moves ─────────────────────────────────────────────
    let target = game.player.bounds().center();
    let mut frame = Frame {
        now,
        input: *input,
        target,
        rng: &mut *rng,
    };
    for enemy in &mut game.enemies {
        enemy.update(&mut frame);
    }
    for bullet in &mut game.bullets {
        bullet.update(&mut frame);
    }
    for power_up in &mut game.power_ups {
        power_up.update(&mut frame);
    }

    // ── 4. Enemy fire ────────────────────────────────────────────────────────
    let difficulty = game.progression.difficulty();
    for enemy in &mut game.enemies {
        if let Some(bullet) =
            enemy.try_shoot(now, difficulty, game.config.enemy_bullet_speed, target, rng)
        {
            game.bullets.push(bullet);
        }
    }

    update_effects(game, rng);

    // ── 5. Collisions ────────────────────────────────────────────────────────
    collision::resolve(game, rng, audio);
    if game.state.is_game_over() {
        return;
    }

    // ── 6. Completion ────────────────────────────────────────────────────────
    game.progression.check_completion(now, game.enemies.len());
}

/// Particles, explosions, stars and the notification banner.
fn update_effects(game: &mut Game, rng: &mut impl Rng) {
    let mut frame = Frame {
        now: game.now,
        input: InputState::default(),
        target: game.player.bounds().center(),
        rng: &mut *rng,
    };
    for particle in &mut game.particles {
        particle.update(&mut frame);
    }
    for explosion in &mut game.explosions {
        explosion.update(&mut frame);
    }
    for star in &mut game.stars {
        star.update(&mut frame);
    }

    game.particles.retain(|p| !p.is_expired());
    game.explosions.retain(|e| !e.is_finished());
    if game
        .notification
        .as_ref()
        .is_some_and(|n| game.now >= n.until)
    {
        game.notification = None;
    }
}

fn apply_event(game: &mut Game, event: ProgressEvent, audio: &mut dyn Audio) {
    match event {
        ProgressEvent::LevelStarted { level } => {
            game.state.level = level;
            game.state.victory = false;
            game.notify(format!("LEVEL {level}"));
        }
        ProgressEvent::LevelCleared { level } => {
            game.state.victory = true;
            game.bullets.retain(|b| !b.owner.is_enemy());
            game.notify(format!("LEVEL {level} COMPLETE"));
            audio.play(SoundEvent::LevelComplete);
        }
        ProgressEvent::WaveSpawned { wave, .. } => {
            if wave > 0 {
                let max = game.progression.max_waves();
                game.notify(format!("WAVE {}/{max}", wave + 1));
            }
        }
    }
}

/// Audio sink for events raised while building a game, before any
/// collaborator is attached.
struct NoCue;

impl Audio for NoCue {
    fn play(&mut self, _event: SoundEvent) {}
    fn start_music(&mut self) {}
    fn pause_music(&mut self) {}
    fn resume_music(&mut self) {}
    fn stop_music(&mut self) {}
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Draw the playfield back to front.  HUD and overlays are the host's job.
pub fn draw(game: &Game, surface: &mut dyn Surface) {
    for star in &game.stars {
        star.draw(surface);
    }
    for particle in &game.particles {
        particle.draw(surface);
    }
    for power_up in &game.power_ups {
        power_up.draw(surface);
    }
    for enemy in &game.enemies {
        enemy.draw(surface);
    }
    for bullet in &game.bullets {
        bullet.draw(surface);
    }
    for explosion in &game.explosions {
        explosion.draw(surface);
    }
    if !game.state.is_game_over() {
        game.player.draw(surface);
    }
}
