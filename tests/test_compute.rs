use space_shooter::audio::{Mixer, MusicState, SoundEvent};
use space_shooter::compute::*;
use space_shooter::config::GameConfig;
use space_shooter::constants::*;
use space_shooter::entities::*;
use space_shooter::input::InputState;
use space_shooter::progression::Phase;
use space_shooter::surface::Color;
use space_shooter::timers::TimerKind;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn fresh(rng: &mut StdRng, audio: &mut Mixer) -> Game {
    let mut game = init_state(GameConfig::default(), rng);
    new_game(&mut game, rng, audio);
    game
}

fn idle(game: &mut Game, ticks: u32, rng: &mut StdRng, audio: &mut Mixer) {
    for _ in 0..ticks {
        tick(game, &InputState::default(), FRAME_MS, rng, audio);
    }
}

// ── new_game ──────────────────────────────────────────────────────────────────

#[test]
fn init_state_starts_level_one() {
    let mut rng = seeded_rng();
    let game = init_state(GameConfig::default(), &mut rng);
    assert_eq!(game.state.level, 1);
    assert_eq!(game.state.health, MAX_HEALTH);
    assert_eq!(game.stars.len(), STAR_COUNT);
    assert_eq!(game.notification.as_ref().map(|n| n.text.as_str()), Some("LEVEL 1"));
    assert_eq!(
        game.progression.timers().deadline(TimerKind::NextWave),
        Some(FIRST_WAVE_DELAY_MS)
    );
}

#[test]
fn new_game_resets_everything() {
    let mut rng = seeded_rng();
    let mut audio = Mixer::new();
    let mut game = fresh(&mut rng, &mut audio);

    idle(&mut game, 200, &mut rng, &mut audio);
    game.state.score = 1_234;
    game.state.health = 1;
    game.bullets.push(Bullet::player(100.0, 100.0, 0.0, 8.0));
    game.power_ups.push(PowerUp::new(100.0, 100.0, PowerUpKind::Shield));
    game.particles
        .push(Particle::new(100.0, 100.0, Color::White, &mut rng));
    game.explosions
        .push(Explosion::new(100.0, 100.0, 30.0, 60_000, Color::Red, game.now));
    assert!(!game.enemies.is_empty());

    new_game(&mut game, &mut rng, &mut audio);
    assert_eq!(game.state.score, 0);
    assert_eq!(game.state.health, MAX_HEALTH);
    assert_eq!(game.state.level, 1);
    assert_eq!(game.state.status, GameStatus::Playing);
    assert!(game.enemies.is_empty());
    assert!(game.bullets.is_empty());
    assert!(game.power_ups.is_empty());
    assert!(game.particles.is_empty());
    assert!(game.explosions.is_empty());
    assert_eq!(game.now, 0);
    assert_eq!(game.progression.level(), 1);
    assert_eq!(game.progression.waves_spawned(), 0);
    assert_eq!(audio.played(SoundEvent::GameStart), 2);
    assert_eq!(audio.music_state(), MusicState::Playing);
}

// ── Tick ──────────────────────────────────────────────────────────────────────

#[test]
fn fire_respects_cooldown() {
    let mut rng = seeded_rng();
    let mut audio = Mixer::new();
    let mut game = fresh(&mut rng, &mut audio);
    let fire = InputState {
        fire: true,
        ..InputState::default()
    };

    tick(&mut game, &fire, FRAME_MS, &mut rng, &mut audio);
    assert_eq!(game.bullets.len(), 1);
    tick(&mut game, &fire, FRAME_MS, &mut rng, &mut audio);
    assert_eq!(game.bullets.len(), 1);
    assert_eq!(audio.played(SoundEvent::Shot), 1);
}

#[test]
fn first_wave_arrives_on_schedule() {
    let mut rng = seeded_rng();
    let mut audio = Mixer::new();
    let mut game = fresh(&mut rng, &mut audio);

    while game.now + FRAME_MS < FIRST_WAVE_DELAY_MS {
        tick(&mut game, &InputState::default(), FRAME_MS, &mut rng, &mut audio);
    }
    assert!(game.enemies.is_empty());
    idle(&mut game, 1, &mut rng, &mut audio);
    assert_eq!(game.enemies.len(), 5);
    assert_eq!(game.wave(), 1);
    assert_eq!(game.max_waves(), 1);
}

#[test]
fn pause_freezes_clock_and_timers() {
    let mut rng = seeded_rng();
    let mut audio = Mixer::new();
    let mut game = fresh(&mut rng, &mut audio);
    idle(&mut game, 10, &mut rng, &mut audio);

    toggle_pause(&mut game, &mut audio);
    assert!(game.state.is_paused());
    assert_eq!(audio.music_state(), MusicState::Paused);

    let now = game.now;
    let deadline = game.progression.timers().deadline(TimerKind::NextWave);
    idle(&mut game, 500, &mut rng, &mut audio);
    assert_eq!(game.now, now);
    assert!(game.enemies.is_empty());
    assert_eq!(game.progression.timers().deadline(TimerKind::NextWave), deadline);

    toggle_pause(&mut game, &mut audio);
    assert_eq!(game.state.status, GameStatus::Playing);
    assert_eq!(audio.music_state(), MusicState::Playing);
    idle(&mut game, 100, &mut rng, &mut audio);
    assert!(!game.enemies.is_empty());
}

// ── Level progression ─────────────────────────────────────────────────────────

#[test]
fn clearing_level_one_advances_exactly_once() {
    let mut rng = seeded_rng();
    let mut audio = Mixer::new();
    let mut game = fresh(&mut rng, &mut audio);
    game.player
        .effects
        .grant(StatusEffect::Shield, 0, u64::MAX / 2);

    // Wait for the whole wave to settle into formation
    while game.enemies.is_empty() || game.enemies.iter().any(|e| e.motion != Motion::Sweeping) {
        idle(&mut game, 1, &mut rng, &mut audio);
        assert!(game.now < 10_000);
    }

    for enemy in &game.enemies {
        let (cx, cy) = enemy.bounds().center();
        game.bullets.push(Bullet::player(cx, cy - 6.0, 0.0, 8.0));
    }
    idle(&mut game, 1, &mut rng, &mut audio);
    assert!(game.enemies.is_empty());
    assert_eq!(game.state.score, 500);
    assert_eq!(audio.played(SoundEvent::EnemyDestroyed), 5);

    let cleared_at = game.now;
    while game.state.level == 1 {
        idle(&mut game, 1, &mut rng, &mut audio);
        assert!(game.now - cleared_at <= 3_500);
    }
    assert_eq!(game.progression.level(), 2);
    assert_eq!(game.progression.phase(), Phase::Active);
    assert!(!game.state.victory);
    assert_eq!(audio.played(SoundEvent::LevelComplete), 1);

    idle(&mut game, 300, &mut rng, &mut audio);
    assert_eq!(game.state.level, 2);
    assert_eq!(audio.played(SoundEvent::LevelComplete), 1);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn game_over_halts_spawning() {
    let mut rng = seeded_rng();
    let mut audio = Mixer::new();
    let mut game = fresh(&mut rng, &mut audio);
    game.state.health = 1;
    game.bullets
        .push(Bullet::enemy(EnemyKind::Basic, 400.0, 550.0, 0.0, 1.0));

    idle(&mut game, 1, &mut rng, &mut audio);
    assert!(game.state.is_game_over());
    assert_eq!(game.state.health, 0);
    assert_eq!(audio.played(SoundEvent::GameOver), 1);
    assert_eq!(audio.music_state(), MusicState::Stopped);

    idle(&mut game, 200, &mut rng, &mut audio);
    assert!(game.enemies.is_empty());
    assert_eq!(game.progression.timers().pending(), 0);
    assert_eq!(game.progression.level(), 1);
    assert_eq!(game.state.level, 1);
}

#[test]
fn pause_ignored_after_game_over() {
    let mut rng = seeded_rng();
    let mut audio = Mixer::new();
    let mut game = fresh(&mut rng, &mut audio);
    game.state.status = GameStatus::GameOver;
    toggle_pause(&mut game, &mut audio);
    assert!(game.state.is_game_over());
}
